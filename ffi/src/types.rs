//! `#[repr(C)]` types for the FFI boundary.
//!
//! # Design
//! Each type mirrors a core type but uses C-compatible representations:
//! `*mut c_char` instead of `String`, raw pointers instead of `Vec`, and
//! enums with explicit discriminants. Outcomes of fetch and commit are small
//! structs returned by value so the host has nothing to free. Conversion
//! functions live here to keep `lib.rs` focused on the `extern "C"` surface.

use std::ffi::CString;
use std::os::raw::c_char;

use personas_core::{
    ApiError, CommitOutcome, EditError, FetchOutcome, FilterKind, HttpMethod, PendingCommit,
    Persona, PersonasScreen,
};

/// Opaque handle to a `PersonasScreen`. C callers receive a pointer to this
/// and pass it back into every `personas_screen_*` function.
pub struct FfiScreen {
    pub(crate) inner: PersonasScreen,
}

/// Opaque handle to a commit in flight, returned by
/// `personas_screen_begin_commit` and consumed by
/// `personas_screen_complete_commit`.
pub struct FfiPendingCommit {
    pub(crate) inner: PendingCommit,
}

/// Allocate a C string, dropping interior NUL bytes.
pub(crate) fn c_string(s: &str) -> *mut c_char {
    CString::new(s.replace('\0', ""))
        .unwrap_or_default()
        .into_raw()
}

/// Free a string allocated by `c_string`. Null is ignored.
pub(crate) fn free_c_string(s: *mut c_char) {
    if !s.is_null() {
        drop(unsafe { CString::from_raw(s) });
    }
}

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// HTTP method as a C enum.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FfiHttpMethod {
    Get = 0,
    Post = 1,
    Put = 2,
}

impl From<HttpMethod> for FfiHttpMethod {
    fn from(m: HttpMethod) -> Self {
        match m {
            HttpMethod::Get => FfiHttpMethod::Get,
            HttpMethod::Post => FfiHttpMethod::Post,
            HttpMethod::Put => FfiHttpMethod::Put,
        }
    }
}

/// A single HTTP header as a key-value pair of C strings.
#[repr(C)]
pub struct FfiHeader {
    pub key: *mut c_char,
    pub value: *mut c_char,
}

/// An HTTP request described as C-compatible plain data.
///
/// The host executes the request and hands the response back through the
/// matching `personas_screen_complete_*` function.
#[repr(C)]
pub struct FfiHttpRequest {
    pub method: FfiHttpMethod,
    pub path: *mut c_char,
    pub headers: *mut FfiHeader,
    pub headers_len: u32,
    pub body: *mut c_char,
}

impl FfiHttpRequest {
    /// Convert a core `HttpRequest` into a heap-allocated `FfiHttpRequest`.
    pub(crate) fn from_core(req: personas_core::HttpRequest) -> *mut Self {
        let path = c_string(&req.path);
        let body = match req.body {
            Some(b) => c_string(&b),
            None => std::ptr::null_mut(),
        };

        let headers_len = req.headers.len() as u32;
        let headers = if req.headers.is_empty() {
            std::ptr::null_mut()
        } else {
            let ffi_headers: Vec<FfiHeader> = req
                .headers
                .iter()
                .map(|(k, v)| FfiHeader {
                    key: c_string(k),
                    value: c_string(v),
                })
                .collect();
            // A boxed slice has capacity == len, which `free` relies on.
            Box::into_raw(ffi_headers.into_boxed_slice()) as *mut FfiHeader
        };

        Box::into_raw(Box::new(FfiHttpRequest {
            method: req.method.into(),
            path,
            headers,
            headers_len,
            body,
        }))
    }

    /// Release a request produced by `from_core`.
    pub(crate) fn free(req: *mut Self) {
        let req = unsafe { Box::from_raw(req) };
        free_c_string(req.path);
        free_c_string(req.body);
        if !req.headers.is_null() && req.headers_len > 0 {
            let headers = unsafe {
                Box::from_raw(std::ptr::slice_from_raw_parts_mut(
                    req.headers,
                    req.headers_len as usize,
                ))
            };
            for h in headers.iter() {
                free_c_string(h.key);
                free_c_string(h.value);
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Response input (caller-provided, not heap-allocated by us)
// ---------------------------------------------------------------------------

/// An HTTP response described as C-compatible plain data.
///
/// The host builds this on the stack after executing a request. A `status`
/// of 0 reports a transport failure (no response at all); `body` then
/// carries the host's error message. The FFI layer reads but does not free
/// these fields.
#[repr(C)]
pub struct FfiHttpResponse {
    pub status: u16,
    pub body: *const c_char,
}

// ---------------------------------------------------------------------------
// Records
// ---------------------------------------------------------------------------

/// A record exposed to C. All seven fields are always non-null.
#[repr(C)]
pub struct FfiPersona {
    pub identification: *mut c_char,
    pub last_name: *mut c_char,
    pub first_name: *mut c_char,
    pub ruc: *mut c_char,
    pub code: *mut c_char,
    pub verified: *mut c_char,
    pub legal_name: *mut c_char,
}

impl FfiPersona {
    pub(crate) fn from_core(persona: &Persona) -> Self {
        FfiPersona {
            identification: c_string(&persona.identification),
            last_name: c_string(&persona.last_name),
            first_name: c_string(&persona.first_name),
            ruc: c_string(&persona.ruc),
            code: c_string(&persona.code),
            verified: c_string(&persona.verified),
            legal_name: c_string(&persona.legal_name),
        }
    }

    /// Free the C-string fields (but not the struct itself).
    pub(crate) fn free_fields(&self) {
        for field in [
            self.identification,
            self.last_name,
            self.first_name,
            self.ruc,
            self.code,
            self.verified,
            self.legal_name,
        ] {
            free_c_string(field);
        }
    }
}

/// A snapshot of rows exposed to C.
#[repr(C)]
pub struct FfiPersonaList {
    pub items: *mut FfiPersona,
    pub len: u32,
}

impl FfiPersonaList {
    pub(crate) fn from_core<'a>(personas: impl Iterator<Item = &'a Persona>) -> *mut Self {
        let items: Box<[FfiPersona]> = personas.map(FfiPersona::from_core).collect();
        let len = items.len() as u32;
        let items = if items.is_empty() {
            std::ptr::null_mut()
        } else {
            Box::into_raw(items) as *mut FfiPersona
        };
        Box::into_raw(Box::new(FfiPersonaList { items, len }))
    }
}

// ---------------------------------------------------------------------------
// Outcomes
// ---------------------------------------------------------------------------

/// Error categories reported to C.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FfiErrorCode {
    Ok = 0,
    NotFound = 1,
    Http = 2,
    Transport = 3,
    Deserialization = 4,
    Serialization = 5,
    NotEditing = 6,
    Panic = 7,
    NullArg = 8,
}

impl FfiErrorCode {
    /// Error code and HTTP status (0 when there is none).
    pub(crate) fn from_api(err: &ApiError) -> (Self, u16) {
        match err {
            ApiError::NotFound => (FfiErrorCode::NotFound, 404),
            ApiError::Http { status, .. } => (FfiErrorCode::Http, *status),
            ApiError::Transport(_) => (FfiErrorCode::Transport, 0),
            ApiError::Deserialization(_) => (FfiErrorCode::Deserialization, 0),
            ApiError::Serialization(_) => (FfiErrorCode::Serialization, 0),
        }
    }

    pub(crate) fn from_edit(err: &EditError) -> (Self, u16) {
        match err {
            EditError::NotEditing => (FfiErrorCode::NotEditing, 0),
            EditError::Api(api) => Self::from_api(api),
        }
    }
}

#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FfiFilterKind {
    Ruc = 0,
    Verified = 1,
}

impl From<FfiFilterKind> for FilterKind {
    fn from(kind: FfiFilterKind) -> Self {
        match kind {
            FfiFilterKind::Ruc => FilterKind::Ruc,
            FfiFilterKind::Verified => FilterKind::Verified,
        }
    }
}

#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FfiFetchStatus {
    Appended = 0,
    Exhausted = 1,
    Failed = 2,
    Skipped = 3,
}

/// Outcome of `personas_screen_complete_fetch`, returned by value.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FfiFetchResult {
    pub status: FfiFetchStatus,
    pub appended: u32,
    pub error_code: FfiErrorCode,
    pub http_status: u16,
}

impl FfiFetchResult {
    pub(crate) fn from_core(outcome: FetchOutcome) -> Self {
        let (status, appended, (error_code, http_status)) = match &outcome {
            FetchOutcome::Appended(n) => (FfiFetchStatus::Appended, *n as u32, (FfiErrorCode::Ok, 0)),
            FetchOutcome::Exhausted => (FfiFetchStatus::Exhausted, 0, (FfiErrorCode::Ok, 0)),
            FetchOutcome::Skipped => (FfiFetchStatus::Skipped, 0, (FfiErrorCode::Ok, 0)),
            FetchOutcome::Failed(err) => (FfiFetchStatus::Failed, 0, FfiErrorCode::from_api(err)),
        };
        FfiFetchResult {
            status,
            appended,
            error_code,
            http_status,
        }
    }

    pub(crate) fn error(error_code: FfiErrorCode) -> Self {
        FfiFetchResult {
            status: FfiFetchStatus::Failed,
            appended: 0,
            error_code,
            http_status: 0,
        }
    }
}

#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FfiCommitStatus {
    Replaced = 0,
    Unmatched = 1,
    Failed = 2,
}

/// Outcome of `personas_screen_complete_commit`, returned by value.
/// `index` is the replaced position in the full record list, or -1.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FfiCommitResult {
    pub status: FfiCommitStatus,
    pub index: i64,
    pub error_code: FfiErrorCode,
    pub http_status: u16,
}

impl FfiCommitResult {
    pub(crate) fn from_core(outcome: CommitOutcome) -> Self {
        match &outcome {
            CommitOutcome::Replaced(index) => FfiCommitResult {
                status: FfiCommitStatus::Replaced,
                index: *index as i64,
                error_code: FfiErrorCode::Ok,
                http_status: 0,
            },
            CommitOutcome::Unmatched => FfiCommitResult {
                status: FfiCommitStatus::Unmatched,
                index: -1,
                error_code: FfiErrorCode::Ok,
                http_status: 0,
            },
            CommitOutcome::Failed(err) => {
                let (error_code, http_status) = FfiErrorCode::from_edit(err);
                FfiCommitResult {
                    status: FfiCommitStatus::Failed,
                    index: -1,
                    error_code,
                    http_status,
                }
            }
        }
    }

    pub(crate) fn error(error_code: FfiErrorCode) -> Self {
        FfiCommitResult {
            status: FfiCommitStatus::Failed,
            index: -1,
            error_code,
            http_status: 0,
        }
    }
}
