//! C-ABI wrapper around `personas-core`.
//!
//! # Overview
//! Exposes the personas screen through `extern "C"` functions so a mobile
//! host (Swift, Kotlin/JNI, C) can drive the list, its filters and the edit
//! modal while executing every HTTP round-trip itself.
//!
//! # Design
//! - Every `extern "C"` function wraps its body in `catch_unwind` so panics
//!   never cross the FFI boundary.
//! - Fetch and commit are split into `begin_*` (returns the request to run)
//!   and `complete_*` (takes the response), mirroring the core API 1:1.
//! - Outcomes are small `#[repr(C)]` structs returned by value.
//! - The C caller owns all returned pointers and must call the matching
//!   `personas_free_*` function to release them.

pub mod types;

use std::ffi::CStr;
use std::os::raw::c_char;
use std::panic::catch_unwind;

use personas_core::{ApiError, FilterMode, HttpResponse, PersonasScreen, ScreenConfig};
use tracing::error;

use types::*;

/// Read a borrowed C string; null and invalid UTF-8 read as `None`.
fn read_str<'a>(s: *const c_char) -> Option<&'a str> {
    if s.is_null() {
        return None;
    }
    unsafe { CStr::from_ptr(s) }.to_str().ok()
}

/// Convert an `FfiHttpResponse` to the core's view of a round-trip.
fn ffi_response_to_core(resp: &FfiHttpResponse) -> Result<HttpResponse, ApiError> {
    let body = read_str(resp.body).unwrap_or("").to_string();
    if resp.status == 0 {
        return Err(ApiError::Transport(body));
    }
    Ok(HttpResponse::new(resp.status, body))
}

// ---------------------------------------------------------------------------
// Screen lifecycle
// ---------------------------------------------------------------------------

/// Create a screen bound to `base_url` (for example
/// `http://localhost:8080/personas`).
///
/// `page_size` of 0 selects the default of 15. `end_threshold` is the
/// trailing fraction of rendered rows that triggers the next page; a value
/// outside `0.0..=1.0` (or NaN) selects the default of 0.1. Returns null if `base_url`
/// is null or not UTF-8, or if an internal panic occurs. The caller must
/// free the returned pointer with `personas_screen_free`.
#[unsafe(no_mangle)]
pub extern "C" fn personas_screen_new(
    base_url: *const c_char,
    page_size: u32,
    end_threshold: f32,
    conjunctive_filters: bool,
) -> *mut FfiScreen {
    catch_unwind(|| {
        let Some(url) = read_str(base_url) else {
            return std::ptr::null_mut();
        };
        let defaults = ScreenConfig::default();
        let config = ScreenConfig {
            base_url: url.to_string(),
            page_size: if page_size == 0 { defaults.page_size } else { page_size },
            end_threshold: if (0.0..=1.0).contains(&end_threshold) {
                end_threshold
            } else {
                defaults.end_threshold
            },
            filter_mode: if conjunctive_filters {
                FilterMode::Conjunctive
            } else {
                FilterMode::Exclusive
            },
            ..defaults
        };
        Box::into_raw(Box::new(FfiScreen {
            inner: PersonasScreen::new(config),
        }))
    })
    .unwrap_or(std::ptr::null_mut())
}

/// Free a screen created by `personas_screen_new`. Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn personas_screen_free(screen: *mut FfiScreen) {
    if !screen.is_null() {
        let _ = catch_unwind(|| {
            drop(unsafe { Box::from_raw(screen) });
        });
    }
}

// ---------------------------------------------------------------------------
// Loading
// ---------------------------------------------------------------------------

/// Start fetching the next page.
///
/// Returns the request to execute, or null when a fetch is already in flight,
/// the registry is exhausted, or `screen` is null. Free the request with
/// `personas_free_request`.
#[unsafe(no_mangle)]
pub extern "C" fn personas_screen_begin_fetch(screen: *mut FfiScreen) -> *mut FfiHttpRequest {
    catch_unwind(|| {
        if screen.is_null() {
            return std::ptr::null_mut();
        }
        let screen = unsafe { &mut *screen };
        match screen.inner.begin_fetch() {
            Some(req) => FfiHttpRequest::from_core(req),
            None => std::ptr::null_mut(),
        }
    })
    .unwrap_or(std::ptr::null_mut())
}

/// Hand back the response for the request from `personas_screen_begin_fetch`.
#[unsafe(no_mangle)]
pub extern "C" fn personas_screen_complete_fetch(
    screen: *mut FfiScreen,
    response: *const FfiHttpResponse,
) -> FfiFetchResult {
    catch_unwind(|| {
        if screen.is_null() || response.is_null() {
            return FfiFetchResult::error(FfiErrorCode::NullArg);
        }
        let screen = unsafe { &mut *screen };
        let resp = unsafe { &*response };
        FfiFetchResult::from_core(screen.inner.complete_fetch(ffi_response_to_core(resp)))
    })
    .unwrap_or_else(|_| {
        error!("panic in personas_screen_complete_fetch");
        FfiFetchResult::error(FfiErrorCode::Panic)
    })
}

/// Whether a scroll leaving row `last_visible` as the last one on screen
/// should start the next fetch.
#[unsafe(no_mangle)]
pub extern "C" fn personas_screen_wants_more(screen: *const FfiScreen, last_visible: u32) -> bool {
    catch_unwind(|| {
        if screen.is_null() {
            return false;
        }
        let screen = unsafe { &*screen };
        screen.inner.wants_more(last_visible as usize)
    })
    .unwrap_or(false)
}

#[unsafe(no_mangle)]
pub extern "C" fn personas_screen_has_more(screen: *const FfiScreen) -> bool {
    if screen.is_null() {
        return false;
    }
    unsafe { &*screen }.inner.loader().has_more()
}

#[unsafe(no_mangle)]
pub extern "C" fn personas_screen_is_loading(screen: *const FfiScreen) -> bool {
    if screen.is_null() {
        return false;
    }
    unsafe { &*screen }.inner.loader().is_loading()
}

/// The next page the screen will request (1-based), or 0 for a null screen.
#[unsafe(no_mangle)]
pub extern "C" fn personas_screen_page(screen: *const FfiScreen) -> u32 {
    if screen.is_null() {
        return 0;
    }
    unsafe { &*screen }.inner.loader().page()
}

// ---------------------------------------------------------------------------
// Filters and rows
// ---------------------------------------------------------------------------

/// Flip the RUC filter; returns its new state.
#[unsafe(no_mangle)]
pub extern "C" fn personas_screen_toggle_ruc_filter(screen: *mut FfiScreen) -> bool {
    personas_screen_toggle_filter(screen, FfiFilterKind::Ruc)
}

/// Flip the verified filter; returns its new state.
#[unsafe(no_mangle)]
pub extern "C" fn personas_screen_toggle_verified_filter(screen: *mut FfiScreen) -> bool {
    personas_screen_toggle_filter(screen, FfiFilterKind::Verified)
}

#[unsafe(no_mangle)]
pub extern "C" fn personas_screen_toggle_filter(screen: *mut FfiScreen, kind: FfiFilterKind) -> bool {
    catch_unwind(|| {
        if screen.is_null() {
            return false;
        }
        let screen = unsafe { &mut *screen };
        screen.inner.toggle_filter(kind.into())
    })
    .unwrap_or(false)
}

#[unsafe(no_mangle)]
pub extern "C" fn personas_screen_filter_enabled(screen: *const FfiScreen, kind: FfiFilterKind) -> bool {
    if screen.is_null() {
        return false;
    }
    unsafe { &*screen }.inner.is_filter_enabled(kind.into())
}

/// Snapshot of the displayed rows. Free with `personas_free_persona_list`.
#[unsafe(no_mangle)]
pub extern "C" fn personas_screen_displayed(screen: *const FfiScreen) -> *mut FfiPersonaList {
    catch_unwind(|| {
        if screen.is_null() {
            return std::ptr::null_mut();
        }
        let screen = unsafe { &*screen };
        FfiPersonaList::from_core(screen.inner.displayed())
    })
    .unwrap_or(std::ptr::null_mut())
}

// ---------------------------------------------------------------------------
// Edit modal
// ---------------------------------------------------------------------------

/// Open the edit modal on displayed row `row`. Returns false if there is no
/// such row.
#[unsafe(no_mangle)]
pub extern "C" fn personas_screen_open_row(screen: *mut FfiScreen, row: u32) -> bool {
    catch_unwind(|| {
        if screen.is_null() {
            return false;
        }
        let screen = unsafe { &mut *screen };
        screen.inner.open_row(row as usize)
    })
    .unwrap_or(false)
}

#[unsafe(no_mangle)]
pub extern "C" fn personas_screen_is_editing(screen: *const FfiScreen) -> bool {
    if screen.is_null() {
        return false;
    }
    unsafe { &*screen }.inner.editor().is_visible()
}

/// Snapshot of the edit buffer, or null when the modal is closed.
/// Free with `personas_free_persona`.
#[unsafe(no_mangle)]
pub extern "C" fn personas_screen_edit_buffer(screen: *const FfiScreen) -> *mut FfiPersona {
    catch_unwind(|| {
        if screen.is_null() {
            return std::ptr::null_mut();
        }
        let screen = unsafe { &*screen };
        match screen.inner.editor().buffer() {
            Some(persona) => Box::into_raw(Box::new(FfiPersona::from_core(persona))),
            None => std::ptr::null_mut(),
        }
    })
    .unwrap_or(std::ptr::null_mut())
}

/// Set field `name` (registry or English name) of the edit buffer.
#[unsafe(no_mangle)]
pub extern "C" fn personas_screen_set_field(
    screen: *mut FfiScreen,
    name: *const c_char,
    value: *const c_char,
) -> FfiErrorCode {
    catch_unwind(|| {
        if screen.is_null() {
            return FfiErrorCode::NullArg;
        }
        let (Some(name), Some(value)) = (read_str(name), read_str(value)) else {
            return FfiErrorCode::NullArg;
        };
        let screen = unsafe { &mut *screen };
        match screen.inner.set_field_by_name(name, value) {
            Ok(()) => FfiErrorCode::Ok,
            Err(err) => FfiErrorCode::from_edit(&err).0,
        }
    })
    .unwrap_or(FfiErrorCode::Panic)
}

/// Close the modal and discard the buffer.
#[unsafe(no_mangle)]
pub extern "C" fn personas_screen_cancel_edit(screen: *mut FfiScreen) {
    if !screen.is_null() {
        let _ = catch_unwind(|| {
            unsafe { &mut *screen }.inner.cancel_edit();
        });
    }
}

/// Snapshot the edit buffer into a commit. Returns null when the modal is
/// closed. Get the request with `personas_pending_commit_request`, then pass
/// the handle to `personas_screen_complete_commit` (which frees it) or
/// `personas_free_pending_commit`.
#[unsafe(no_mangle)]
pub extern "C" fn personas_screen_begin_commit(screen: *const FfiScreen) -> *mut FfiPendingCommit {
    catch_unwind(|| {
        if screen.is_null() {
            return std::ptr::null_mut();
        }
        let screen = unsafe { &*screen };
        match screen.inner.begin_commit() {
            Ok(pending) => Box::into_raw(Box::new(FfiPendingCommit { inner: pending })),
            Err(err) => {
                error!(error = %err, "begin_commit rejected");
                std::ptr::null_mut()
            }
        }
    })
    .unwrap_or(std::ptr::null_mut())
}

/// The update request carried by `pending`. Free with `personas_free_request`.
#[unsafe(no_mangle)]
pub extern "C" fn personas_pending_commit_request(
    pending: *const FfiPendingCommit,
) -> *mut FfiHttpRequest {
    catch_unwind(|| {
        if pending.is_null() {
            return std::ptr::null_mut();
        }
        let pending = unsafe { &*pending };
        FfiHttpRequest::from_core(pending.inner.request.clone())
    })
    .unwrap_or(std::ptr::null_mut())
}

/// Hand back the response to a commit. Consumes `pending`.
#[unsafe(no_mangle)]
pub extern "C" fn personas_screen_complete_commit(
    screen: *mut FfiScreen,
    pending: *mut FfiPendingCommit,
    response: *const FfiHttpResponse,
) -> FfiCommitResult {
    catch_unwind(|| {
        if pending.is_null() {
            return FfiCommitResult::error(FfiErrorCode::NullArg);
        }
        let pending = unsafe { Box::from_raw(pending) };
        if screen.is_null() || response.is_null() {
            return FfiCommitResult::error(FfiErrorCode::NullArg);
        }
        let screen = unsafe { &mut *screen };
        let resp = unsafe { &*response };
        FfiCommitResult::from_core(
            screen
                .inner
                .complete_commit(pending.inner, ffi_response_to_core(resp)),
        )
    })
    .unwrap_or_else(|_| {
        error!("panic in personas_screen_complete_commit");
        FfiCommitResult::error(FfiErrorCode::Panic)
    })
}

// ---------------------------------------------------------------------------
// Free functions
// ---------------------------------------------------------------------------

/// Free an `FfiHttpRequest`. Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn personas_free_request(req: *mut FfiHttpRequest) {
    if req.is_null() {
        return;
    }
    let _ = catch_unwind(|| FfiHttpRequest::free(req));
}

/// Free an `FfiPersona` from `personas_screen_edit_buffer`. Safe to call
/// with null.
#[unsafe(no_mangle)]
pub extern "C" fn personas_free_persona(persona: *mut FfiPersona) {
    if persona.is_null() {
        return;
    }
    let _ = catch_unwind(|| {
        let persona = unsafe { Box::from_raw(persona) };
        persona.free_fields();
    });
}

/// Free an `FfiPersonaList` from `personas_screen_displayed`. Safe to call
/// with null.
#[unsafe(no_mangle)]
pub extern "C" fn personas_free_persona_list(list: *mut FfiPersonaList) {
    if list.is_null() {
        return;
    }
    let _ = catch_unwind(|| {
        let list = unsafe { Box::from_raw(list) };
        if !list.items.is_null() && list.len > 0 {
            let items = unsafe {
                Box::from_raw(std::ptr::slice_from_raw_parts_mut(list.items, list.len as usize))
            };
            for item in items.iter() {
                item.free_fields();
            }
        }
    });
}

/// Free a pending commit that will not be completed. Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn personas_free_pending_commit(pending: *mut FfiPendingCommit) {
    if !pending.is_null() {
        let _ = catch_unwind(|| {
            drop(unsafe { Box::from_raw(pending) });
        });
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
