//! Error types for the personas client.
//!
//! # Design
//! `NotFound` gets a dedicated variant because the registry answers 404 when
//! an update names a `codigo` it does not know. Every other non-2xx response
//! lands in `Http` with the raw status and body. Failures that produced no
//! response at all are `Transport`, reported by the host.

use thiserror::Error;

/// Errors surfaced by the access layer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// The server returned 404.
    #[error("resource not found")]
    NotFound,

    /// The server returned a non-2xx status other than 404.
    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },

    /// The host could not complete the round-trip.
    #[error("transport failed: {0}")]
    Transport(String),

    /// The response body could not be deserialized into the expected type.
    #[error("deserialization failed: {0}")]
    Deserialization(String),

    /// The request payload could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    Serialization(String),
}

/// Errors from the edit session.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EditError {
    /// No record is open for editing.
    #[error("no record is being edited")]
    NotEditing,

    #[error(transparent)]
    Api(#[from] ApiError),
}
