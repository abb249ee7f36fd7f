//! Platform-independent core of the personas registry screen.
//!
//! # Overview
//! Holds the state behind the registry list: pages loaded so far, the two
//! "NO" filters, and the single-record edit modal. Builds `HttpRequest`
//! values and consumes `HttpResponse` values without touching the network
//! (host-does-IO pattern); the host executes every round-trip.
//!
//! # Design
//! - `PersonasClient` is stateless: it holds only the base URL.
//! - `PageLoader`, `FilterEngine` and `EditSession` each own one concern;
//!   `PersonasScreen` composes them and keeps the displayed rows derived
//!   from the full record list.
//! - `Transport` is the seam for hosts that prefer a blocking call over the
//!   `begin_*`/`complete_*` pairs.
//! - Failures are logged with `tracing` and returned as outcomes; nothing
//!   here is fatal.

pub mod client;
pub mod edit;
pub mod error;
pub mod filter;
pub mod http;
pub mod loader;
pub mod screen;
pub mod types;

pub use client::{PersonasClient, DEFAULT_BASE_URL};
pub use edit::{CommitOutcome, EditSession, PendingCommit};
pub use error::{ApiError, EditError};
pub use filter::{FilterEngine, FilterKind, FilterMode};
pub use http::{HttpMethod, HttpRequest, HttpResponse, Transport};
pub use loader::{EndTrigger, PageLoader, PageOutcome, DEFAULT_PAGE_SIZE};
pub use screen::{FetchOutcome, PersonasScreen, ScreenConfig};
pub use types::{Persona, PersonaField, UnknownField};
