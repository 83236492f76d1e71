//! Transformation modules between the bridge surface and the provider wire
//! formats.
//!
//! Requests flow surface -> provider (`request`), replies flow provider ->
//! normalized envelope (`response`). Shared content helpers live in `lib`.
//! Builders validate their required fields so the error strings surfaced to
//! callers live in one place.

pub mod lib;
pub mod request;
pub mod response;

// Re-export commonly used items for convenience
pub use lib::*;
pub use request::*;
pub use response::*;

use thiserror::Error;

/// Errors raised while building a provider payload from a surface request.
#[derive(Debug, Error)]
pub enum TransformError {
    /// A required field is absent or empty; the message is caller-facing.
    #[error("{0}")]
    MissingField(String),
    #[error(transparent)]
    Serialization(#[from] serde_json::Error),
}
