//! Error types for the protocol crate.

use thiserror::Error;

/// Result type for protocol operations.
pub type ProtocolResult<T> = Result<T, ProtocolError>;

/// Errors that can occur while parsing wire values.
#[derive(Error, Debug)]
pub enum ProtocolError {
    /// A revision field was not a valid 16-bit number.
    #[error("invalid revision: {0:?}")]
    InvalidRevision(String),

    /// A numeric field could not be parsed.
    #[error("invalid number: {0:?}")]
    InvalidNumber(String),

    /// A colour field was not of the form `#rrggbb`.
    #[error("invalid colour: {0:?}")]
    InvalidColor(String),

    /// A payload could not be decoded.
    #[error("invalid payload: {0}")]
    Json(#[from] serde_json::Error),
}
