//! Protocol error types.

use thiserror::Error;

/// Result alias for protocol operations.
pub type Result<T> = std::result::Result<T, ProtocolError>;

/// Errors raised while encoding or decoding channel payloads.
#[derive(Debug, Error)]
pub enum ProtocolError {
    /// Payload was not valid JSON or did not match the expected shape.
    #[error("malformed payload: {0}")]
    Malformed(#[from] serde_json::Error),

    /// Payload exceeded the maximum accepted size.
    #[error("payload too large: {size} bytes (max {max})")]
    PayloadTooLarge {
        /// Actual payload size
        size: usize,
        /// Maximum accepted size
        max: usize,
    },

    /// Tenant identifier cannot be used to derive a channel name.
    #[error("invalid tenant identifier: {0:?}")]
    InvalidTenant(String),
}
