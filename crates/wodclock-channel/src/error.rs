//! Channel error types.

use thiserror::Error;
use wodclock_proto::ProtocolError;

/// Errors from the synchronization channel and its transports.
#[derive(Debug, Error)]
pub enum ChannelError {
    /// No active subscription.
    #[error("not connected")]
    NotConnected,

    /// The subscription was closed by the transport.
    #[error("channel closed")]
    Closed,

    /// The backend refused or failed the operation.
    #[error("transport error: {0}")]
    Transport(String),

    /// A payload could not be encoded.
    #[error(transparent)]
    Protocol(#[from] ProtocolError),
}
