//! CLI error types.

use thiserror::Error;
use wodclock_core::SourceError;
use wodclock_proto::ProtocolError;

/// Errors that end the CLI.
#[derive(Debug, Error)]
pub enum CliError {
    /// The workout could not be loaded.
    #[error(transparent)]
    Source(#[from] SourceError),

    /// An argument failed validation.
    #[error("invalid argument: {0}")]
    Argument(#[from] ProtocolError),

    /// Terminal I/O failed.
    #[error("terminal I/O: {0}")]
    Io(#[from] std::io::Error),

    /// A session task panicked or was aborted.
    #[error("session task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}
