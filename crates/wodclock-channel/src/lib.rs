//! Timer synchronization channel.
//!
//! Keeps one Display and any number of Remotes consistent over a named
//! publish/subscribe channel. The Display publishes state snapshots; Remotes
//! publish commands. The channel is a sidecar: losing it never stops the
//! Display's clock.
//!
//! # Components
//!
//! - [`SyncChannel`]: Connection lifecycle, deduplicated broadcast, command
//!   send, inbound dispatch
//! - [`Transport`] / [`Link`]: Abstraction over the pub/sub backend
//! - [`MemoryHub`]: In-process backend built on `tokio::sync::broadcast`
//! - [`ChannelError`]: Error types

mod channel;
mod error;
mod memory;
mod transport;

pub use channel::{BroadcastOutcome, ConnectionStatus, SyncChannel};
pub use error::ChannelError;
pub use memory::{HubConfig, MemoryHub, MemoryLink};
pub use transport::{Link, LinkEvent, Transport};
