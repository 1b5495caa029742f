//! Wire vocabulary for the wodclock timer channel.
//!
//! Everything that crosses the publish/subscribe channel between a Display and
//! its Remotes is defined here: the timer state snapshot, the remote command,
//! and the envelope that tags each payload with its event name.
//!
//! Payloads are JSON. The channel is shared with non-Rust peers (browser
//! displays, phone remotes), so field names and enum spellings are part of the
//! contract and are pinned by snapshot tests.
//!
//! # Security
//!
//! Decoding never trusts the sender. Any payload that fails to parse is
//! reported as a [`ProtocolError`] and callers drop it. There is no
//! authentication beyond knowing the tenant's [`ChannelName`].
#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod channel_name;
pub mod command;
pub mod errors;
pub mod message;
pub mod state;
pub mod timestamp;

pub use channel_name::{ChannelName, TenantId};
pub use command::{CommandAction, RemoteCommand};
pub use errors::{ProtocolError, Result};
pub use message::{ChannelMessage, TimerStateMessage, WorkoutId};
pub use state::{TimerState, TimerStatus};
pub use timestamp::Timestamp;
