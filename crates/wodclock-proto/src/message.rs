//! Channel messages and their envelope.
//!
//! Every publish carries exactly one [`ChannelMessage`], encoded as
//! `{"event": <name>, "payload": <body>}`. The event name selects the payload
//! type:
//!
//! | Event           | Direction        | Payload               |
//! |-----------------|------------------|-----------------------|
//! | `timer:state`   | Display → Remote | [`TimerStateMessage`] |
//! | `timer:command` | Remote → Display | [`RemoteCommand`]     |

use std::fmt;

use bytes::Bytes;
use serde::{Deserialize, Serialize};

use crate::{ProtocolError, RemoteCommand, Result, TimerState};

/// Identifier of a stored workout.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WorkoutId(String);

impl WorkoutId {
    /// Wrap a workout identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The raw identifier.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for WorkoutId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Snapshot broadcast by the Display after state changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerStateMessage {
    /// Authoritative timer state
    pub state: TimerState,
    /// Workout being run
    pub workout_id: WorkoutId,
    /// Section of the current step, if any
    pub current_section: Option<String>,
    /// Exercise of the current step, if any
    pub current_exercise: Option<String>,
    /// Clock text as shown on the Display
    pub display_time: String,
}

/// A message on the timer channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", content = "payload")]
pub enum ChannelMessage {
    /// Display state snapshot
    #[serde(rename = "timer:state")]
    State(TimerStateMessage),
    /// Remote command
    #[serde(rename = "timer:command")]
    Command(RemoteCommand),
}

impl ChannelMessage {
    /// Largest payload accepted by [`ChannelMessage::decode`].
    pub const MAX_PAYLOAD_SIZE: usize = 64 * 1024;

    /// Event name carried in the envelope.
    pub const fn event_name(&self) -> &'static str {
        match self {
            Self::State(_) => "timer:state",
            Self::Command(_) => "timer:command",
        }
    }

    /// Encode into the JSON envelope.
    pub fn encode(&self) -> Result<Bytes> {
        Ok(Bytes::from(serde_json::to_vec(self)?))
    }

    /// Decode a JSON envelope.
    ///
    /// Unknown event names, missing fields and oversize payloads are all
    /// errors; the caller is expected to drop the message.
    pub fn decode(bytes: &[u8]) -> Result<Self> {
        if bytes.len() > Self::MAX_PAYLOAD_SIZE {
            return Err(ProtocolError::PayloadTooLarge {
                size: bytes.len(),
                max: Self::MAX_PAYLOAD_SIZE,
            });
        }
        Ok(serde_json::from_slice(bytes)?)
    }
}

impl From<TimerStateMessage> for ChannelMessage {
    fn from(msg: TimerStateMessage) -> Self {
        Self::State(msg)
    }
}

impl From<RemoteCommand> for ChannelMessage {
    fn from(cmd: RemoteCommand) -> Self {
        Self::Command(cmd)
    }
}
