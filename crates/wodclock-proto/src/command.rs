//! Remote commands.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::Timestamp;

/// Operator action a Remote can request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CommandAction {
    /// Begin the workout from the first step
    Start,
    /// Freeze the clock
    Pause,
    /// Unfreeze the clock
    Resume,
    /// Jump to the next step
    Skip,
    /// Jump to the previous step
    Previous,
}

impl CommandAction {
    /// Every action, in display order.
    pub const ALL: [Self; 5] = [Self::Start, Self::Pause, Self::Resume, Self::Skip, Self::Previous];

    /// Wire spelling of this action.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::Pause => "pause",
            Self::Resume => "resume",
            Self::Skip => "skip",
            Self::Previous => "previous",
        }
    }
}

impl fmt::Display for CommandAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CommandAction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|action| action.as_str() == s)
            .ok_or_else(|| format!("unknown action: {s}"))
    }
}

/// Command published by a Remote. Processed at most once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RemoteCommand {
    /// Requested action
    pub action: CommandAction,
    /// Sender's wall clock when the command was issued
    pub timestamp: Timestamp,
}

impl RemoteCommand {
    /// Create a command stamped with `timestamp`.
    pub const fn new(action: CommandAction, timestamp: Timestamp) -> Self {
        Self { action, timestamp }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn action_round_trips_through_str() {
        for action in CommandAction::ALL {
            assert_eq!(action.as_str().parse::<CommandAction>(), Ok(action));
        }
    }

    #[test]
    fn unknown_action_rejected() {
        assert!("rewind".parse::<CommandAction>().is_err());
    }
}
