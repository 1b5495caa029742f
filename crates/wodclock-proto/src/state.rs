//! Timer state snapshot.

use serde::{Deserialize, Serialize};

use crate::Timestamp;

/// Lifecycle of a timer session.
///
/// ```text
/// ┌──────┐ start ┌─────────┐ pause  ┌────────┐
/// │ Idle │──────>│ Running │───────>│ Paused │
/// └──────┘       └─────────┘<───────└────────┘
///                     │      resume      │
///                     │ past last step   │
///                     ↓                  ↓
///                  ┌───────────────────────┐
///                  │       Completed       │
///                  └───────────────────────┘
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimerStatus {
    /// Loaded, not started
    #[default]
    Idle,
    /// Clock is advancing
    Running,
    /// Clock is frozen
    Paused,
    /// Advanced past the last step; terminal
    Completed,
}

impl TimerStatus {
    /// Whether skip/previous are meaningful in this status.
    pub const fn is_active(self) -> bool {
        matches!(self, Self::Running | Self::Paused)
    }
}

/// Authoritative timer state, owned by the Display.
///
/// `elapsed_time` is whole seconds into the current step. While running it is
/// derived from `started_at`; while paused it is the frozen value.
///
/// Field names are camelCase on the wire, matching browser peers; the
/// enclosing [`crate::TimerStateMessage`] keeps snake_case.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimerState {
    /// Lifecycle status
    pub status: TimerStatus,
    /// Index into the flattened timeline
    pub current_step_index: usize,
    /// Whole seconds elapsed in the current step
    pub elapsed_time: u64,
    /// Start of the current run segment; `None` unless running
    pub started_at: Option<Timestamp>,
}
