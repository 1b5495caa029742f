//! Display actions
//!
//! Actions produced by the Display state machine for the runtime to execute.

use wodclock_proto::TimerStateMessage;

/// Actions produced by [`crate::Display::handle`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DisplayAction {
    /// Redraw from [`crate::Display::view`].
    Render,

    /// Publish a snapshot to Remotes.
    Broadcast(TimerStateMessage),
}
