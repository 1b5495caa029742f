//! Display events
//!
//! Inputs to the Display state machine.

use wodclock_proto::{CommandAction, RemoteCommand};

/// Inputs to [`crate::Display::handle`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayEvent {
    /// Periodic clock tick.
    Tick,

    /// Command received from a Remote.
    Command(RemoteCommand),

    /// Operator pressed a control on the Display itself.
    Local(CommandAction),

    /// Channel (re)established; Remotes need the current state.
    Connected,
}
