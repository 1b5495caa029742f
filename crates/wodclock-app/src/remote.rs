//! Remote mirror.
//!
//! A Remote never runs a clock. It shows the last snapshot the Display
//! broadcast and offers the commands that make sense for it.

use wodclock_proto::{CommandAction, RemoteCommand, TimerStateMessage, TimerStatus, Timestamp};

use crate::SessionContext;

/// Read-only view of the Display's timer.
#[derive(Debug, Clone)]
pub struct Remote {
    context: SessionContext,
    mirror: Option<TimerStateMessage>,
    connected: bool,
}

impl Remote {
    /// Create a disconnected Remote with no state yet.
    pub fn new(context: SessionContext) -> Self {
        Self { context, mirror: None, connected: false }
    }

    /// Session identity.
    pub fn context(&self) -> &SessionContext {
        &self.context
    }

    /// Replace the mirror with a Display snapshot.
    ///
    /// The Display is authoritative for the tenant, so snapshots for another
    /// workout are mirrored too.
    pub fn apply_state(&mut self, snapshot: TimerStateMessage) {
        if snapshot.workout_id != self.context.workout_id {
            tracing::debug!(
                expected = %self.context.workout_id,
                running = %snapshot.workout_id,
                "display is running a different workout"
            );
        }
        self.mirror = Some(snapshot);
    }

    /// Record channel connectivity. The mirror survives disconnects.
    pub fn set_connected(&mut self, connected: bool) {
        self.connected = connected;
    }

    /// Last snapshot received, if any.
    pub fn state(&self) -> Option<&TimerStateMessage> {
        self.mirror.as_ref()
    }

    /// Mirrored status, if any snapshot arrived.
    pub fn status(&self) -> Option<TimerStatus> {
        self.mirror.as_ref().map(|m| m.state.status)
    }

    /// True if commands can be sent.
    pub fn can_send(&self) -> bool {
        self.connected
    }

    /// Commands the Display would act on right now. Empty while disconnected.
    pub fn available_actions(&self) -> Vec<CommandAction> {
        if !self.connected {
            return Vec::new();
        }

        match self.status() {
            None | Some(TimerStatus::Idle) => vec![CommandAction::Start],
            Some(TimerStatus::Running) => {
                vec![CommandAction::Pause, CommandAction::Skip, CommandAction::Previous]
            },
            Some(TimerStatus::Paused) => {
                vec![CommandAction::Resume, CommandAction::Skip, CommandAction::Previous]
            },
            Some(TimerStatus::Completed) => Vec::new(),
        }
    }

    /// Stamp a command for sending, or `None` while disconnected.
    ///
    /// Actions outside [`Remote::available_actions`] are still allowed: the
    /// mirror may be stale and the Display ignores what it cannot apply.
    pub fn command(&self, action: CommandAction, now: Timestamp) -> Option<RemoteCommand> {
        self.can_send().then(|| RemoteCommand::new(action, now))
    }
}

#[cfg(test)]
mod tests {
    use wodclock_proto::{TenantId, TimerState, WorkoutId};

    use super::*;

    fn remote() -> Remote {
        Remote::new(SessionContext::remote(
            TenantId::new("crossfit-north").unwrap(),
            WorkoutId::new("fran"),
        ))
    }

    fn snapshot(status: TimerStatus) -> TimerStateMessage {
        TimerStateMessage {
            state: TimerState { status, ..TimerState::default() },
            workout_id: WorkoutId::new("fran"),
            current_section: None,
            current_exercise: None,
            display_time: "00:00".into(),
        }
    }

    #[test]
    fn disconnected_offers_nothing() {
        let mut remote = remote();
        remote.apply_state(snapshot(TimerStatus::Running));

        assert!(!remote.can_send());
        assert!(remote.available_actions().is_empty());
        assert_eq!(remote.command(CommandAction::Pause, Timestamp::ZERO), None);
    }

    #[test]
    fn start_offered_before_first_snapshot() {
        let mut remote = remote();
        remote.set_connected(true);
        assert_eq!(remote.available_actions(), vec![CommandAction::Start]);
    }

    #[test]
    fn actions_follow_status() {
        let mut remote = remote();
        remote.set_connected(true);

        let cases = [
            (TimerStatus::Idle, vec![CommandAction::Start]),
            (TimerStatus::Running, vec![
                CommandAction::Pause,
                CommandAction::Skip,
                CommandAction::Previous,
            ]),
            (TimerStatus::Paused, vec![
                CommandAction::Resume,
                CommandAction::Skip,
                CommandAction::Previous,
            ]),
            (TimerStatus::Completed, vec![]),
        ];

        for (status, expected) in cases {
            remote.apply_state(snapshot(status));
            assert_eq!(remote.available_actions(), expected, "status {status:?}");
        }
    }

    #[test]
    fn mirror_survives_disconnect() {
        let mut remote = remote();
        remote.set_connected(true);
        remote.apply_state(snapshot(TimerStatus::Paused));
        remote.set_connected(false);

        assert_eq!(remote.status(), Some(TimerStatus::Paused));
        assert!(remote.available_actions().is_empty());
    }

    #[test]
    fn command_is_stamped_when_connected() {
        let mut remote = remote();
        remote.set_connected(true);

        let command = remote.command(CommandAction::Skip, Timestamp::from_millis(7));
        assert_eq!(command, Some(RemoteCommand::new(CommandAction::Skip, Timestamp::from_millis(7))));
    }
}
