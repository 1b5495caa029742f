//! Timer state machine.
//!
//! Walks a [`Timeline`] under wall-clock time and operator commands.
//!
//! # Architecture: Time as a Parameter
//!
//! - Methods accept `now` (no stored clock)
//! - Methods return the [`TimerEvent`]s they caused; empty means no-op
//! - Drivers decide when to tick and what to do with the events
//!
//! Elapsed time is never accumulated from tick counts. While running it is
//! recomputed as `floor((now - started_at) / 1s)`, so a late or dropped tick
//! only delays the display, it never skews it. Pausing freezes the elapsed
//! seconds; resuming shifts `started_at` back by that amount so the next
//! recomputation continues where the pause left off.
//!
//! # State Machine
//!
//! ```text
//! ┌──────┐ start ┌─────────┐ pause  ┌────────┐
//! │ Idle │──────>│ Running │───────>│ Paused │
//! └──────┘       └─────────┘<───────└────────┘
//!                  │  ↺ skip/prev     │  ↺ skip/prev
//!                  │ advance past     │ skip past
//!                  │ last step        │ last step
//!                  ↓                  ↓
//!               ┌──────────────────────────┐
//!               │        Completed         │
//!               └──────────────────────────┘
//! ```
//!
//! Commands that are not valid in the current status are ignored. Remotes
//! race each other and the clock, so an out-of-place `pause` is expected
//! traffic, not a fault.

use std::time::Duration;

use wodclock_proto::{CommandAction, TimerState, TimerStatus, Timestamp};

use crate::{
    duration::format_clock,
    observer::{ListenerId, Observers},
    timeline::{FlatStep, Timeline},
    workout::TimerMode,
};

/// Observable consequence of a timer operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerEvent {
    /// Session started on the first step
    Started,
    /// Clock frozen with this many seconds elapsed
    Paused {
        /// Frozen elapsed seconds
        elapsed: u64,
    },
    /// Clock unfrozen
    Resumed,
    /// Moved to another step
    StepChanged {
        /// Previous index
        from: usize,
        /// New index
        to: usize,
    },
    /// Whole-second elapsed time changed
    Elapsed {
        /// Seconds into the current step
        seconds: u64,
    },
    /// Advanced past the last step
    Completed,
}

/// Authoritative timer for one session.
#[derive(Debug)]
pub struct TimerEngine {
    timeline: Timeline,
    state: TimerState,
    observers: Observers,
}

impl TimerEngine {
    /// Create an idle timer over `timeline`.
    pub fn new(timeline: Timeline) -> Self {
        Self { timeline, state: TimerState::default(), observers: Observers::default() }
    }

    /// Current state.
    pub fn state(&self) -> TimerState {
        self.state
    }

    /// Current status.
    pub fn status(&self) -> TimerStatus {
        self.state.status
    }

    /// Timeline being walked.
    pub fn timeline(&self) -> &Timeline {
        &self.timeline
    }

    /// Step under the cursor, if the timeline is not empty.
    pub fn current_step(&self) -> Option<&FlatStep> {
        self.timeline.get(self.state.current_step_index)
    }

    /// Step after the cursor, for "up next" previews.
    pub fn next_step(&self) -> Option<&FlatStep> {
        self.timeline.next_after(self.state.current_step_index)
    }

    /// Register a state-change listener.
    pub fn subscribe<F>(&mut self, listener: F) -> ListenerId
    where
        F: FnMut(&TimerState, &[TimerEvent]) + Send + 'static,
    {
        self.observers.subscribe(listener)
    }

    /// Remove a state-change listener.
    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        self.observers.unsubscribe(id)
    }

    /// Apply an operator action.
    pub fn apply(&mut self, action: CommandAction, now: Timestamp) -> Vec<TimerEvent> {
        match action {
            CommandAction::Start => self.start(now),
            CommandAction::Pause => self.pause(now),
            CommandAction::Resume => self.resume(now),
            CommandAction::Skip => self.skip(now),
            CommandAction::Previous => self.previous(now),
        }
    }

    /// Start from the first step. Only valid while idle.
    ///
    /// An empty timeline completes immediately.
    pub fn start(&mut self, now: Timestamp) -> Vec<TimerEvent> {
        if self.state.status != TimerStatus::Idle {
            return self.ignore("start");
        }

        let mut events = vec![TimerEvent::Started];
        self.state = TimerState {
            status: TimerStatus::Running,
            current_step_index: 0,
            elapsed_time: 0,
            started_at: Some(now),
        };

        if self.timeline.is_empty() {
            self.complete(&mut events);
        }

        self.emit(events)
    }

    /// Freeze the clock. Only valid while running.
    ///
    /// Time up to `now` is applied first, so a countdown that already expired
    /// advances (or completes) before the pause takes effect.
    pub fn pause(&mut self, now: Timestamp) -> Vec<TimerEvent> {
        if self.state.status != TimerStatus::Running {
            return self.ignore("pause");
        }

        let mut events = self.advance_clock(now);
        if self.state.status == TimerStatus::Running {
            let elapsed = self.elapsed_at(now);
            self.state.status = TimerStatus::Paused;
            self.state.elapsed_time = elapsed;
            self.state.started_at = None;
            events.push(TimerEvent::Paused { elapsed });
        }

        self.emit(events)
    }

    /// Unfreeze the clock. Only valid while paused.
    pub fn resume(&mut self, now: Timestamp) -> Vec<TimerEvent> {
        if self.state.status != TimerStatus::Paused {
            return self.ignore("resume");
        }

        self.state.status = TimerStatus::Running;
        self.state.started_at =
            Some(now.saturating_sub(Duration::from_secs(self.state.elapsed_time)));

        self.emit(vec![TimerEvent::Resumed])
    }

    /// Move to the next step, completing past the last one. Only valid while
    /// running or paused.
    pub fn skip(&mut self, now: Timestamp) -> Vec<TimerEvent> {
        if !self.state.status.is_active() {
            return self.ignore("skip");
        }

        let mut events = Vec::new();
        self.step_forward(now, &mut events);
        self.emit(events)
    }

    /// Move to the previous step, restarting the first step when already
    /// there. Only valid while running or paused.
    pub fn previous(&mut self, now: Timestamp) -> Vec<TimerEvent> {
        if !self.state.status.is_active() {
            return self.ignore("previous");
        }

        let from = self.state.current_step_index;
        let to = from.saturating_sub(1);
        self.move_to(to, now);

        // At the first step, "previous" restarts it.
        let event = if from == to {
            TimerEvent::Elapsed { seconds: 0 }
        } else {
            TimerEvent::StepChanged { from, to }
        };
        self.emit(vec![event])
    }

    /// Recompute elapsed time and auto-advance expired countdowns. Only
    /// active while running.
    pub fn tick(&mut self, now: Timestamp) -> Vec<TimerEvent> {
        if self.state.status != TimerStatus::Running {
            return Vec::new();
        }

        let events = self.advance_clock(now);
        self.emit(events)
    }

    /// Clock text: remaining time for countdowns, elapsed time for count-ups.
    pub fn display_time(&self) -> String {
        if self.state.status == TimerStatus::Completed {
            return format_clock(0);
        }

        let Some(step) = self.current_step() else {
            return format_clock(0);
        };

        let shown = match step.round.mode {
            TimerMode::Countdown => step.round.duration.as_secs().saturating_sub(self.state.elapsed_time),
            TimerMode::Countup => self.state.elapsed_time,
        };
        format_clock(shown)
    }

    /// Fraction of steps already passed, in `[0, 1)`. Zero for an empty
    /// timeline.
    pub fn progress(&self) -> f64 {
        if self.timeline.is_empty() {
            return 0.0;
        }
        self.state.current_step_index as f64 / self.timeline.len() as f64
    }

    fn advance_clock(&mut self, now: Timestamp) -> Vec<TimerEvent> {
        let mut events = Vec::new();
        let elapsed = self.elapsed_at(now);

        let expired = self.current_step().is_some_and(|step| {
            step.round.mode == TimerMode::Countdown && elapsed >= step.round.duration.as_secs()
        });

        if expired {
            self.step_forward(now, &mut events);
        } else if elapsed != self.state.elapsed_time {
            self.state.elapsed_time = elapsed;
            events.push(TimerEvent::Elapsed { seconds: elapsed });
        }

        events
    }

    fn step_forward(&mut self, now: Timestamp, events: &mut Vec<TimerEvent>) {
        let from = self.state.current_step_index;
        let to = from + 1;

        if to >= self.timeline.len() {
            self.complete(events);
            return;
        }

        self.move_to(to, now);
        events.push(TimerEvent::StepChanged { from, to });
    }

    fn move_to(&mut self, index: usize, now: Timestamp) {
        self.state.current_step_index = index;
        self.state.elapsed_time = 0;
        self.state.started_at = (self.state.status == TimerStatus::Running).then_some(now);
    }

    fn complete(&mut self, events: &mut Vec<TimerEvent>) {
        self.state.status = TimerStatus::Completed;
        self.state.elapsed_time = 0;
        self.state.started_at = None;
        events.push(TimerEvent::Completed);
        tracing::debug!(steps = self.timeline.len(), "timer completed");
    }

    fn elapsed_at(&self, now: Timestamp) -> u64 {
        self.state
            .started_at
            .map_or(self.state.elapsed_time, |started| now.saturating_since(started).as_secs())
    }

    fn ignore(&self, operation: &'static str) -> Vec<TimerEvent> {
        tracing::trace!(operation, status = ?self.state.status, "ignored timer operation");
        Vec::new()
    }

    fn emit(&mut self, events: Vec<TimerEvent>) -> Vec<TimerEvent> {
        if !events.is_empty() {
            tracing::debug!(?events, state = ?self.state, "timer state changed");
            self.observers.notify(&self.state, &events);
        }
        events
    }
}
