//! Reference timer model.
//!
//! A deliberately naive restatement of the timer rules, used as the oracle in
//! model-based tests. It shares no code with [`wodclock_core::TimerEngine`]
//! beyond the state vocabulary.

use std::time::Duration;

use wodclock_core::{Timeline, TimerMode};
use wodclock_proto::{CommandAction, TimerState, TimerStatus, Timestamp};

/// One operation in a generated scenario.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    /// Operator command
    Command(CommandAction),
    /// Clock tick
    Tick,
    /// Move the clock forward
    Advance {
        /// Milliseconds to advance
        millis: u64,
    },
}

#[derive(Debug, Clone, Copy)]
struct Step {
    secs: u64,
    countdown: bool,
}

/// Reference implementation of the timer rules.
#[derive(Debug, Clone)]
pub struct TimerModel {
    steps: Vec<Step>,
    status: TimerStatus,
    index: usize,
    elapsed: u64,
    started_at: Option<u64>,
}

impl TimerModel {
    /// Model an idle timer over `timeline`.
    pub fn new(timeline: &Timeline) -> Self {
        let steps = timeline
            .iter()
            .map(|step| Step {
                secs: step.round.duration.as_secs(),
                countdown: step.round.mode == TimerMode::Countdown,
            })
            .collect();
        Self { steps, status: TimerStatus::Idle, index: 0, elapsed: 0, started_at: None }
    }

    /// Model state in wire form.
    pub fn state(&self) -> TimerState {
        TimerState {
            status: self.status,
            current_step_index: self.index,
            elapsed_time: self.elapsed,
            started_at: self.started_at.map(Timestamp::from_millis),
        }
    }

    /// Apply a command at `now`.
    pub fn apply(&mut self, action: CommandAction, now: Timestamp) {
        let now = now.as_millis();
        match (action, self.status) {
            (CommandAction::Start, TimerStatus::Idle) => {
                self.status = TimerStatus::Running;
                self.index = 0;
                self.elapsed = 0;
                self.started_at = Some(now);
                if self.steps.is_empty() {
                    self.finish();
                }
            },
            (CommandAction::Pause, TimerStatus::Running) => {
                self.tick_at(now);
                if self.status == TimerStatus::Running {
                    self.elapsed = self.seconds_since_start(now);
                    self.status = TimerStatus::Paused;
                    self.started_at = None;
                }
            },
            (CommandAction::Resume, TimerStatus::Paused) => {
                self.status = TimerStatus::Running;
                self.started_at = Some(now.saturating_sub(self.elapsed * 1_000));
            },
            (CommandAction::Skip, TimerStatus::Running | TimerStatus::Paused) => {
                self.next(now);
            },
            (CommandAction::Previous, TimerStatus::Running | TimerStatus::Paused) => {
                self.go_to(self.index.saturating_sub(1), now);
            },
            _ => {},
        }
    }

    /// Tick at `now`.
    pub fn tick(&mut self, now: Timestamp) {
        if self.status == TimerStatus::Running {
            self.tick_at(now.as_millis());
        }
    }

    /// Length of the current step, if any.
    pub fn current_duration(&self) -> Option<Duration> {
        self.steps.get(self.index).map(|s| Duration::from_secs(s.secs))
    }

    fn tick_at(&mut self, now: u64) {
        let elapsed = self.seconds_since_start(now);
        match self.steps.get(self.index) {
            Some(step) if step.countdown && elapsed >= step.secs => self.next(now),
            _ => self.elapsed = elapsed,
        }
    }

    fn seconds_since_start(&self, now: u64) -> u64 {
        self.started_at.map_or(self.elapsed, |start| now.saturating_sub(start) / 1_000)
    }

    fn next(&mut self, now: u64) {
        if self.index + 1 < self.steps.len() {
            self.go_to(self.index + 1, now);
        } else {
            self.finish();
        }
    }

    fn go_to(&mut self, index: usize, now: u64) {
        self.index = index;
        self.elapsed = 0;
        self.started_at = if self.status == TimerStatus::Running { Some(now) } else { None };
    }

    fn finish(&mut self) {
        self.status = TimerStatus::Completed;
        self.elapsed = 0;
        self.started_at = None;
    }
}
