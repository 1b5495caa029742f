//! Display state machine.
//!
//! Owns the one authoritative [`TimerEngine`] of a session. Pure: it receives
//! [`DisplayEvent`]s with the current time and returns [`DisplayAction`]s; the
//! runtime performs the I/O.

use std::time::Duration;

use wodclock_core::{
    FlatStep, ListenerId, Timeline, TimerEngine, TimerEvent, Workout, WorkoutSource,
    error::SourceError, timeline::DEFAULT_SECTION_COLOR,
};
use wodclock_proto::{TimerState, TimerStateMessage, TimerStatus, Timestamp};

use crate::{DisplayAction, DisplayEvent, SessionContext};

/// Preview of the step after the current one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpNext {
    /// Section name
    pub section: String,
    /// Exercise name
    pub exercise: String,
    /// Round length
    pub duration: Duration,
}

/// Everything a renderer needs for one frame.
#[derive(Debug, Clone, PartialEq)]
pub struct DisplayView {
    /// Workout title
    pub workout_name: String,
    /// Timer status
    pub status: TimerStatus,
    /// Clock text
    pub display_time: String,
    /// Current section, if any
    pub section: Option<String>,
    /// Background colour of the current section
    pub section_color: String,
    /// Current exercise, if any
    pub exercise: Option<String>,
    /// One-based position of the current step
    pub step: usize,
    /// Number of steps
    pub steps: usize,
    /// The step after this one
    pub up_next: Option<UpNext>,
    /// Fraction of steps passed
    pub progress: f64,
    /// Workout length, excluding excluded sections and rounds
    pub total_duration: Duration,
}

/// Authoritative timer session.
#[derive(Debug)]
pub struct Display {
    context: SessionContext,
    workout_name: String,
    engine: TimerEngine,
}

impl Display {
    /// Create a Display running `workout`.
    pub fn new(context: SessionContext, workout: &Workout) -> Self {
        let timeline = Timeline::flatten(workout);
        tracing::info!(
            workout = %workout.id,
            steps = timeline.len(),
            total_secs = timeline.total_duration().as_secs(),
            "workout loaded"
        );
        Self { context, workout_name: workout.name.clone(), engine: TimerEngine::new(timeline) }
    }

    /// Load the context's workout from `source` and create a Display for it.
    ///
    /// # Errors
    ///
    /// Returns the source's error if the workout cannot be loaded.
    pub fn load<S>(source: &S, context: SessionContext) -> Result<Self, SourceError>
    where
        S: WorkoutSource + ?Sized,
    {
        let workout = source.load(&context.workout_id)?;
        Ok(Self::new(context, &workout))
    }

    /// Session identity.
    pub fn context(&self) -> &SessionContext {
        &self.context
    }

    /// Current timer state.
    pub fn state(&self) -> TimerState {
        self.engine.state()
    }

    /// Underlying timer.
    pub fn engine(&self) -> &TimerEngine {
        &self.engine
    }

    /// Register a timer state-change listener.
    pub fn subscribe<F>(&mut self, listener: F) -> ListenerId
    where
        F: FnMut(&TimerState, &[TimerEvent]) + Send + 'static,
    {
        self.engine.subscribe(listener)
    }

    /// Process one event.
    ///
    /// Returns nothing when the event changed nothing: ignored commands and
    /// ticks within the same second cost no render and no broadcast.
    pub fn handle(&mut self, event: DisplayEvent, now: Timestamp) -> Vec<DisplayAction> {
        let events = match event {
            DisplayEvent::Tick => self.engine.tick(now),
            DisplayEvent::Command(command) => {
                tracing::debug!(
                    action = %command.action,
                    latency_ms = now.saturating_since(command.timestamp).as_millis(),
                    "remote command"
                );
                self.engine.apply(command.action, now)
            },
            DisplayEvent::Local(action) => {
                tracing::debug!(%action, "local command");
                self.engine.apply(action, now)
            },
            DisplayEvent::Connected => return vec![DisplayAction::Broadcast(self.snapshot())],
        };

        if events.is_empty() {
            return Vec::new();
        }

        if events.contains(&TimerEvent::Completed) {
            tracing::info!(workout = %self.context.workout_id, "workout completed");
        }

        vec![DisplayAction::Render, DisplayAction::Broadcast(self.snapshot())]
    }

    /// State message for Remotes.
    pub fn snapshot(&self) -> TimerStateMessage {
        let step = self.engine.current_step();
        TimerStateMessage {
            state: self.engine.state(),
            workout_id: self.context.workout_id.clone(),
            current_section: step.map(|s| s.section.clone()),
            current_exercise: step.map(|s| s.exercise.clone()),
            display_time: self.engine.display_time(),
        }
    }

    /// Frame for renderers.
    pub fn view(&self) -> DisplayView {
        let step = self.engine.current_step();
        let timeline = self.engine.timeline();
        DisplayView {
            workout_name: self.workout_name.clone(),
            status: self.engine.status(),
            display_time: self.engine.display_time(),
            section: step.map(|s| s.section.clone()),
            section_color: step
                .map_or_else(|| DEFAULT_SECTION_COLOR.to_string(), |s| s.section_color.clone()),
            exercise: step.map(|s| s.exercise.clone()),
            step: step.map_or(0, |_| self.engine.state().current_step_index + 1),
            steps: timeline.len(),
            up_next: self.engine.next_step().map(up_next),
            progress: self.engine.progress(),
            total_duration: timeline.total_duration(),
        }
    }
}

fn up_next(step: &FlatStep) -> UpNext {
    UpNext {
        section: step.section.clone(),
        exercise: step.exercise.clone(),
        duration: step.round.duration,
    }
}
