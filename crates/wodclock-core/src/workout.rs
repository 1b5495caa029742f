//! Workout tree.
//!
//! The shape supplied by the workout source: a workout holds sections, a
//! section holds exercises, an exercise holds rounds. Stored order is
//! execution order at every level. Extra columns in stored rows (ids, foreign
//! keys, timestamps) are ignored on deserialization.

use std::{num::NonZeroU32, time::Duration};

use serde::{Deserialize, Serialize};
use wodclock_proto::WorkoutId;

/// How a round's clock runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimerMode {
    /// Counts down from the round duration and advances at zero
    Countdown,
    /// Counts up from zero with no fixed end
    Countup,
}

/// Atomic timed unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Round {
    /// Countdown target; informational for count-up rounds
    #[serde(with = "crate::duration::interval")]
    pub duration: Duration,
    /// Clock direction
    pub mode: TimerMode,
    /// Leave this round out of the workout total
    #[serde(default)]
    pub exclude_from_total: bool,
    /// Optional accent colour
    #[serde(default)]
    pub color: Option<String>,
}

impl Round {
    /// Countdown round of `secs` seconds.
    pub fn countdown(secs: u64) -> Self {
        Self::new(Duration::from_secs(secs), TimerMode::Countdown)
    }

    /// Count-up round with a nominal duration of `secs` seconds.
    pub fn countup(secs: u64) -> Self {
        Self::new(Duration::from_secs(secs), TimerMode::Countup)
    }

    fn new(duration: Duration, mode: TimerMode) -> Self {
        Self { duration, mode, exclude_from_total: false, color: None }
    }

    /// Mark this round as excluded from the workout total.
    #[must_use]
    pub fn excluded(mut self) -> Self {
        self.exclude_from_total = true;
        self
    }
}

/// Named exercise made of rounds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Exercise {
    /// Display name
    pub name: String,
    /// Coach notes
    #[serde(default)]
    pub notes: Option<String>,
    /// Rounds in execution order
    #[serde(default)]
    pub rounds: Vec<Round>,
}

impl Exercise {
    /// Create an exercise from its rounds.
    pub fn new(name: impl Into<String>, rounds: Vec<Round>) -> Self {
        Self { name: name.into(), notes: None, rounds }
    }
}

/// Block of exercises, replayed `repeat_count` times.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    /// Display name
    pub name: String,
    /// Background colour while this section runs
    #[serde(default)]
    pub color: Option<String>,
    /// Consecutive replays of the whole exercise list (at least one)
    #[serde(default = "one")]
    pub repeat_count: NonZeroU32,
    /// Leave this section out of the workout total
    #[serde(default)]
    pub exclude_from_total: bool,
    /// Exercises in execution order
    #[serde(default)]
    pub exercises: Vec<Exercise>,
}

const fn one() -> NonZeroU32 {
    NonZeroU32::MIN
}

impl Section {
    /// Create a section played once.
    pub fn new(name: impl Into<String>, exercises: Vec<Exercise>) -> Self {
        Self {
            name: name.into(),
            color: None,
            repeat_count: one(),
            exclude_from_total: false,
            exercises,
        }
    }

    /// Replay the exercise list `count` times. Zero is treated as one.
    #[must_use]
    pub fn repeat(mut self, count: u32) -> Self {
        self.repeat_count = NonZeroU32::new(count).unwrap_or(NonZeroU32::MIN);
        self
    }

    /// Set the section colour.
    #[must_use]
    pub fn color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    /// Mark this section as excluded from the workout total.
    #[must_use]
    pub fn excluded(mut self) -> Self {
        self.exclude_from_total = true;
        self
    }
}

/// A complete workout definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Workout {
    /// Stable identifier
    pub id: WorkoutId,
    /// Display name
    pub name: String,
    /// Sections in execution order
    #[serde(default)]
    pub sections: Vec<Section>,
}

impl Workout {
    /// Create a workout from its sections.
    pub fn new(id: impl Into<String>, name: impl Into<String>, sections: Vec<Section>) -> Self {
        Self { id: WorkoutId::new(id), name: name.into(), sections }
    }
}
