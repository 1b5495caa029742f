//! wodclock core logic
//!
//! Pure state machine logic for running a workout timer, decoupled from I/O.
//! Nothing in this crate reads the system clock, spawns tasks or touches the
//! network.
//!
//! # Architecture
//!
//! A [`Workout`] tree (sections → exercises → rounds) is flattened once into a
//! [`Timeline`] of atomic steps. The [`TimerEngine`] walks that timeline. Every
//! engine operation receives the current wall-clock time as a parameter and
//! returns the [`TimerEvent`]s it caused, so the same code runs under a real
//! clock in production and under a manual clock in tests.
//!
//! # Components
//!
//! - [`workout`]: Workout tree as supplied by the workout source
//! - [`duration`]: Interval parsing and clock formatting
//! - [`timeline`]: Flattening into ordered steps
//! - [`timer`]: Timer state machine
//! - [`observer`]: State-change listeners
//! - [`mod@env`]: Environment abstraction (wall clock)
//! - [`source`]: Workout source abstraction
//! - [`error`]: Error types

pub mod duration;
pub mod env;
pub mod error;
pub mod observer;
pub mod source;
pub mod timeline;
pub mod timer;
pub mod workout;

pub use env::{Environment, SystemEnv};
pub use error::{DurationError, SourceError};
pub use observer::ListenerId;
pub use source::{MemorySource, WorkoutSource};
pub use timeline::{FlatStep, Timeline};
pub use timer::{TimerEngine, TimerEvent};
pub use workout::{Exercise, Round, Section, TimerMode, Workout};
