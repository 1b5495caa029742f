//! Deterministic simulation harness for wodclock testing.
//!
//! A manual clock, instrumented transports and a reference timer model, so
//! Display/Remote scenarios replay identically on every run.

pub mod faulty;
pub mod model;
pub mod recording;
pub mod sim_env;

pub use faulty::{FaultyLink, FaultyTransport};
pub use model::{Operation, TimerModel};
pub use recording::{RecordingLink, RecordingTransport};
pub use sim_env::SimEnv;
