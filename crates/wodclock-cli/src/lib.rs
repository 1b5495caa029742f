//! Terminal front end for wodclock
//!
//! Runs a Display and a text-driven Remote in one process, connected through
//! the in-memory hub. Workouts are read from a directory of JSON files.

pub mod args;
pub mod commands;
pub mod error;
pub mod render;
pub mod source;

pub use args::Args;
pub use commands::Command;
pub use error::CliError;
pub use source::JsonFileSource;
