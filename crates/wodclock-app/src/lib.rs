//! Application layer for wodclock
//!
//! Pure state machines for the two session roles plus the async loops that
//! drive them against a [`wodclock_channel::SyncChannel`].
//!
//! # Components
//!
//! - [`SessionContext`]: Tenant, workout and role, passed explicitly
//! - [`Display`]: Authoritative timer session (events in, actions out)
//! - [`Remote`]: Read-only mirror that decides which commands make sense
//! - [`DisplayRuntime`] / [`RemoteRuntime`]: Orchestration loops

mod action;
mod config;
mod context;
mod display;
mod event;
mod remote;
mod runtime;

pub use action::DisplayAction;
pub use config::{DisplayConfig, RemoteConfig};
pub use context::{Role, SessionContext};
pub use display::{Display, DisplayView, UpNext};
pub use event::DisplayEvent;
pub use remote::Remote;
pub use runtime::{DisplayRuntime, RemoteHandle, RemoteRuntime};
