//! Environment abstraction.
//!
//! The timer never reads the system clock itself. Drivers obtain `now` from an
//! [`Environment`] and pass it into each operation, which lets simulations run
//! on a manual clock.

use std::time::{SystemTime, UNIX_EPOCH};

use wodclock_proto::Timestamp;

/// Source of wall-clock time.
pub trait Environment: Clone + Send + Sync + 'static {
    /// Current wall-clock time.
    fn now(&self) -> Timestamp;
}

/// Production environment backed by [`SystemTime`].
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemEnv;

impl Environment for SystemEnv {
    fn now(&self) -> Timestamp {
        // A clock set before 1970 reads as the epoch.
        let millis = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_or(0, |d| u64::try_from(d.as_millis()).unwrap_or(u64::MAX));
        Timestamp::from_millis(millis)
    }
}
