//! Manual clock.

use std::{
    sync::{
        Arc,
        atomic::{AtomicU64, Ordering},
    },
    time::Duration,
};

use wodclock_core::Environment;
use wodclock_proto::Timestamp;

/// Fixed start of simulated time (2023-11-14T22:13:20Z).
pub const SIM_EPOCH: Timestamp = Timestamp::from_millis(1_700_000_000_000);

/// Simulated environment whose clock only moves when told to.
///
/// Clones share the clock, so a test can hand one to a runtime and keep
/// another to advance time.
#[derive(Debug, Clone)]
pub struct SimEnv {
    now_ms: Arc<AtomicU64>,
}

impl SimEnv {
    /// Clock starting at [`SIM_EPOCH`].
    pub fn new() -> Self {
        Self::at(SIM_EPOCH)
    }

    /// Clock starting at `start`.
    pub fn at(start: Timestamp) -> Self {
        Self { now_ms: Arc::new(AtomicU64::new(start.as_millis())) }
    }

    /// Move the clock forward.
    pub fn advance(&self, by: Duration) {
        let millis = u64::try_from(by.as_millis()).unwrap_or(u64::MAX);
        self.now_ms.fetch_add(millis, Ordering::SeqCst);
    }

    /// Set the clock, including backwards.
    pub fn set(&self, now: Timestamp) {
        self.now_ms.store(now.as_millis(), Ordering::SeqCst);
    }
}

impl Default for SimEnv {
    fn default() -> Self {
        Self::new()
    }
}

impl Environment for SimEnv {
    fn now(&self) -> Timestamp {
        Timestamp::from_millis(self.now_ms.load(Ordering::SeqCst))
    }
}
