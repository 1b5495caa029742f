//! Runtime configuration.

use std::time::Duration;

/// Display loop configuration.
#[derive(Debug, Clone, Copy)]
pub struct DisplayConfig {
    /// Clock recomputation period. Only affects display latency: elapsed
    /// time is always derived from wall-clock timestamps.
    pub tick_interval: Duration,
    /// Delay between attempts to rejoin a lost channel.
    pub reconnect_interval: Duration,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self { tick_interval: Duration::from_millis(100), reconnect_interval: Duration::from_secs(5) }
    }
}

/// Remote loop configuration.
#[derive(Debug, Clone, Copy)]
pub struct RemoteConfig {
    /// Delay between attempts to rejoin a lost channel.
    pub reconnect_interval: Duration,
    /// Commands buffered between the handle and the loop.
    pub mailbox: usize,
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self { reconnect_interval: Duration::from_secs(5), mailbox: 16 }
    }
}
