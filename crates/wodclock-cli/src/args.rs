//! Command-line arguments.

use std::{path::PathBuf, time::Duration};

use clap::Parser;
use wodclock_app::DisplayConfig;

/// Run a workout timer with a text remote.
#[derive(Debug, Clone, Parser)]
#[command(name = "wodclock", version, about)]
pub struct Args {
    /// Directory holding `<workout>.json` files
    #[arg(long, env = "WODCLOCK_LIBRARY", default_value = ".")]
    pub library: PathBuf,

    /// Workout to run
    #[arg(long, env = "WODCLOCK_WORKOUT")]
    pub workout: String,

    /// Tenant (box) whose channel the session joins
    #[arg(long, env = "WODCLOCK_TENANT", default_value = "local")]
    pub tenant: String,

    /// Display tick period in milliseconds
    #[arg(long, env = "WODCLOCK_TICK_MS", default_value_t = 100)]
    pub tick_ms: u64,

    /// Log filter directives
    #[arg(long, env = "RUST_LOG", default_value = "info")]
    pub log: String,
}

impl Args {
    /// Display loop configuration derived from the arguments.
    pub fn display_config(&self) -> DisplayConfig {
        DisplayConfig { tick_interval: Duration::from_millis(self.tick_ms), ..DisplayConfig::default() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let args = Args::try_parse_from(["wodclock", "--workout", "fran"]).unwrap();
        assert_eq!(args.workout, "fran");
        assert_eq!(args.tenant, "local");
        assert_eq!(args.library, PathBuf::from("."));
        assert_eq!(args.display_config().tick_interval, Duration::from_millis(100));
    }

    #[test]
    fn tick_override() {
        let args =
            Args::try_parse_from(["wodclock", "--workout", "fran", "--tick-ms", "250"]).unwrap();
        assert_eq!(args.display_config().tick_interval, Duration::from_millis(250));
    }
}
