//! Configuration for the timer registry.

use serde::{Deserialize, Serialize};

/// Default rolling-window capacity applied to newly created stopwatches.
pub const DEFAULT_WINDOW_SIZE: usize = 50;

/// Configuration options for [`TimerRegistry`](crate::TimerRegistry).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Number of leading global `log()` calls during which toc measurements
    /// run (sync hook included) but are not recorded (default: 0).
    ///
    /// Warmup exists to exclude cold-start skew: first-touch allocation,
    /// code caches, accelerator queue spin-up.
    pub num_warmup: u64,

    /// Rolling-window capacity for newly created stopwatches (default: 50).
    ///
    /// `0` means unbounded: no per-sample window is kept and the summary
    /// line reports the cumulative average instead of the moving average.
    pub window_size: usize,

    /// Prefix prepended to summary lines when `log` is called with an
    /// empty prefix argument (default: empty).
    pub prefix: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            num_warmup: 0,
            window_size: DEFAULT_WINDOW_SIZE,
            prefix: String::new(),
        }
    }
}
