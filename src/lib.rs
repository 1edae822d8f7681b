//! # tictoc
//!
//! A lightweight, in-process named-timer registry: mark the start and end
//! of arbitrary code regions ("tic"/"toc"), accumulate elapsed-time samples
//! per region, derive rolling statistics (latest, moving average, moving
//! median, max, cumulative average), and periodically emit one
//! human-readable summary line.
//!
//! This is an informal debug instrument, not a benchmark harness: the only
//! guarantee is best-effort elapsed-time measurement. There is no
//! persistence, no multi-process aggregation, and the registry is
//! single-threaded by contract (the process-wide handle serializes access
//! through one mutex purely for safety).
//!
//! ## Quick start
//!
//! ```
//! // Block-scoped measurement on the process-wide registry:
//! {
//!     let _t = tictoc::scoped("stage1");
//!     // ... work ...
//! }
//!
//! // Explicit tic/toc by name:
//! tictoc::tic("stage2");
//! // ... work ...
//! tictoc::toc("stage2").unwrap();
//!
//! // Wrapping a callable:
//! let mut step = tictoc::wrap("step", || { /* ... work ... */ });
//! step();
//!
//! // One summary line every 10th log call:
//! tictoc::log(10, "iter:");
//! ```
//!
//! Output looks like:
//!
//! ```text
//! iter:| stage1: 0.512s | stage2: 5.000ms | step: 1.250ms |
//! ```
//!
//! ## Device synchronization
//!
//! When the measured work is dispatched asynchronously (GPU queues,
//! background I/O), install a sync hook so every time reading happens after
//! the work actually completed:
//!
//! ```ignore
//! tictoc::set_sync_fn(|| device.synchronize());
//! ```
//!
//! The hook runs immediately before both the tic and the toc instant; its
//! blocking time is intentionally part of the measured interval.
//!
//! ## Warmup
//!
//! With [`Config::num_warmup`] set to `k`, the first `k` global `log()`
//! rounds still run every measurement (sync hook included, so caches and
//! queues reach steady state) but discard the values, keeping cold-start
//! skew out of the statistics.

#![warn(missing_docs)]
#![warn(clippy::all)]

mod config;
mod error;
mod global;
mod registry;
mod scope;
mod stopwatch;

pub mod output;

pub use config::{Config, DEFAULT_WINDOW_SIZE};
pub use error::TimerError;
pub use global::{
    dispatch, log, reset_all, scoped, set_log_sink, set_sync_fn, set_window_size, tic, timed, toc,
    with_registry, wrap,
};
pub use output::{RegistrySnapshot, TimerSnapshot};
pub use registry::TimerRegistry;
pub use scope::ScopedTimer;
pub use stopwatch::Stopwatch;
