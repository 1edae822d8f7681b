//! Process-wide mapping from region name to [`Stopwatch`].
//!
//! The registry is the public face of the crate: `tic(name)` / `toc(name)`
//! mark region boundaries, `log(period, prefix)` periodically emits one
//! summary line over every registered timer, and a configurable sync hook
//! runs before each time reading so asynchronous work (accelerator queues,
//! deferred I/O) is flushed into the measured interval.
//!
//! The registry itself is single-threaded by contract: every operation
//! takes `&mut self` and there is no internal locking. The process-wide
//! singleton in [`crate::global`] wraps one registry in a mutex and is the
//! documented deviation from that contract.

use std::panic::{catch_unwind, resume_unwind, AssertUnwindSafe};
use std::time::Duration;

use indexmap::IndexMap;

use crate::config::Config;
use crate::error::TimerError;
use crate::output;
use crate::stopwatch::Stopwatch;

/// Shorthand-suffix table: maps a recognized dispatch suffix onto the
/// primitive it sugars. Kept as data so `dispatch` stays a single ordinary
/// lookup rather than anything resembling runtime reflection.
const DISPATCH_SUFFIXES: [(&str, DispatchOp); 2] =
    [("_tic", DispatchOp::Tic), ("_toc", DispatchOp::Toc)];

#[derive(Debug, Clone, Copy)]
enum DispatchOp {
    Tic,
    Toc,
}

/// Named-timer registry with warmup suppression and periodic logging.
///
/// Timers are created lazily on first `tic` and live until the registry is
/// dropped. Insertion order is preserved so summary lines are deterministic.
///
/// # Example
///
/// ```
/// use tictoc::TimerRegistry;
///
/// let mut timers = TimerRegistry::new();
/// timers.tic("load");
/// // ... work ...
/// let elapsed = timers.toc("load").unwrap();
/// assert!(elapsed.is_some());
/// ```
pub struct TimerRegistry {
    timers: IndexMap<String, Stopwatch>,
    context_stack: Vec<String>,
    calls: u64,
    num_warmup: u64,
    window_size: usize,
    prefix: String,
    sync: Box<dyn FnMut() + Send>,
    sink: Box<dyn FnMut(&str) + Send>,
}

impl std::fmt::Debug for TimerRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TimerRegistry")
            .field("timers", &self.timers)
            .field("context_stack", &self.context_stack)
            .field("calls", &self.calls)
            .field("num_warmup", &self.num_warmup)
            .field("window_size", &self.window_size)
            .finish_non_exhaustive()
    }
}

impl Default for TimerRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl TimerRegistry {
    /// Create a registry with default configuration.
    pub fn new() -> Self {
        Self::with_config(Config::default())
    }

    /// Create a registry from an explicit [`Config`].
    pub fn with_config(config: Config) -> Self {
        Self {
            timers: IndexMap::new(),
            context_stack: Vec::new(),
            calls: 0,
            num_warmup: config.num_warmup,
            window_size: config.window_size,
            prefix: config.prefix,
            sync: Box::new(|| {}),
            sink: Box::new(|line: &str| println!("{}", line)),
        }
    }

    /// Start (or restart) the named timer, creating it on first reference.
    ///
    /// The sync hook runs before the start instant is taken. Returns the
    /// stopwatch so callers may chain further reads; typical usage ignores
    /// the return value.
    pub fn tic(&mut self, name: &str) -> &mut Stopwatch {
        if !self.timers.contains_key(name) {
            self.timers
                .insert(name.to_owned(), Stopwatch::new(name, self.window_size));
        }
        (self.sync)();
        let sw = self
            .timers
            .get_mut(name)
            .expect("timer inserted above");
        sw.start();
        sw
    }

    /// Stop the named timer and record the elapsed interval.
    ///
    /// Returns [`TimerError::UnknownTimer`] if the name was never `tic`'d.
    /// During warmup (fewer than `num_warmup` global `log` calls so far)
    /// the sync hook still runs and the elapsed time is still computed, so
    /// subsequent measurements see realistic cache and queue state, but the
    /// value is discarded and `Ok(None)` is returned.
    pub fn toc(&mut self, name: &str) -> Result<Option<Duration>, TimerError> {
        if !self.timers.contains_key(name) {
            return Err(TimerError::UnknownTimer(name.to_owned()));
        }
        (self.sync)();
        let in_warmup = self.calls < self.num_warmup;
        let Some(sw) = self.timers.get_mut(name) else {
            return Err(TimerError::UnknownTimer(name.to_owned()));
        };
        if in_warmup {
            let _ = sw.elapsed_since_start();
            Ok(None)
        } else {
            Ok(Some(sw.stop()))
        }
    }

    /// Resolve a `"<base>_tic"` / `"<base>_toc"` shorthand name onto the
    /// matching primitive.
    ///
    /// Tic dispatches return `Ok(None)`; toc dispatches return the toc
    /// result unchanged. Names without a recognized suffix fail with
    /// [`TimerError::UnknownDispatch`].
    pub fn dispatch(&mut self, call: &str) -> Result<Option<Duration>, TimerError> {
        for (suffix, op) in DISPATCH_SUFFIXES {
            if let Some(base) = call.strip_suffix(suffix) {
                return match op {
                    DispatchOp::Tic => {
                        self.tic(base);
                        Ok(None)
                    }
                    DispatchOp::Toc => self.toc(base),
                };
            }
        }
        Err(TimerError::UnknownDispatch(call.to_owned()))
    }

    /// Enter a named scope: push onto the context stack and `tic`.
    ///
    /// Pair with [`exit`](Self::exit); [`time`](Self::time) and the guards
    /// in [`crate::scope`] wrap the pair with structured cleanup.
    pub fn enter(&mut self, name: &str) {
        self.context_stack.push(name.to_owned());
        self.tic(name);
    }

    /// Leave a named scope: pop with a strict LIFO check, then `toc`.
    ///
    /// A mismatched exit order fails with [`TimerError::ScopeMismatch`]
    /// rather than silently corrupting later lookups.
    pub fn exit(&mut self, name: &str) -> Result<Option<Duration>, TimerError> {
        match self.context_stack.pop() {
            Some(top) if top == name => self.toc(name),
            Some(top) => {
                // Restore the stack so the caller can observe the bad state.
                self.context_stack.push(top.clone());
                Err(TimerError::ScopeMismatch {
                    expected: top,
                    found: name.to_owned(),
                })
            }
            None => Err(TimerError::ScopeMismatch {
                expected: "<empty>".to_owned(),
                found: name.to_owned(),
            }),
        }
    }

    /// Run `f` inside the named scope, measuring around every exit path.
    ///
    /// The closure receives the registry back so nested scopes compose:
    ///
    /// ```
    /// use tictoc::TimerRegistry;
    ///
    /// let mut timers = TimerRegistry::new();
    /// let value = timers.time("outer", |t| {
    ///     t.time("inner", |_| 21) * 2
    /// });
    /// assert_eq!(value, 42);
    /// ```
    ///
    /// If `f` panics the closing measurement still runs and the panic is
    /// re-raised unchanged; the timer never swallows a caller error.
    pub fn time<R>(&mut self, name: &str, f: impl FnOnce(&mut Self) -> R) -> R {
        self.enter(name);
        let outcome = catch_unwind(AssertUnwindSafe(|| f(self)));
        let exited = self.exit(name);
        match outcome {
            Ok(value) => {
                if let Err(err) = exited {
                    panic!("timer scope imbalance: {}", err);
                }
                value
            }
            Err(payload) => resume_unwind(payload),
        }
    }

    /// Replace the sync hook invoked before each tic/toc time reading.
    ///
    /// The hook should block until outstanding asynchronous work has
    /// completed (e.g. an accelerator queue flush) so elapsed time reflects
    /// real completion rather than dispatch. Its blocking time is
    /// intentionally part of the measured interval. Default: no-op.
    pub fn set_sync_fn<F>(&mut self, f: F)
    where
        F: FnMut() + Send + 'static,
    {
        self.sync = Box::new(f);
    }

    /// Replace the sink that receives formatted summary lines.
    ///
    /// Default: write to standard output. See [`output::log_sink`] for a
    /// sink that forwards through the `log` crate instead.
    pub fn set_log_sink<F>(&mut self, f: F)
    where
        F: FnMut(&str) + Send + 'static,
    {
        self.sink = Box::new(f);
    }

    /// Set the default window size for subsequently created stopwatches.
    ///
    /// Fails with [`TimerError::WindowLocked`] once any timer exists:
    /// changing the window retroactively would leave differently-windowed
    /// histories that cannot be compared.
    pub fn set_window_size(&mut self, window_size: usize) -> Result<(), TimerError> {
        if !self.timers.is_empty() {
            return Err(TimerError::WindowLocked {
                active_timers: self.timers.len(),
            });
        }
        self.window_size = window_size;
        Ok(())
    }

    /// Reset every registered stopwatch without removing any names.
    pub fn reset_all(&mut self) {
        for sw in self.timers.values_mut() {
            sw.reset();
        }
    }

    /// Increment the global call counter and, every `period` calls, emit
    /// one summary line over all timers in insertion order.
    ///
    /// Format: fields joined with `|`; first field is the prefix (falling
    /// back to the configured default when empty), then one
    /// `" name: {value:.3}{unit} "` field per timer, then a trailing empty
    /// field. The representative average is the moving average when the
    /// registry is windowed, else the cumulative average; values below
    /// 0.01 s render in milliseconds.
    ///
    /// When the period has not elapsed (or no timers exist) this is a
    /// no-op beyond the counter increment.
    pub fn log(&mut self, period: u64, prefix: &str) {
        self.calls += 1;
        if period == 0 || self.calls % period != 0 || self.timers.is_empty() {
            return;
        }
        let windowed = self.window_size > 0;
        let prefix = if prefix.is_empty() {
            self.prefix.as_str()
        } else {
            prefix
        };
        let line = output::format_summary(
            prefix,
            self.timers.values().map(|sw| {
                let avg = if windowed {
                    sw.moving_average()
                } else {
                    sw.cumulative_average()
                };
                (sw.name(), avg.as_secs_f64())
            }),
        );
        (self.sink)(&line);
    }

    /// Look up a stopwatch by name for ad-hoc statistic reads.
    pub fn get(&self, name: &str) -> Option<&Stopwatch> {
        self.timers.get(name)
    }

    /// Iterate over registered stopwatches in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Stopwatch> {
        self.timers.values()
    }

    /// Number of registered timers.
    pub fn len(&self) -> usize {
        self.timers.len()
    }

    /// Whether no timer has been registered yet.
    pub fn is_empty(&self) -> bool {
        self.timers.is_empty()
    }

    /// Global `log()` call count (warmup and period gating both key off it).
    pub fn calls(&self) -> u64 {
        self.calls
    }

    /// Configured default window size.
    pub fn window_size(&self) -> usize {
        self.window_size
    }

    /// Depth of the scope context stack. Zero at steady state outside
    /// active scopes.
    pub fn scope_depth(&self) -> usize {
        self.context_stack.len()
    }
}
