//! Process-wide registry handle.
//!
//! Exactly one registry exists per process: created on first access, alive
//! for the process lifetime, reached through the free functions in this
//! module. The instance lives behind `OnceLock<Mutex<..>>`. The mutex is the one documented deviation from
//! the single-threaded core (see [`crate::registry`]): each free function
//! holds the lock only for its own duration, so nested scopes and re-entrant
//! instrumentation never deadlock.
//!
//! Call sites that want an owned registry (tests, embedded subsystems)
//! should construct [`TimerRegistry`] directly instead.

use std::sync::{Mutex, OnceLock, PoisonError};
use std::time::Duration;

use crate::error::TimerError;
use crate::registry::TimerRegistry;
use crate::scope::ScopedTimer;

static REGISTRY: OnceLock<Mutex<TimerRegistry>> = OnceLock::new();

/// Run `f` with exclusive access to the process-wide registry.
///
/// This is the narrowly-scoped escape hatch for operations without a
/// dedicated free function (snapshots, ad-hoc statistic reads). Do not
/// call nested `with_registry` from inside `f`; the lock is not reentrant.
pub fn with_registry<R>(f: impl FnOnce(&mut TimerRegistry) -> R) -> R {
    let mut guard = REGISTRY
        .get_or_init(|| Mutex::new(TimerRegistry::new()))
        .lock()
        .unwrap_or_else(PoisonError::into_inner);
    f(&mut guard)
}

/// Start (or restart) the named timer on the process-wide registry.
pub fn tic(name: &str) {
    with_registry(|reg| {
        reg.tic(name);
    });
}

/// Stop the named timer on the process-wide registry.
///
/// See [`TimerRegistry::toc`] for warmup and error semantics.
pub fn toc(name: &str) -> Result<Option<Duration>, TimerError> {
    with_registry(|reg| reg.toc(name))
}

/// Enter a named scope on the process-wide registry, returning a guard
/// that closes the measurement when dropped (on every exit path).
///
/// ```
/// {
///     let _timer = tictoc::scoped("inference");
///     // ... work ...
/// } // toc("inference") runs here, panic or not
/// ```
pub fn scoped(name: &str) -> ScopedTimer {
    ScopedTimer::enter(name)
}

/// Run `f` inside a named scope on the process-wide registry and return
/// its value. Panics from `f` propagate unchanged after the measurement.
pub fn timed<R>(name: &str, f: impl FnOnce() -> R) -> R {
    let _scope = ScopedTimer::enter(name);
    f()
}

/// Wrap a callable so every invocation is measured under `name`.
///
/// The wrapper forwards the return value (and any panic) unchanged.
/// Callables taking arguments are wrapped at the call site:
/// `move |x| tictoc::timed("op", || op(x))`.
pub fn wrap<R>(name: &str, mut f: impl FnMut() -> R) -> impl FnMut() -> R {
    let name = name.to_owned();
    move || timed(&name, &mut f)
}

/// Resolve a `"<base>_tic"` / `"<base>_toc"` shorthand on the process-wide
/// registry.
pub fn dispatch(call: &str) -> Result<Option<Duration>, TimerError> {
    with_registry(|reg| reg.dispatch(call))
}

/// Replace the sync hook on the process-wide registry.
pub fn set_sync_fn<F>(f: F)
where
    F: FnMut() + Send + 'static,
{
    with_registry(|reg| reg.set_sync_fn(f));
}

/// Replace the summary-line sink on the process-wide registry.
pub fn set_log_sink<F>(f: F)
where
    F: FnMut(&str) + Send + 'static,
{
    with_registry(|reg| reg.set_log_sink(f));
}

/// Set the default window size on the process-wide registry.
///
/// Fails with [`TimerError::WindowLocked`] once any timer exists.
pub fn set_window_size(window_size: usize) -> Result<(), TimerError> {
    with_registry(|reg| reg.set_window_size(window_size))
}

/// Reset every stopwatch on the process-wide registry.
pub fn reset_all() {
    with_registry(|reg| reg.reset_all());
}

/// Increment the global call counter and emit a summary line every
/// `period` calls. See [`TimerRegistry::log`].
pub fn log(period: u64, prefix: &str) {
    with_registry(|reg| reg.log(period, prefix));
}
