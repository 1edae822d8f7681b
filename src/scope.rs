//! RAII scope guard for the process-wide registry.

use crate::global::with_registry;

/// Guard that measures a named region for as long as it is alive.
///
/// Created by [`scoped`](crate::scoped). Entering pushes the name onto the
/// registry's context stack and starts the timer; dropping pops the name
/// (strict LIFO) and records the interval. Because `Drop` runs during
/// unwinding too, the closing measurement is guaranteed on every exit path
/// and a panicking body still contributes exactly one completed interval.
///
/// The guard takes the registry lock only on entry and exit, never across
/// the measured region, so scopes nest freely.
#[must_use = "dropping the guard immediately measures an empty interval"]
pub struct ScopedTimer {
    name: String,
}

impl ScopedTimer {
    pub(crate) fn enter(name: &str) -> Self {
        with_registry(|reg| reg.enter(name));
        Self {
            name: name.to_owned(),
        }
    }

    /// Name of the region this guard is measuring.
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl Drop for ScopedTimer {
    fn drop(&mut self) {
        let result = with_registry(|reg| reg.exit(&self.name));
        if let Err(err) = result {
            // Out-of-order drops corrupt later lookups; fail loudly unless
            // an unwind is already in flight (panicking here would abort).
            if !std::thread::panicking() {
                panic!("timer scope imbalance: {}", err);
            }
        }
    }
}
