//! A single named timer with a bounded sample history.
//!
//! A [`Stopwatch`] accumulates elapsed-time samples for one code region and
//! derives rolling statistics over the most recent `window_size` samples
//! (or over the cumulative total when unwindowed). Statistics are defined
//! as `Duration::ZERO` when no samples exist, so they can be queried
//! opportunistically during logging without guarding.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

/// Per-name accumulator of timing samples and derived statistics.
///
/// Created lazily by the registry on first reference to a name; callers can
/// also construct one directly for standalone measurement.
#[derive(Debug, Clone)]
pub struct Stopwatch {
    name: String,
    window_size: usize,
    samples: VecDeque<Duration>,
    started_at: Option<Instant>,
    total: Duration,
    calls: u64,
}

impl Stopwatch {
    /// Create a stopwatch with the given rolling-window capacity.
    ///
    /// `window_size == 0` means unbounded: no per-sample history is kept
    /// and only the cumulative total and call count are tracked.
    pub fn new(name: impl Into<String>, window_size: usize) -> Self {
        Self {
            name: name.into(),
            window_size,
            samples: VecDeque::with_capacity(window_size),
            started_at: None,
            total: Duration::ZERO,
            calls: 0,
        }
    }

    /// Name this stopwatch is registered under.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Configured rolling-window capacity (`0` = unbounded).
    pub fn window_size(&self) -> usize {
        self.window_size
    }

    /// Number of completed start/stop pairs.
    pub fn calls(&self) -> u64 {
        self.calls
    }

    /// Sum of all recorded elapsed times since creation or last reset.
    pub fn total(&self) -> Duration {
        self.total
    }

    /// Record the current instant as the start of an interval.
    ///
    /// An unpaired previous start is silently overwritten; a missed stop is
    /// not an error, the interval simply never contributes a sample.
    pub fn start(&mut self) {
        self.started_at = Some(Instant::now());
    }

    /// Close the current interval and record its elapsed time.
    ///
    /// Returns the elapsed duration for the just-completed interval. If the
    /// stopwatch was never started the recorded value is `Duration::ZERO`:
    /// stop-without-start is an undetected caller error, and the only
    /// contract for it is that it must not crash.
    pub fn stop(&mut self) -> Duration {
        let elapsed = self.elapsed_since_start();
        self.record(elapsed);
        elapsed
    }

    /// Elapsed time since the most recent start, without recording it.
    ///
    /// Used by the registry during warmup, where the measurement must still
    /// happen (to keep caches and accelerator queues in a realistic state)
    /// but the value is discarded.
    pub(crate) fn elapsed_since_start(&self) -> Duration {
        self.started_at
            .map(|start| start.elapsed())
            .unwrap_or(Duration::ZERO)
    }

    /// Append one elapsed sample, evicting the oldest at capacity.
    fn record(&mut self, elapsed: Duration) {
        self.total += elapsed;
        self.calls += 1;
        if self.window_size > 0 {
            if self.samples.len() == self.window_size {
                self.samples.pop_front();
            }
            self.samples.push_back(elapsed);
        }
    }

    /// Clear samples, totals, call count, and any pending start.
    pub fn reset(&mut self) {
        self.samples.clear();
        self.started_at = None;
        self.total = Duration::ZERO;
        self.calls = 0;
    }

    /// Most recent recorded elapsed duration (`ZERO` when empty).
    pub fn latest(&self) -> Duration {
        self.samples.back().copied().unwrap_or(Duration::ZERO)
    }

    /// Arithmetic mean over the current window (`ZERO` when empty).
    pub fn moving_average(&self) -> Duration {
        if self.samples.is_empty() {
            return Duration::ZERO;
        }
        let sum: Duration = self.samples.iter().sum();
        sum / self.samples.len() as u32
    }

    /// Median over the current window (`ZERO` when empty).
    ///
    /// Even-length windows use the standard definition: the mean of the two
    /// middle values.
    pub fn moving_median(&self) -> Duration {
        if self.samples.is_empty() {
            return Duration::ZERO;
        }
        let mut sorted: Vec<Duration> = self.samples.iter().copied().collect();
        sorted.sort_unstable();
        let mid = sorted.len() / 2;
        if sorted.len() % 2 == 0 {
            (sorted[mid - 1] + sorted[mid]) / 2
        } else {
            sorted[mid]
        }
    }

    /// Maximum over the current window (`ZERO` when empty).
    pub fn max(&self) -> Duration {
        self.samples.iter().max().copied().unwrap_or(Duration::ZERO)
    }

    /// Cumulative average: `total / calls`.
    ///
    /// Defined as `Duration::ZERO` when no interval has completed, so it is
    /// safe to query opportunistically during logging.
    pub fn cumulative_average(&self) -> Duration {
        if self.calls == 0 {
            return Duration::ZERO;
        }
        Duration::from_secs_f64(self.total.as_secs_f64() / self.calls as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn secs(s: f64) -> Duration {
        Duration::from_secs_f64(s)
    }

    /// Seed deterministic samples without sleeping.
    fn watch_with(samples: &[f64], window_size: usize) -> Stopwatch {
        let mut sw = Stopwatch::new("test", window_size);
        for &s in samples {
            sw.record(secs(s));
        }
        sw
    }

    #[test]
    fn empty_statistics_are_zero() {
        let sw = Stopwatch::new("empty", 4);
        assert_eq!(sw.latest(), Duration::ZERO);
        assert_eq!(sw.moving_average(), Duration::ZERO);
        assert_eq!(sw.moving_median(), Duration::ZERO);
        assert_eq!(sw.max(), Duration::ZERO);
        assert_eq!(sw.cumulative_average(), Duration::ZERO);
        assert_eq!(sw.calls(), 0);
    }

    #[test]
    fn latest_tracks_most_recent_sample() {
        let sw = watch_with(&[1.0, 2.0, 3.0], 4);
        assert_eq!(sw.latest(), secs(3.0));
        assert_eq!(sw.calls(), 3);
    }

    #[test]
    fn odd_median() {
        let sw = watch_with(&[3.0, 1.0, 2.0], 4);
        assert_eq!(sw.moving_median(), secs(2.0));
    }

    #[test]
    fn even_median_averages_middle_pair() {
        let sw = watch_with(&[1.0, 2.0, 3.0, 4.0], 4);
        assert_eq!(sw.moving_median(), secs(2.5));
    }

    #[test]
    fn window_evicts_oldest_sample() {
        // Window of 3: after 4 samples the first no longer contributes.
        let sw = watch_with(&[100.0, 1.0, 2.0, 3.0], 3);
        assert_eq!(sw.moving_average(), secs(2.0));
        assert_eq!(sw.max(), secs(3.0));
        // Cumulative stats still see every sample.
        assert_eq!(sw.total(), secs(106.0));
        assert_eq!(sw.calls(), 4);
        assert_eq!(sw.cumulative_average(), secs(26.5));
    }

    #[test]
    fn unwindowed_keeps_no_samples() {
        let sw = watch_with(&[1.0, 2.0], 0);
        assert_eq!(sw.latest(), Duration::ZERO);
        assert_eq!(sw.moving_average(), Duration::ZERO);
        assert_eq!(sw.calls(), 2);
        assert_eq!(sw.cumulative_average(), secs(1.5));
    }

    #[test]
    fn stop_without_start_records_zero() {
        let mut sw = Stopwatch::new("never_started", 4);
        let elapsed = sw.stop();
        assert_eq!(elapsed, Duration::ZERO);
        assert_eq!(sw.calls(), 1);
        assert_eq!(sw.total(), Duration::ZERO);
    }

    #[test]
    fn start_stop_measures_a_positive_interval() {
        let mut sw = Stopwatch::new("real", 4);
        sw.start();
        std::thread::sleep(Duration::from_millis(5));
        let elapsed = sw.stop();
        assert!(elapsed >= Duration::from_millis(5));
        assert_eq!(sw.latest(), elapsed);
    }

    #[test]
    fn restart_discards_previous_start() {
        let mut sw = Stopwatch::new("restart", 4);
        sw.start();
        std::thread::sleep(Duration::from_millis(10));
        sw.start();
        let elapsed = sw.stop();
        assert!(elapsed < Duration::from_millis(10));
        assert_eq!(sw.calls(), 1);
    }

    #[test]
    fn reset_returns_to_initial_state() {
        let mut sw = watch_with(&[1.0, 2.0], 4);
        sw.start();
        sw.reset();
        assert_eq!(sw.calls(), 0);
        assert_eq!(sw.total(), Duration::ZERO);
        assert_eq!(sw.latest(), Duration::ZERO);
        // A pending start is cleared too.
        assert_eq!(sw.stop(), Duration::ZERO);
    }
}
