//! Formatting and sinks for timer summaries.
//!
//! The one format with compatibility weight is the periodic summary line
//! emitted by [`TimerRegistry::log`](crate::TimerRegistry::log):
//!
//! ```text
//! prefix| timer1: 0.512s | timer2: 5.000ms | timer3: 1.250ms |
//! ```
//!
//! Fields are joined with `|`, values carry three decimals, and averages
//! below 0.01 s are scaled to milliseconds. Everything else here (colored
//! report, JSON snapshot) is convenience output for humans and tooling.

use colored::Colorize;
use serde::{Deserialize, Serialize};

use crate::registry::TimerRegistry;
use crate::stopwatch::Stopwatch;

/// Representative averages below this many seconds render in milliseconds.
const MS_THRESHOLD_SECS: f64 = 0.01;

/// Format one summary line from `(name, average_secs)` entries.
///
/// The line is `prefix`, one `" name: value unit "` field per entry, and a
/// trailing empty field, all joined with `|`.
pub fn format_summary<'a>(
    prefix: &str,
    entries: impl Iterator<Item = (&'a str, f64)>,
) -> String {
    let mut fields = vec![prefix.to_owned()];
    for (name, avg_secs) in entries {
        let (value, unit) = scale_seconds(avg_secs);
        fields.push(format!(" {}: {:.3}{} ", name, value, unit));
    }
    fields.push(String::new());
    fields.join("|")
}

/// Auto-scale a seconds value for display: milliseconds below 0.01 s.
fn scale_seconds(secs: f64) -> (f64, &'static str) {
    if secs < MS_THRESHOLD_SECS {
        (secs * 1000.0, "ms")
    } else {
        (secs, "s")
    }
}

/// Build a sink that forwards summary lines through the `log` crate at
/// info level, for hosts that route output through a logging framework
/// rather than stdout.
pub fn log_sink() -> impl FnMut(&str) + Send + 'static {
    |line: &str| log::info!(target: "tictoc", "{}", line)
}

/// Format a multi-line, colored per-timer report for terminal display.
///
/// One row per timer in insertion order with latest / moving average /
/// median / max / calls. Unlike the summary line this format carries no
/// compatibility guarantee.
pub fn format_report(registry: &TimerRegistry) -> String {
    let mut out = String::new();
    let sep = "\u{2500}".repeat(72);

    out.push_str("tictoc\n");
    out.push_str(&sep);
    out.push('\n');

    if registry.is_empty() {
        out.push_str("  (no timers registered)\n");
        return out;
    }

    out.push_str(&format!(
        "  {:<20} {:>10} {:>10} {:>10} {:>10} {:>7}\n",
        "timer".bold(),
        "latest",
        "avg",
        "median",
        "max",
        "calls"
    ));
    for sw in registry.iter() {
        out.push_str(&format!(
            "  {:<20} {:>10} {:>10} {:>10} {:>10} {:>7}\n",
            sw.name().cyan(),
            display_secs(sw.latest().as_secs_f64()),
            display_secs(sw.moving_average().as_secs_f64()),
            display_secs(sw.moving_median().as_secs_f64()),
            display_secs(sw.max().as_secs_f64()),
            sw.calls()
        ));
    }
    out.push_str(&sep);
    out.push('\n');
    out
}

fn display_secs(secs: f64) -> String {
    let (value, unit) = scale_seconds(secs);
    format!("{:.3}{}", value, unit)
}

/// Serializable statistics snapshot of one stopwatch.
///
/// Durations are exposed as `f64` seconds for interop with plotting and
/// log-aggregation tooling.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimerSnapshot {
    /// Timer name.
    pub name: String,
    /// Completed tic/toc pairs.
    pub calls: u64,
    /// Most recent recorded interval, seconds.
    pub latest_secs: f64,
    /// Mean over the rolling window, seconds.
    pub moving_average_secs: f64,
    /// Median over the rolling window, seconds.
    pub moving_median_secs: f64,
    /// Maximum over the rolling window, seconds.
    pub max_secs: f64,
    /// Total elapsed divided by calls, seconds.
    pub cumulative_average_secs: f64,
    /// Sum of all recorded intervals, seconds.
    pub total_secs: f64,
}

impl TimerSnapshot {
    fn of(sw: &Stopwatch) -> Self {
        Self {
            name: sw.name().to_owned(),
            calls: sw.calls(),
            latest_secs: sw.latest().as_secs_f64(),
            moving_average_secs: sw.moving_average().as_secs_f64(),
            moving_median_secs: sw.moving_median().as_secs_f64(),
            max_secs: sw.max().as_secs_f64(),
            cumulative_average_secs: sw.cumulative_average().as_secs_f64(),
            total_secs: sw.total().as_secs_f64(),
        }
    }
}

/// Serializable snapshot of every registered timer, in insertion order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegistrySnapshot {
    /// Per-timer statistics.
    pub timers: Vec<TimerSnapshot>,
}

impl RegistrySnapshot {
    /// Capture the current statistics of every timer in `registry`.
    pub fn capture(registry: &TimerRegistry) -> Self {
        Self {
            timers: registry.iter().map(TimerSnapshot::of).collect(),
        }
    }
}

/// Serialize a snapshot to a compact JSON string.
///
/// # Errors
///
/// Returns an error if serialization fails (should not happen for
/// `RegistrySnapshot`).
pub fn to_json(snapshot: &RegistrySnapshot) -> Result<String, serde_json::Error> {
    serde_json::to_string(snapshot)
}

/// Serialize a snapshot to a pretty-printed JSON string.
///
/// # Errors
///
/// Returns an error if serialization fails (should not happen for
/// `RegistrySnapshot`).
pub fn to_json_pretty(snapshot: &RegistrySnapshot) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(snapshot)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_scales_small_values_to_milliseconds() {
        let line = format_summary("", [("a", 0.005), ("b", 0.5)].into_iter());
        assert_eq!(line, "| a: 5.000ms | b: 0.500s |");
    }

    #[test]
    fn summary_keeps_prefix_and_insertion_order() {
        let line = format_summary("iter 42:", [("fwd", 0.0012), ("bwd", 0.02)].into_iter());
        assert_eq!(line, "iter 42:| fwd: 1.200ms | bwd: 0.020s |");
    }

    #[test]
    fn summary_threshold_is_exclusive() {
        // Exactly 0.01 s stays in seconds.
        let line = format_summary("", [("t", 0.01)].into_iter());
        assert_eq!(line, "| t: 0.010s |");
    }

    #[test]
    fn empty_registry_summary_is_just_delimiters() {
        let line = format_summary("p", std::iter::empty());
        assert_eq!(line, "p|");
    }

    #[test]
    fn report_lists_every_timer() {
        let mut reg = TimerRegistry::new();
        reg.tic("load");
        reg.toc("load").unwrap();
        reg.tic("solve");
        reg.toc("solve").unwrap();
        let report = format_report(&reg);
        assert!(report.contains("load"));
        assert!(report.contains("solve"));
        assert!(report.contains("calls"));
    }

    #[test]
    fn snapshot_round_trips_through_json() {
        let mut reg = TimerRegistry::new();
        reg.tic("t");
        reg.toc("t").unwrap();
        let snapshot = RegistrySnapshot::capture(&reg);
        let json = to_json(&snapshot).expect("snapshot should serialize");
        assert!(json.contains("\"name\":\"t\""));
        assert!(json.contains("moving_average_secs"));

        let parsed: RegistrySnapshot =
            serde_json::from_str(&json).expect("snapshot should deserialize");
        assert_eq!(parsed.timers.len(), 1);
        assert_eq!(parsed.timers[0].calls, 1);
    }
}
