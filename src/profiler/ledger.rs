//! Accumulated method timings
//!
//! Totals are keyed by `"<delegate type>#<operation>"` and rendered in
//! lexicographic key order.

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use std::collections::BTreeMap;
use std::time::Duration;

/// RFC 1123 date format, always rendered in GMT
const RFC_1123: &str = "%a, %-d %b %Y %H:%M:%S GMT";

/// Thread-safe accumulator of elapsed time per (delegate type, operation)
#[derive(Debug, Default)]
pub struct ProfilingLedger {
    totals: DashMap<String, Duration>,
}

impl ProfilingLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `elapsed` to the running total for the pair, saturating at `Duration::MAX`
    pub fn record(&self, delegate_type: &str, operation: &str, elapsed: Duration) {
        let mut total = self
            .totals
            .entry(key(delegate_type, operation))
            .or_insert(Duration::ZERO);
        *total = total.saturating_add(elapsed);
    }

    /// Total recorded for the pair, if it was ever recorded
    pub fn total(&self, delegate_type: &str, operation: &str) -> Option<Duration> {
        self.totals
            .get(&key(delegate_type, operation))
            .map(|entry| *entry.value())
    }

    pub fn is_empty(&self) -> bool {
        self.totals.is_empty()
    }

    /// Copy of every total, sorted by key
    pub fn snapshot(&self) -> BTreeMap<String, Duration> {
        self.totals
            .iter()
            .map(|entry| (entry.key().clone(), *entry.value()))
            .collect()
    }

    /// Renders the report: a start line, then one line per pair
    pub fn render(&self, start_time: DateTime<Utc>) -> String {
        let mut report = format!("Run at {}\n", start_time.format(RFC_1123));
        for (key, total) in self.snapshot() {
            report.push_str(&format!("{} took {}\n", key, format_duration(total)));
        }
        report
    }
}

fn key(delegate_type: &str, operation: &str) -> String {
    format!("{}#{}", delegate_type, operation)
}

/// Formats as `<minutes>m <seconds>s <millis>ms`
pub fn format_duration(duration: Duration) -> String {
    let total_secs = duration.as_secs();
    format!(
        "{}m {}s {}ms",
        total_secs / 60,
        total_secs % 60,
        duration.subsec_millis()
    )
}
