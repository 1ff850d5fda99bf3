//! Data models for the visualizer.
//!
//! This module contains the core data structures shared by the aggregator,
//! the chart renderer, and the job runner.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of chart rendered for a job entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartType {
    /// Connected line with point markers
    Line,
    /// Discrete vertical bars
    Bar,
}

impl ChartType {
    /// Lowercase name, as used in output filenames.
    pub fn as_str(&self) -> &'static str {
        match self {
            ChartType::Line => "line",
            ChartType::Bar => "bar",
        }
    }
}

impl fmt::Display for ChartType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Group-by key of one row: the values of the groupby column(s), in order.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GroupKey(pub Vec<String>);

impl GroupKey {
    /// Convenience constructor for a single-column key.
    #[cfg(test)]
    pub fn single(value: &str) -> Self {
        Self(vec![value.to_string()])
    }
}

impl fmt::Display for GroupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.join(" / "))
    }
}

/// Summed totals per group key, in first-appearance order of the keys.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AggregatedSeries {
    entries: Vec<(GroupKey, f64)>,
}

impl AggregatedSeries {
    /// Build a series from already-reduced entries.
    pub fn from_entries(entries: Vec<(GroupKey, f64)>) -> Self {
        Self { entries }
    }

    /// Iterate over `(key, total)` pairs in series order.
    pub fn iter(&self) -> impl Iterator<Item = &(GroupKey, f64)> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Total for a key, if the key is present.
    #[cfg(test)]
    pub fn get(&self, key: &GroupKey) -> Option<f64> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, total)| *total)
    }

    /// Sum of every group total.
    pub fn total(&self) -> f64 {
        self.entries.iter().map(|(_, total)| total).sum()
    }

    /// Smallest and largest totals, or `None` for an empty series.
    pub fn value_range(&self) -> Option<(f64, f64)> {
        self.entries.iter().map(|(_, v)| *v).fold(None, |acc, v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })
    }
}

/// Outcome counters for a complete run over the job list.
#[derive(Debug, Clone)]
pub struct RunSummary {
    /// When the run started.
    pub started_at: DateTime<Utc>,
    /// Number of job entries processed.
    pub jobs: usize,
    /// Job entries whose pattern matched no files (or was invalid).
    pub jobs_without_matches: usize,
    /// Files matched across all job entries.
    pub files_matched: usize,
    /// Charts successfully written.
    pub charts_written: usize,
    /// Files skipped because of an error.
    pub files_failed: usize,
    /// Wall-clock duration in seconds.
    pub duration_seconds: f64,
}

impl RunSummary {
    /// Start an empty summary stamped with the current time.
    pub fn start() -> Self {
        Self {
            started_at: Utc::now(),
            jobs: 0,
            jobs_without_matches: 0,
            files_matched: 0,
            charts_written: 0,
            files_failed: 0,
            duration_seconds: 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chart_type_serde_lowercase() {
        let parsed: ChartType = serde_json::from_str("\"bar\"").unwrap();
        assert_eq!(parsed, ChartType::Bar);
        assert_eq!(serde_json::to_string(&ChartType::Line).unwrap(), "\"line\"");
        assert!(serde_json::from_str::<ChartType>("\"pie\"").is_err());
    }

    #[test]
    fn test_group_key_display() {
        assert_eq!(GroupKey::single("2023").to_string(), "2023");
        let composite = GroupKey(vec!["2023".to_string(), "Tech".to_string()]);
        assert_eq!(composite.to_string(), "2023 / Tech");
    }

    #[test]
    fn test_series_totals_and_range() {
        let series = AggregatedSeries::from_entries(vec![
            (GroupKey::single("a"), 10.0),
            (GroupKey::single("b"), -4.0),
            (GroupKey::single("c"), 7.5),
        ]);

        assert_eq!(series.len(), 3);
        assert_eq!(series.total(), 13.5);
        assert_eq!(series.value_range(), Some((-4.0, 10.0)));
        assert_eq!(series.get(&GroupKey::single("c")), Some(7.5));
        assert_eq!(series.get(&GroupKey::single("z")), None);
    }

    #[test]
    fn test_empty_series() {
        let series = AggregatedSeries::default();
        assert!(series.is_empty());
        assert_eq!(series.value_range(), None);
        assert_eq!(series.total(), 0.0);
    }
}
