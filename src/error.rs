//! Error types.
//!
//! `ConfigError` aborts the run. Every `ProcessError` is caught by the job
//! runner, logged, and only skips the file (or job entry) it belongs to.

use std::path::PathBuf;
use thiserror::Error;

/// Failures while loading the job configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("configuration file not found at {}", .0.display())]
    NotFound(PathBuf),

    #[error("failed to read configuration file {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to decode JSON from {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("no job entries found in {}", .0.display())]
    Empty(PathBuf),

    #[error("job entry {index}: {reason}")]
    InvalidEntry { index: usize, reason: String },
}

/// Failures while processing a single job entry or a single matched file.
#[derive(Debug, Error)]
pub enum ProcessError {
    #[error("invalid glob pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: glob::PatternError,
    },

    #[error("column '{column}' not found")]
    ColumnNotFound { column: String },

    #[error("failed to read CSV {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("nothing to plot: no data rows")]
    EmptySeries,

    #[error("totals between {min} and {max} are outside the plottable range")]
    Unplottable { min: f64, max: f64 },

    #[error("failed to write chart {}: {message}", .path.display())]
    Write { path: PathBuf, message: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_not_found_message() {
        let err = ProcessError::ColumnNotFound {
            column: "Amount".to_string(),
        };
        assert_eq!(err.to_string(), "column 'Amount' not found");
    }

    #[test]
    fn test_config_error_messages_carry_path() {
        let err = ConfigError::NotFound(PathBuf::from("missing.json"));
        assert!(err.to_string().contains("missing.json"));

        let err = ConfigError::InvalidEntry {
            index: 2,
            reason: "'columns' must not be empty".to_string(),
        };
        assert_eq!(err.to_string(), "job entry 2: 'columns' must not be empty");
    }
}
