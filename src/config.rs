//! Configuration file handling.
//!
//! This module handles loading and validating the JSON job list. Each job
//! entry names a glob pattern, the value columns to sum, the key column(s) to
//! group by, and the kind of chart to draw.

use crate::error::ConfigError;
use crate::models::ChartType;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::path::Path;

/// One scan-aggregate-render job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobConfig {
    /// Glob pattern locating the CSV files (supports `**`).
    pub directory: String,

    /// Value column(s) summed into the calculated value.
    #[serde(deserialize_with = "one_or_many")]
    pub columns: Vec<String>,

    /// Key column(s) whose distinct values become the X axis.
    #[serde(deserialize_with = "one_or_many")]
    pub groupby: Vec<String>,

    /// Line or bar chart.
    pub chart_type: ChartType,

    /// Y-axis and legend text. Defaults to the joined column names.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chart_label: Option<String>,
}

impl JobConfig {
    /// Label drawn on the Y axis and in the legend.
    pub fn y_label(&self) -> String {
        self.chart_label
            .clone()
            .unwrap_or_else(|| self.columns.join(" + "))
    }

    /// Check the entry's invariants.
    pub fn validate(&self) -> Result<(), String> {
        if self.directory.trim().is_empty() {
            return Err("'directory' must not be empty".to_string());
        }

        if self.columns.is_empty() {
            return Err("'columns' must not be empty".to_string());
        }
        if self.columns.iter().any(|c| c.is_empty()) {
            return Err("'columns' must not contain empty names".to_string());
        }

        if self.groupby.is_empty() {
            return Err("'groupby' must not be empty".to_string());
        }
        if self.groupby.iter().any(|c| c.is_empty()) {
            return Err("'groupby' must not contain empty names".to_string());
        }

        Ok(())
    }
}

/// Accept either `"Name"` or `["A", "B"]`.
fn one_or_many<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany {
        One(String),
        Many(Vec<String>),
    }

    Ok(match OneOrMany::deserialize(deserializer)? {
        OneOrMany::One(name) => vec![name],
        OneOrMany::Many(names) => names,
    })
}

/// The ordered, validated job list.
#[derive(Debug, Clone)]
pub struct JobList {
    pub jobs: Vec<JobConfig>,
}

impl JobList {
    /// Load and validate the job list from a file path.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::NotFound(path.to_path_buf()));
        }

        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let root: Value = serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

        // A list of jobs, or one bare job object.
        let entries = match root {
            Value::Array(entries) => entries,
            entry @ Value::Object(_) => vec![entry],
            _ => {
                return Err(ConfigError::InvalidEntry {
                    index: 1,
                    reason: "expected a list of job objects or a single job object".to_string(),
                })
            }
        };

        if entries.is_empty() {
            return Err(ConfigError::Empty(path.to_path_buf()));
        }

        let jobs = entries
            .into_iter()
            .enumerate()
            .map(|(i, entry)| Self::parse_entry(i + 1, entry))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { jobs })
    }

    /// Decode and validate the job entry at 1-based `index`.
    fn parse_entry(index: usize, entry: Value) -> Result<JobConfig, ConfigError> {
        let job: JobConfig = serde_json::from_value(entry).map_err(|e| ConfigError::InvalidEntry {
            index,
            reason: e.to_string(),
        })?;
        job.validate()
            .map_err(|reason| ConfigError::InvalidEntry { index, reason })?;
        Ok(job)
    }

    /// Generate sample configuration file content.
    pub fn sample_json() -> String {
        let sample = vec![
            JobConfig {
                directory: "data/**/*.csv".to_string(),
                columns: vec!["Salary".to_string(), "Bonus".to_string()],
                groupby: vec!["Year".to_string()],
                chart_type: ChartType::Bar,
                chart_label: Some("Total Compensation".to_string()),
            },
            JobConfig {
                directory: "reports/*.csv".to_string(),
                columns: vec!["Amount".to_string()],
                groupby: vec!["Category".to_string()],
                chart_type: ChartType::Line,
                chart_label: None,
            },
        ];
        serde_json::to_string_pretty(&sample).unwrap_or_else(|_| String::from("[]"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write_config(dir: &TempDir, content: &str) -> std::path::PathBuf {
        let path = dir.path().join("config.json");
        std::fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_parse_single_string_fields() {
        let job: JobConfig = serde_json::from_str(
            r#"{
                "directory": "dummy_path/*.csv",
                "columns": "Income",
                "groupby": "Year",
                "chart_type": "bar"
            }"#,
        )
        .unwrap();

        assert_eq!(job.directory, "dummy_path/*.csv");
        assert_eq!(job.columns, vec!["Income"]);
        assert_eq!(job.groupby, vec!["Year"]);
        assert_eq!(job.chart_type, ChartType::Bar);
        assert_eq!(job.chart_label, None);
    }

    #[test]
    fn test_parse_list_fields_and_label() {
        let job: JobConfig = serde_json::from_str(
            r#"{
                "directory": "data/**/*.csv",
                "columns": ["Salary", "Bonus"],
                "groupby": ["Year", "Dept"],
                "chart_type": "line",
                "chart_label": "Pay",
                "unused": 42
            }"#,
        )
        .unwrap();

        assert_eq!(job.columns, vec!["Salary", "Bonus"]);
        assert_eq!(job.groupby, vec!["Year", "Dept"]);
        assert_eq!(job.chart_type, ChartType::Line);
        assert_eq!(job.y_label(), "Pay");
    }

    #[test]
    fn test_default_y_label_joins_columns() {
        let job: JobConfig = serde_json::from_str(
            r#"{"directory": "x", "columns": ["Salary", "Bonus"], "groupby": "Year", "chart_type": "bar"}"#,
        )
        .unwrap();
        assert_eq!(job.y_label(), "Salary + Bonus");
    }

    #[test]
    fn test_load_valid_list() {
        let dir = TempDir::new().unwrap();
        let path = write_config(
            &dir,
            r#"[{"directory": "dummy_path/*.csv", "columns": "Income", "groupby": "Year", "chart_type": "bar"}]"#,
        );

        let list = JobList::load(&path).unwrap();
        assert_eq!(list.jobs.len(), 1);
        assert_eq!(list.jobs[0].directory, "dummy_path/*.csv");
    }

    #[test]
    fn test_load_single_object_root() {
        let dir = TempDir::new().unwrap();
        let path = write_config(
            &dir,
            r#"{"directory": "a/*.csv", "columns": "Income", "groupby": "Year", "chart_type": "line"}"#,
        );

        let list = JobList::load(&path).unwrap();
        assert_eq!(list.jobs.len(), 1);
        assert_eq!(list.jobs[0].chart_type, ChartType::Line);
    }

    #[test]
    fn test_load_missing_file() {
        let err = JobList::load(Path::new("non_existent_file.json")).unwrap_err();
        assert!(matches!(err, ConfigError::NotFound(_)));
    }

    #[test]
    fn test_load_invalid_json() {
        let dir = TempDir::new().unwrap();
        let path = write_config(&dir, "{invalid_json: true");

        let err = JobList::load(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
        assert!(err.to_string().contains("failed to decode JSON"));
    }

    #[test]
    fn test_load_empty_list() {
        let dir = TempDir::new().unwrap();
        let path = write_config(&dir, "[]");

        let err = JobList::load(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Empty(_)));
    }

    #[test]
    fn test_load_unknown_chart_type() {
        let dir = TempDir::new().unwrap();
        let path = write_config(
            &dir,
            r#"[
                {"directory": "a/*.csv", "columns": "A", "groupby": "B", "chart_type": "bar"},
                {"directory": "b/*.csv", "columns": "A", "groupby": "B", "chart_type": "pie"}
            ]"#,
        );

        let err = JobList::load(&path).unwrap_err();
        assert!(err.to_string().starts_with("job entry 2:"));
        match err {
            ConfigError::InvalidEntry { index, reason } => {
                assert_eq!(index, 2);
                assert!(reason.contains("pie"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_load_missing_field_names_entry_and_field() {
        let dir = TempDir::new().unwrap();
        let path = write_config(
            &dir,
            r#"{"directory": "a/*.csv", "columns": "A", "chart_type": "bar"}"#,
        );

        match JobList::load(&path).unwrap_err() {
            ConfigError::InvalidEntry { index, reason } => {
                assert_eq!(index, 1);
                assert!(reason.contains("groupby"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_load_rejects_scalar_root() {
        let dir = TempDir::new().unwrap();
        let path = write_config(&dir, "42");

        assert!(matches!(
            JobList::load(&path).unwrap_err(),
            ConfigError::InvalidEntry { index: 1, .. }
        ));
    }

    #[test]
    fn test_load_rejects_empty_columns() {
        let dir = TempDir::new().unwrap();
        let path = write_config(
            &dir,
            r#"[
                {"directory": "a/*.csv", "columns": "A", "groupby": "B", "chart_type": "bar"},
                {"directory": "b/*.csv", "columns": [], "groupby": "B", "chart_type": "bar"}
            ]"#,
        );

        match JobList::load(&path).unwrap_err() {
            ConfigError::InvalidEntry { index, reason } => {
                assert_eq!(index, 2);
                assert!(reason.contains("columns"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_validate_rejects_blank_groupby_name() {
        let job = JobConfig {
            directory: "a/*.csv".to_string(),
            columns: vec!["A".to_string()],
            groupby: vec![String::new()],
            chart_type: ChartType::Bar,
            chart_label: None,
        };
        assert!(job.validate().is_err());
    }

    #[test]
    fn test_sample_json_round_trips() {
        let sample = JobList::sample_json();
        let jobs: Vec<JobConfig> = serde_json::from_str(&sample).unwrap();
        assert_eq!(jobs.len(), 2);
        assert!(jobs.iter().all(|j| j.validate().is_ok()));
    }
}
