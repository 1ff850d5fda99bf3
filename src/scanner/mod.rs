//! File resolver for discovering input files.
//!
//! Expands a job's glob pattern into the list of regular files it matches.
//! A `**` segment matches any depth of subdirectories.

use crate::error::ProcessError;
use glob::MatchOptions;
use std::path::PathBuf;
use tracing::{debug, warn};

/// Options for pattern matching.
#[derive(Debug, Clone, Copy)]
pub struct ScanConfig {
    /// Whether matching is case sensitive.
    pub case_sensitive: bool,
    /// Whether `*` and `?` may match a leading `.` in a file name.
    pub include_hidden: bool,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            case_sensitive: true,
            include_hidden: false,
        }
    }
}

impl From<ScanConfig> for MatchOptions {
    fn from(config: ScanConfig) -> Self {
        MatchOptions {
            case_sensitive: config.case_sensitive,
            // `*` stays within one path segment; only `**` crosses directories
            require_literal_separator: true,
            require_literal_leading_dot: !config.include_hidden,
        }
    }
}

/// File resolver for glob patterns.
pub struct FileResolver {
    config: ScanConfig,
}

impl FileResolver {
    /// Create a new file resolver.
    pub fn new(config: ScanConfig) -> Self {
        Self { config }
    }

    /// Resolve a pattern to the matching files, in sorted order.
    ///
    /// No matches is an empty list, not an error. Directories are skipped.
    pub fn resolve(&self, pattern: &str) -> Result<Vec<PathBuf>, ProcessError> {
        let entries = glob::glob_with(pattern, self.config.into()).map_err(|source| {
            ProcessError::InvalidPattern {
                pattern: pattern.to_string(),
                source,
            }
        })?;

        let mut files = Vec::new();
        for entry in entries {
            match entry {
                Ok(path) if path.is_file() => files.push(path),
                Ok(path) => debug!("Skipping non-file match: {}", path.display()),
                Err(e) => warn!("Error reading path while matching '{}': {}", pattern, e),
            }
        }

        files.sort();
        Ok(files)
    }
}

impl Default for FileResolver {
    fn default() -> Self {
        Self::new(ScanConfig::default())
    }
}
