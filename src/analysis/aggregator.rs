//! Column selection and group-by aggregation.
//!
//! This module turns a loaded table into an `AggregatedSeries`: one
//! calculated value per row (the sum of the selected columns), reduced by
//! summing within each group key.

use crate::config::JobConfig;
use crate::error::ProcessError;
use crate::models::{AggregatedSeries, GroupKey};
use crate::table::Table;
use std::collections::HashMap;

/// Parse a cell as a number. Empty, non-numeric, NaN and infinite cells
/// yield `None`.
pub fn parse_numeric(cell: &str) -> Option<f64> {
    cell.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Resolve column names to header positions.
fn resolve_columns(table: &Table, names: &[String]) -> Result<Vec<usize>, ProcessError> {
    names
        .iter()
        .map(|name| {
            table
                .column_index(name)
                .ok_or_else(|| ProcessError::ColumnNotFound {
                    column: name.clone(),
                })
        })
        .collect()
}

/// Compute the per-row calculated value: the sum of the selected columns.
///
/// With one column this is that column's value. Cells that do not parse as
/// numbers contribute zero.
pub fn calculated_values(table: &Table, columns: &[String]) -> Result<Vec<f64>, ProcessError> {
    let indices = resolve_columns(table, columns)?;

    Ok((0..table.row_count())
        .map(|row| {
            indices
                .iter()
                .map(|&col| parse_numeric(table.cell(row, col)).unwrap_or(0.0))
                .sum()
        })
        .collect())
}

/// Group calculated values by key and sum each group.
///
/// Groups come out in first-appearance order.
pub fn group_sum(keys: impl IntoIterator<Item = GroupKey>, values: &[f64]) -> AggregatedSeries {
    let mut entries: Vec<(GroupKey, f64)> = Vec::new();
    let mut positions: HashMap<GroupKey, usize> = HashMap::new();

    for (key, value) in keys.into_iter().zip(values.iter()) {
        match positions.get(&key) {
            Some(&pos) => entries[pos].1 += value,
            None => {
                positions.insert(key.clone(), entries.len());
                entries.push((key, *value));
            }
        }
    }

    AggregatedSeries::from_entries(entries)
}

/// Aggregate a table according to a job entry.
///
/// Fails with `ColumnNotFound` if any value or key column is missing.
pub fn aggregate(table: &Table, job: &JobConfig) -> Result<AggregatedSeries, ProcessError> {
    let values = calculated_values(table, &job.columns)?;
    let key_indices = resolve_columns(table, &job.groupby)?;

    let keys = (0..table.row_count()).map(|row| {
        GroupKey(
            key_indices
                .iter()
                .map(|&col| table.cell(row, col).to_string())
                .collect(),
        )
    });

    Ok(group_sum(keys, &values))
}
