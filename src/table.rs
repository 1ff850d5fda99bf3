//! CSV table loading.

use crate::error::ProcessError;
use std::io::Read;
use std::path::Path;
use tracing::debug;

/// Header plus string rows read from one CSV file.
#[derive(Debug, Clone, Default)]
pub struct Table {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Table {
    /// Load a CSV file whose first row names the columns.
    pub fn load(path: &Path) -> Result<Self, ProcessError> {
        let read_err = |source| ProcessError::Read {
            path: path.to_path_buf(),
            source,
        };

        let reader = csv::ReaderBuilder::new()
            .flexible(true)
            .trim(csv::Trim::All)
            .from_path(path)
            .map_err(read_err)?;

        let table = Self::from_csv_reader(reader).map_err(read_err)?;
        debug!(
            "Loaded {} rows x {} columns from {}",
            table.row_count(),
            table.headers.len(),
            path.display()
        );
        Ok(table)
    }

    /// Parse CSV text from any reader.
    #[cfg(test)]
    pub fn from_reader<R: Read>(rdr: R) -> Result<Self, csv::Error> {
        let reader = csv::ReaderBuilder::new()
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(rdr);
        Self::from_csv_reader(reader)
    }

    fn from_csv_reader<R: Read>(mut reader: csv::Reader<R>) -> Result<Self, csv::Error> {
        let headers = reader.headers()?.iter().map(String::from).collect();

        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record?;
            rows.push(record.iter().map(String::from).collect());
        }

        Ok(Self { headers, rows })
    }

    /// Position of a column in the header, by exact name.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    /// Cell at `(row, column)`. Cells past the end of a short row read as empty.
    pub fn cell(&self, row: usize, column: usize) -> &str {
        self.rows
            .get(row)
            .and_then(|r| r.get(column))
            .map(String::as_str)
            .unwrap_or("")
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_reader_trims_cells() {
        let table = Table::from_reader("Year, Amount\n2023 , 100\n2024,  250\n".as_bytes()).unwrap();

        assert_eq!(table.row_count(), 2);
        assert_eq!(table.column_index("Amount"), Some(1));
        assert_eq!(table.cell(0, 0), "2023");
        assert_eq!(table.cell(1, 1), "250");
    }

    #[test]
    fn test_short_rows_read_as_empty() {
        let table = Table::from_reader("A,B,C\n1,2\n".as_bytes()).unwrap();

        assert_eq!(table.cell(0, 1), "2");
        assert_eq!(table.cell(0, 2), "");
        assert_eq!(table.cell(5, 0), "");
    }

    #[test]
    fn test_column_lookup_is_exact() {
        let table = Table::from_reader("Amount\n1\n".as_bytes()).unwrap();
        assert_eq!(table.column_index("amount"), None);
        assert_eq!(table.column_index("Amount"), Some(0));
    }

    #[test]
    fn test_header_only_file() {
        let table = Table::from_reader("Year,Amount\n".as_bytes()).unwrap();
        assert_eq!(table.row_count(), 0);
        assert_eq!(table.column_index("Year"), Some(0));
    }

    #[test]
    fn test_load_missing_file_is_read_error() {
        let err = Table::load(Path::new("does/not/exist.csv")).unwrap_err();
        assert!(matches!(err, ProcessError::Read { .. }));
    }
}
