//! The tabular schedule source.

use std::path::PathBuf;

use async_trait::async_trait;
use chrono::NaiveDateTime;

use super::ScheduleError;

/// A single cell of the schedule grid.
///
/// Exported sheets deliver plain text, but sources that preserve typing
/// (a spreadsheet API, a database) can hand over native date values; both
/// flow through the same normalization.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Empty,
    Text(String),
    Date(NaiveDateTime),
}

impl Cell {
    /// Trimmed text content of the cell; `Empty` stringifies to `""`.
    pub fn as_text(&self) -> String {
        match self {
            Cell::Empty => String::new(),
            Cell::Text(s) => s.trim().to_string(),
            Cell::Date(d) => d.format("%m/%d/%Y").to_string(),
        }
    }
}

#[async_trait]
pub trait ScheduleSource: Send + Sync {
    /// Load the full grid, header row first. Called exactly once per query.
    async fn load(&self) -> Result<Vec<Vec<Cell>>, ScheduleError>;
}

/// Schedule source backed by an exported CSV of the scheduling sheet.
pub struct CsvScheduleSource {
    path: PathBuf,
}

impl CsvScheduleSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl ScheduleSource for CsvScheduleSource {
    async fn load(&self) -> Result<Vec<Vec<Cell>>, ScheduleError> {
        if !self.path.exists() {
            return Err(ScheduleError::SourceNotFound(
                self.path.display().to_string(),
            ));
        }

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_path(&self.path)?;

        let mut rows = Vec::new();
        for result in reader.records() {
            let record = result?;
            rows.push(
                record
                    .iter()
                    .map(|field| {
                        if field.trim().is_empty() {
                            Cell::Empty
                        } else {
                            Cell::Text(field.to_string())
                        }
                    })
                    .collect(),
            );
        }
        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_cell_as_text_trims() {
        assert_eq!(Cell::Text("  John  ".to_string()).as_text(), "John");
        assert_eq!(Cell::Empty.as_text(), "");
    }

    #[test]
    fn test_cell_as_text_formats_native_dates() {
        let dt = chrono::NaiveDate::from_ymd_opt(2025, 3, 4)
            .unwrap()
            .and_hms_opt(9, 30, 0)
            .unwrap();
        assert_eq!(Cell::Date(dt).as_text(), "03/04/2025");
    }

    #[tokio::test]
    async fn test_missing_file_is_source_not_found() {
        let source = CsvScheduleSource::new("/definitely/not/here.csv");
        let err = source.load().await.unwrap_err();
        assert!(matches!(err, ScheduleError::SourceNotFound(_)));
    }

    #[tokio::test]
    async fn test_loads_header_and_rows() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "Date,Pet Name").unwrap();
        writeln!(file, "03/04/2025,Rex").unwrap();
        writeln!(file, ",Whiskers").unwrap();

        let source = CsvScheduleSource::new(file.path());
        let grid = source.load().await.unwrap();

        assert_eq!(grid.len(), 3);
        assert_eq!(grid[0][1], Cell::Text("Pet Name".to_string()));
        assert_eq!(grid[1][0], Cell::Text("03/04/2025".to_string()));
        assert_eq!(grid[2][0], Cell::Empty);
    }
}
