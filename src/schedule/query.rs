//! The appointment query: load the grid once, validate the header, and
//! gate every data row in source order.

use std::sync::Arc;

use log::info;

use super::columns::ColumnIndex;
use super::filter::{DateFilter, DateSelection};
use super::normalize::normalize_row;
use super::record::AppointmentRecord;
use super::source::ScheduleSource;
use super::ScheduleError;

pub struct AppointmentQuery {
    source: Arc<dyn ScheduleSource>,
    filter: DateFilter,
}

impl AppointmentQuery {
    pub fn new(source: Arc<dyn ScheduleSource>, filter: DateFilter) -> Self {
        Self { source, filter }
    }

    /// Read-only and idempotent; safe to call repeatedly. Fewer than two
    /// rows (header plus at least one data row) yields an empty list.
    pub async fn query(
        &self,
        selection: DateSelection,
    ) -> Result<Vec<AppointmentRecord>, ScheduleError> {
        let grid = self.source.load().await?;
        if grid.len() < 2 {
            info!("schedule has no data rows");
            return Ok(Vec::new());
        }

        let index = ColumnIndex::from_header(&grid[0])?;
        let total = grid.len() - 1;
        let mut records = Vec::new();

        for (i, row) in grid.iter().skip(1).enumerate() {
            let candidate = normalize_row(row, &index, i + 2);
            if !candidate.qualifies() {
                continue;
            }
            let Some(raw_date) = candidate.raw_date else {
                continue;
            };
            if !self.filter.matches(raw_date, selection) {
                continue;
            }
            if let Some(record) = candidate.into_record() {
                records.push(record);
            }
        }

        info!("appointment query matched {} of {} rows", records.len(), total);
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schedule::source::Cell;
    use async_trait::async_trait;
    use chrono::{FixedOffset, NaiveDate};

    struct GridSource {
        grid: Vec<Vec<Cell>>,
    }

    #[async_trait]
    impl ScheduleSource for GridSource {
        async fn load(&self) -> Result<Vec<Vec<Cell>>, ScheduleError> {
            Ok(self.grid.clone())
        }
    }

    fn header() -> Vec<Cell> {
        [
            "Date",
            "Appointment Status",
            "Transportation Needed",
            "First Name",
            "Last Name",
            "Address",
            "City",
            "State",
            "Zip Code",
            "Phone Number",
            "Email",
            "Pet Name",
            "Species",
            "Breed One",
            "Breed Two",
            "Age",
            "Sex",
            "Color",
            "Appointment Type",
        ]
        .iter()
        .map(|name| Cell::Text(name.to_string()))
        .collect()
    }

    fn data_row(date: Cell, status: &str, transport: &str, first: &str) -> Vec<Cell> {
        let mut row = vec![
            date,
            Cell::Text(status.to_string()),
            Cell::Text(transport.to_string()),
            Cell::Text(first.to_string()),
            Cell::Text("Lovelace".to_string()),
        ];
        row.extend(std::iter::repeat(Cell::Empty).take(14));
        row
    }

    fn query_over(grid: Vec<Vec<Cell>>) -> AppointmentQuery {
        AppointmentQuery::new(
            Arc::new(GridSource { grid }),
            DateFilter::new(FixedOffset::west_opt(5 * 3600).unwrap()),
        )
    }

    fn march_4() -> DateSelection {
        DateSelection::On(NaiveDate::from_ymd_opt(2025, 3, 4).unwrap())
    }

    #[tokio::test]
    async fn test_header_only_grid_is_empty() {
        let query = query_over(vec![header()]);
        let records = query.query(march_4()).await.unwrap();
        assert!(records.is_empty());
    }

    #[tokio::test]
    async fn test_gating_excludes_non_qualifying_rows() {
        let grid = vec![
            header(),
            data_row(Cell::Text("03/04/2025".into()), "Scheduled", "yes", "Ada"),
            data_row(Cell::Text("03/04/2025".into()), "Cancelled", "yes", "Grace"),
            data_row(Cell::Text("03/04/2025".into()), "Scheduled", "no", "Edsger"),
            data_row(Cell::Text("not a date".into()), "Scheduled", "yes", "Alan"),
            data_row(Cell::Text("03/05/2025".into()), "Scheduled", "yes", "Barbara"),
        ];
        let query = query_over(grid);
        let records = query.query(march_4()).await.unwrap();

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].name, "Ada Lovelace");
        assert_eq!(records[0].row_number, 2);
    }

    #[tokio::test]
    async fn test_source_order_is_preserved() {
        let grid = vec![
            header(),
            data_row(Cell::Text("03/04/2025".into()), "Scheduled", "yes", "Zoe"),
            data_row(Cell::Text("03/04/2025".into()), "Scheduled", "Yes", "Ada"),
            data_row(Cell::Text("03/04/2025".into()), "Scheduled", "YES", "Mel"),
        ];
        let query = query_over(grid);
        let records = query.query(march_4()).await.unwrap();

        let names: Vec<&str> = records.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, ["Zoe Lovelace", "Ada Lovelace", "Mel Lovelace"]);
    }

    #[tokio::test]
    async fn test_time_of_day_noise_never_mismatches() {
        let day = NaiveDate::from_ymd_opt(2025, 3, 4).unwrap();
        let grid = vec![
            header(),
            data_row(
                Cell::Date(day.and_hms_opt(23, 59, 0).unwrap()),
                "Scheduled",
                "yes",
                "Late",
            ),
            data_row(
                Cell::Date(day.and_hms_opt(0, 1, 0).unwrap()),
                "Scheduled",
                "yes",
                "Early",
            ),
            data_row(
                Cell::Date(day.succ_opt().unwrap().and_hms_opt(0, 1, 0).unwrap()),
                "Scheduled",
                "yes",
                "NextDay",
            ),
        ];
        let query = query_over(grid);
        let records = query.query(DateSelection::On(day)).await.unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].name, "Late Lovelace");
        assert_eq!(records[1].name, "Early Lovelace");
    }

    #[tokio::test]
    async fn test_missing_column_fails_fast() {
        let mut short_header = header();
        short_header.pop(); // drop Appointment Type
        let grid = vec![
            short_header,
            data_row(Cell::Text("03/04/2025".into()), "Scheduled", "yes", "Ada"),
        ];
        let query = query_over(grid);
        let err = query.query(march_4()).await.unwrap_err();
        assert!(matches!(err, ScheduleError::MissingColumn("Appointment Type")));
    }
}
