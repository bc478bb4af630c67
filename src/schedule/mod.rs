//! Schedule ingestion: the read-only tabular source, row normalization,
//! calendar-day gating, and the appointment query.
//!
//! The schedule sheet is never written to; every query re-reads the full
//! grid and produces fresh records.

pub mod columns;
pub mod filter;
pub mod normalize;
pub mod query;
pub mod record;
pub mod source;

pub use filter::{DateFilter, DateSelection};
pub use query::AppointmentQuery;
pub use record::{AppointmentRecord, AppointmentView};
pub use source::{Cell, CsvScheduleSource, ScheduleSource};

use thiserror::Error;

/// Errors that can occur while querying the schedule.
#[derive(Debug, Error)]
pub enum ScheduleError {
    #[error("schedule source not found: {0}")]
    SourceNotFound(String),
    #[error("required column missing from header: {0}")]
    MissingColumn(&'static str),
    #[error("failed to read schedule source: {0}")]
    Source(#[source] std::io::Error),
    #[error("failed to parse schedule data: {0}")]
    Csv(#[from] csv::Error),
}
