//! Calendar-day gating in the canonical time zone.

use chrono::{FixedOffset, NaiveDate, Utc};

use super::normalize::parse_date_text;

/// Which day(s) a query targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateSelection {
    /// An explicit calendar day.
    On(NaiveDate),
    /// The default when no date is supplied: today or tomorrow.
    Upcoming,
}

impl DateSelection {
    /// Parse an explicit target-date string with the same logic applied
    /// to row dates.
    pub fn parse(raw: &str) -> Option<Self> {
        parse_date_text(raw.trim()).map(Self::On)
    }
}

/// Matches row dates against a selection using day keys computed in one
/// configured UTC offset, so the host's local zone never shifts a day.
#[derive(Debug, Clone, Copy)]
pub struct DateFilter {
    offset: FixedOffset,
}

impl DateFilter {
    pub fn new(offset: FixedOffset) -> Self {
        Self { offset }
    }

    /// Today's calendar date in the canonical offset.
    pub fn today(&self) -> NaiveDate {
        Utc::now().with_timezone(&self.offset).date_naive()
    }

    /// The calendar day immediately following today.
    pub fn tomorrow(&self) -> NaiveDate {
        self.today().succ_opt().unwrap_or_else(|| self.today())
    }

    pub fn matches(&self, row_date: NaiveDate, selection: DateSelection) -> bool {
        match selection {
            DateSelection::On(target) => day_key(row_date) == day_key(target),
            DateSelection::Upcoming => {
                let key = day_key(row_date);
                key == day_key(self.today()) || key == day_key(self.tomorrow())
            }
        }
    }
}

/// `yyyymmdd` comparison key; time-of-day never reaches a comparison.
pub fn day_key(date: NaiveDate) -> String {
    date.format("%Y%m%d").to_string()
}
