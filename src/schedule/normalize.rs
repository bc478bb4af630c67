//! Row normalization: raw cells into a typed appointment candidate.
//!
//! Normalization never discards a row; gating and date matching decide
//! whether a candidate becomes a record.

use chrono::{NaiveDate, NaiveDateTime};
use lazy_static::lazy_static;
use regex::Regex;

use super::columns::{self, ColumnIndex};
use super::record::{join_non_empty, AppointmentRecord};
use super::source::Cell;

lazy_static! {
    static ref SHEET_DATE: Regex = Regex::new(r"^(\d{1,2})[/\-](\d{1,2})[/\-](\d{4})$").unwrap();
}

/// A normalized row, not yet gated.
#[derive(Debug)]
pub struct RowCandidate {
    pub row_number: usize,
    pub status: String,
    pub transport_needed: String,
    /// `None` means the date cell did not parse; such a row can never
    /// match a selection.
    pub raw_date: Option<NaiveDate>,
    pub name: String,
    pub address1: String,
    pub address2: String,
    pub phone: String,
    pub email: String,
    pub pet_name: String,
    pub appt_type: String,
    pub species_breed: String,
    pub age_sex_color: String,
}

impl RowCandidate {
    /// All three gates must hold simultaneously: exact status match,
    /// case-insensitive transport flag, and a parseable date.
    pub fn qualifies(&self) -> bool {
        self.status == "Scheduled"
            && self.transport_needed.eq_ignore_ascii_case("yes")
            && self.raw_date.is_some()
    }

    /// Finalize into a record; `None` when the date never parsed.
    pub fn into_record(self) -> Option<AppointmentRecord> {
        let raw_date = self.raw_date?;
        Some(AppointmentRecord {
            row_number: self.row_number,
            raw_date,
            date: format_display_date(raw_date),
            name: self.name,
            address1: self.address1,
            address2: self.address2,
            phone: self.phone,
            email: self.email,
            pet_name: self.pet_name,
            appt_type: self.appt_type,
            species_breed: self.species_breed,
            age_sex_color: self.age_sex_color,
        })
    }
}

/// Normalize one data row. `row_number` is the 1-based grid position
/// counting the header (first data row = 2).
pub fn normalize_row(row: &[Cell], index: &ColumnIndex, row_number: usize) -> RowCandidate {
    let first = index.text(row, columns::FIRST_NAME);
    let last = index.text(row, columns::LAST_NAME);
    let city = index.text(row, columns::CITY);
    let state = index.text(row, columns::STATE);
    let zip = index.text(row, columns::ZIP);
    let species = index.text(row, columns::SPECIES);
    let breed_one = index.text(row, columns::BREED_ONE);
    let breed_two = index.text(row, columns::BREED_TWO);
    let age = index.text(row, columns::AGE);
    let sex = index.text(row, columns::SEX);
    let color = index.text(row, columns::COLOR);

    let breeds = join_non_empty(&[&breed_one, &breed_two], " / ");

    RowCandidate {
        row_number,
        status: index.text(row, columns::APPT_STATUS),
        transport_needed: index.text(row, columns::TRANSPORT_NEEDED),
        raw_date: index.cell(row, columns::DATE).and_then(parse_date_cell),
        name: join_non_empty(&[&first, &last], " "),
        address1: index.text(row, columns::ADDRESS),
        address2: join_non_empty(&[&city, &state, &zip], ", "),
        phone: index.text(row, columns::PHONE),
        email: index.text(row, columns::EMAIL),
        pet_name: index.text(row, columns::PET_NAME),
        appt_type: index.text(row, columns::APPT_TYPE),
        species_breed: join_non_empty(&[&species, &breeds], " • "),
        age_sex_color: join_non_empty(&[&age, &sex, &color], " • "),
    }
}

/// Parse a date cell: native values pass through with the time-of-day
/// stripped; text accepts `M/D/YYYY` (`/` or `-` separated) and ISO
/// fallbacks.
pub fn parse_date_cell(cell: &Cell) -> Option<NaiveDate> {
    match cell {
        Cell::Empty => None,
        Cell::Date(dt) => Some(dt.date()),
        Cell::Text(raw) => parse_date_text(raw.trim()),
    }
}

/// Same parsing applied to explicit target-date strings.
pub fn parse_date_text(s: &str) -> Option<NaiveDate> {
    if s.is_empty() {
        return None;
    }
    if let Some(caps) = SHEET_DATE.captures(s) {
        let month: u32 = caps[1].parse().ok()?;
        let day: u32 = caps[2].parse().ok()?;
        let year: i32 = caps[3].parse().ok()?;
        return NaiveDate::from_ymd_opt(year, month, day);
    }
    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Some(date);
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S") {
        return Some(dt.date());
    }
    if let Ok(date) = NaiveDate::parse_from_str(s, "%B %d, %Y") {
        return Some(date);
    }
    None
}

/// Display form used in the contract body, e.g. "March 4, 2025".
pub fn format_display_date(date: NaiveDate) -> String {
    date.format("%B %-d, %Y").to_string()
}
