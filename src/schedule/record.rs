//! Appointment records: the internal model carrying the raw date for
//! gating, and the display-only view returned to callers.

use chrono::NaiveDate;
use serde::Serialize;
use utoipa::ToSchema;

/// One qualifying schedule row. Produced fresh per query, immutable
/// thereafter.
#[derive(Debug, Clone)]
pub struct AppointmentRecord {
    /// 1-based position in the source grid counting the header row;
    /// diagnostic only.
    pub row_number: usize,
    /// Calendar date used for comparison only.
    pub raw_date: NaiveDate,
    /// Display date, e.g. "March 4, 2025".
    pub date: String,
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

/// Display-only projection of an [`AppointmentRecord`]; the raw date never
/// leaves the core.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AppointmentView {
    pub row_number: usize,
    pub date: String,
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

impl From<&AppointmentRecord> for AppointmentView {
    fn from(record: &AppointmentRecord) -> Self {
        Self {
            row_number: record.row_number,
            date: record.date.clone(),
            name: record.name.clone(),
            address1: record.address1.clone(),
            address2: record.address2.clone(),
            phone: record.phone.clone(),
            email: record.email.clone(),
            pet_name: record.pet_name.clone(),
            appt_type: record.appt_type.clone(),
            species_breed: record.species_breed.clone(),
            age_sex_color: record.age_sex_color.clone(),
        }
    }
}

/// Join the non-empty parts with `sep`. Empty parts are omitted entirely,
/// so the result never carries a dangling separator.
pub fn join_non_empty(parts: &[&str], sep: &str) -> String {
    parts
        .iter()
        .filter(|part| !part.is_empty())
        .copied()
        .collect::<Vec<_>>()
        .join(sep)
}
