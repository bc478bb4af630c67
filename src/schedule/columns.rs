//! The schedule sheet's required columns and the validated header index.

use std::collections::HashMap;

use super::source::Cell;
use super::ScheduleError;

pub const DATE: &str = "Date";
pub const APPT_STATUS: &str = "Appointment Status";
pub const TRANSPORT_NEEDED: &str = "Transportation Needed";
pub const FIRST_NAME: &str = "First Name";
pub const LAST_NAME: &str = "Last Name";
pub const ADDRESS: &str = "Address";
pub const CITY: &str = "City";
pub const STATE: &str = "State";
pub const ZIP: &str = "Zip Code";
pub const PHONE: &str = "Phone Number";
pub const EMAIL: &str = "Email";
pub const PET_NAME: &str = "Pet Name";
pub const SPECIES: &str = "Species";
pub const BREED_ONE: &str = "Breed One";
pub const BREED_TWO: &str = "Breed Two";
pub const AGE: &str = "Age";
pub const SEX: &str = "Sex";
pub const COLOR: &str = "Color";
pub const APPT_TYPE: &str = "Appointment Type";

const REQUIRED: [&str; 19] = [
    DATE,
    APPT_STATUS,
    TRANSPORT_NEEDED,
    FIRST_NAME,
    LAST_NAME,
    ADDRESS,
    CITY,
    STATE,
    ZIP,
    PHONE,
    EMAIL,
    PET_NAME,
    SPECIES,
    BREED_ONE,
    BREED_TWO,
    AGE,
    SEX,
    COLOR,
    APPT_TYPE,
];

/// Name→position index over the header row, validated once per query so
/// per-row access can never silently read the wrong cell.
#[derive(Debug)]
pub struct ColumnIndex {
    positions: HashMap<&'static str, usize>,
}

impl ColumnIndex {
    /// Build from the header row. The first missing required column is
    /// reported by name.
    pub fn from_header(header: &[Cell]) -> Result<Self, ScheduleError> {
        let names: Vec<String> = header.iter().map(Cell::as_text).collect();
        let mut positions = HashMap::with_capacity(REQUIRED.len());
        for key in REQUIRED {
            match names.iter().position(|name| name == key) {
                Some(i) => {
                    positions.insert(key, i);
                }
                None => return Err(ScheduleError::MissingColumn(key)),
            }
        }
        Ok(Self { positions })
    }

    /// Trimmed text of the named column; rows shorter than the header
    /// yield an empty string.
    pub fn text(&self, row: &[Cell], key: &'static str) -> String {
        self.cell(row, key).map(Cell::as_text).unwrap_or_default()
    }

    /// The raw cell of the named column, when the row is long enough.
    pub fn cell<'a>(&self, row: &'a [Cell], key: &'static str) -> Option<&'a Cell> {
        self.positions.get(key).and_then(|&i| row.get(i))
    }
}
