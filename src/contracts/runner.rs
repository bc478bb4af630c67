//! Per-appointment document jobs.
//!
//! Policy: a failing job is recorded and the loop continues with the
//! remaining appointments. Clones are discarded unconditionally after the
//! loop, success or not.

use std::sync::Arc;

use chrono::{FixedOffset, Utc};
use lazy_static::lazy_static;
use log::{error, info, warn};
use regex::Regex;

use crate::schedule::AppointmentRecord;
use crate::storage::{BlobStorage, StorageArea, StoredFile};

use super::template::{tokens, TemplateClone, TemplateEngine};
use super::ContractError;

lazy_static! {
    static ref UNSAFE_NAME: Regex = Regex::new(r"[^A-Za-z0-9_.\- ]+").unwrap();
}

const MAX_NAME_LEN: usize = 80;

/// Collapse runs of characters storage cannot accept and cap the length.
pub fn sanitize_name(raw: &str) -> String {
    UNSAFE_NAME
        .replace_all(raw.trim(), "_")
        .chars()
        .take(MAX_NAME_LEN)
        .collect()
}

/// A failed job, tagged with the appointment it belongs to.
#[derive(Debug)]
pub struct JobError {
    pub appointment: String,
    pub error: ContractError,
}

impl std::fmt::Display for JobError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.appointment, self.error)
    }
}

pub struct ContractJobRunner {
    engine: Arc<dyn TemplateEngine>,
    storage: Arc<dyn BlobStorage>,
    offset: FixedOffset,
}

impl ContractJobRunner {
    pub fn new(
        engine: Arc<dyn TemplateEngine>,
        storage: Arc<dyn BlobStorage>,
        offset: FixedOffset,
    ) -> Self {
        Self {
            engine,
            storage,
            offset,
        }
    }

    /// Run every appointment in source order, collecting stored PDFs and
    /// per-job errors.
    pub async fn run(
        &self,
        appointments: &[AppointmentRecord],
    ) -> (Vec<StoredFile>, Vec<JobError>) {
        let mut individuals = Vec::new();
        let mut failures = Vec::new();
        let mut clones: Vec<TemplateClone> = Vec::new();

        for appointment in appointments {
            match self.run_one(appointment, &mut clones).await {
                Ok(stored) => individuals.push(stored),
                Err(err) => {
                    error!("contract job failed for {}: {}", appointment.name, err);
                    failures.push(JobError {
                        appointment: appointment.name.clone(),
                        error: err,
                    });
                }
            }
        }

        for clone in &clones {
            if let Err(err) = self.engine.discard(clone) {
                warn!("failed to discard temp clone {}: {}", clone.name, err);
            }
        }

        info!(
            "created {} individual PDFs ({} failed)",
            individuals.len(),
            failures.len()
        );
        (individuals, failures)
    }

    async fn run_one(
        &self,
        appointment: &AppointmentRecord,
        clones: &mut Vec<TemplateClone>,
    ) -> Result<StoredFile, ContractError> {
        let stamp = Utc::now()
            .with_timezone(&self.offset)
            .format("%Y%m%d_%H%M%S");
        let clone_name = format!(
            "TransportContract_{}_{}",
            sanitize_name(&appointment.name),
            stamp
        );

        let clone = self.engine.clone_template(&clone_name)?;
        clones.push(clone.clone());

        // a token that fails to substitute is logged; the rest still apply
        for (token, value) in placeholder_values(appointment) {
            if let Err(err) = self.engine.substitute(&clone, token, value) {
                warn!(
                    "substitution of {} failed for {}: {}",
                    token, appointment.name, err
                );
            }
        }

        let pdf = self.engine.export_pdf(&clone)?;
        if pdf.is_empty() {
            return Err(ContractError::EmptyPdf);
        }

        let stored = self
            .storage
            .store(StorageArea::Individual, &format!("{clone_name}.pdf"), &pdf)
            .await?;
        Ok(stored)
    }
}

/// Token → field value for one appointment.
pub fn placeholder_values(a: &AppointmentRecord) -> [(&'static str, &str); 10] {
    [
        (tokens::DATE, a.date.as_str()),
        (tokens::NAME, a.name.as_str()),
        (tokens::ADDRESS, a.address1.as_str()),
        (tokens::ADDRESS2, a.address2.as_str()),
        (tokens::PHONE, a.phone.as_str()),
        (tokens::EMAIL, a.email.as_str()),
        (tokens::PET_NAME, a.pet_name.as_str()),
        (tokens::SPECIES_BREED, a.species_breed.as_str()),
        (tokens::AGE_SEX_COLOR, a.age_sex_color.as_str()),
        (tokens::APPT_TYPE, a.appt_type.as_str()),
    ]
}
