//! Top-level orchestration of a contract run.

use log::{error, info};

use crate::schedule::{
    AppointmentQuery, AppointmentRecord, DateFilter, DateSelection, ScheduleError,
};

use super::merge::MergeCoordinator;
use super::models::BatchResult;
use super::runner::ContractJobRunner;

pub struct ContractService {
    query: AppointmentQuery,
    runner: ContractJobRunner,
    merger: MergeCoordinator,
    filter: DateFilter,
}

impl ContractService {
    pub fn new(
        query: AppointmentQuery,
        runner: ContractJobRunner,
        merger: MergeCoordinator,
        filter: DateFilter,
    ) -> Self {
        Self {
            query,
            runner,
            merger,
            filter,
        }
    }

    /// Read-only listing of qualifying appointments for the selection.
    pub async fn list_appointments(
        &self,
        selection: DateSelection,
    ) -> Result<Vec<AppointmentRecord>, ScheduleError> {
        self.query.query(selection).await
    }

    /// Full run: query, generate individual PDFs, merge. Never fails out
    /// of the top level; every failure degrades into a structured result.
    pub async fn create_contracts(&self, selection: DateSelection) -> BatchResult {
        let label = self.selection_label(selection);

        let appointments = match self.query.query(selection).await {
            Ok(appointments) => appointments,
            Err(err) => {
                error!("appointment query failed: {err}");
                return BatchResult::failure(
                    format!("Error creating contracts for {label}."),
                    Some(err.to_string()),
                    Vec::new(),
                );
            }
        };

        if appointments.is_empty() {
            return BatchResult::failure(
                format!("No transport appointments for {label}."),
                None,
                Vec::new(),
            );
        }

        let (individuals, failures) = self.runner.run(&appointments).await;
        let job_errors = if failures.is_empty() {
            None
        } else {
            Some(
                failures
                    .iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
                    .join("; "),
            )
        };

        if individuals.is_empty() {
            return BatchResult::failure(
                format!("Error creating contracts for {label}."),
                job_errors,
                Vec::new(),
            );
        }

        let output_name = format!(
            "Transportation_Contracts_{}.pdf",
            self.output_stamp(selection)
        );
        match self.merger.merge(&individuals, &output_name).await {
            Ok(merged) => {
                info!(
                    "contract run for {label} complete: {} individual PDFs",
                    individuals.len()
                );
                BatchResult {
                    ok: true,
                    count: individuals.len(),
                    individuals,
                    merged,
                    message: None,
                    error: job_errors,
                }
            }
            Err(err) => {
                error!("merge failed for {label}: {err}");
                BatchResult {
                    ok: false,
                    count: individuals.len(),
                    individuals,
                    merged: None,
                    message: Some(format!("Error creating contracts for {label}.")),
                    error: Some(err.to_string()),
                }
            }
        }
    }

    fn selection_label(&self, selection: DateSelection) -> String {
        match selection {
            DateSelection::On(date) => date.format("%Y-%m-%d").to_string(),
            DateSelection::Upcoming => "today or tomorrow".to_string(),
        }
    }

    fn output_stamp(&self, selection: DateSelection) -> String {
        let date = match selection {
            DateSelection::On(date) => date,
            DateSelection::Upcoming => self.filter.today(),
        };
        date.format("%Y%m%d").to_string()
    }
}
