//! Shared application state, constructed once at startup.

use std::path::Path;
use std::sync::Arc;

use crate::config::AppConfig;
use crate::contracts::merge::{HttpMergeClient, MergeCoordinator};
use crate::contracts::runner::ContractJobRunner;
use crate::contracts::service::ContractService;
use crate::contracts::template::TypstTemplateEngine;
use crate::schedule::{AppointmentQuery, CsvScheduleSource, DateFilter};
use crate::storage::LocalStorage;

pub struct AppState {
    pub config: AppConfig,
    pub service: ContractService,
}

impl AppState {
    pub fn from_config(config: AppConfig) -> std::io::Result<Self> {
        let storage = Arc::new(LocalStorage::new(&config.storage_root)?);
        let engine = Arc::new(TypstTemplateEngine::new(
            &config.contract_template_path,
            Path::new(&config.storage_root).join("temp"),
        )?);
        let source = Arc::new(CsvScheduleSource::new(&config.schedule_csv_path));
        let filter = DateFilter::new(config.canonical_offset);

        let query = AppointmentQuery::new(source, filter);
        let runner = ContractJobRunner::new(engine, storage.clone(), config.canonical_offset);
        let client = Arc::new(HttpMergeClient::new(&config.merge_api_url));
        let merger = MergeCoordinator::new(client, storage);

        let service = ContractService::new(query, runner, merger, filter);
        Ok(Self { config, service })
    }
}
