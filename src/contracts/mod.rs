//! Contract generation pipeline: per-appointment template jobs, the
//! remote PDF merge, and the orchestration that ties a run together.

pub mod handlers;
pub mod merge;
pub mod models;
pub mod runner;
pub mod service;
pub mod template;

pub use models::{BatchResult, MergedFile};
pub use service::ContractService;
pub use template::{TemplateEngine, TypstTemplateEngine};

use thiserror::Error;

/// Errors from a single contract job. One failing job never aborts the
/// batch.
#[derive(Debug, Error)]
pub enum ContractError {
    #[error("failed to clone template: {0}")]
    CloneIo(#[source] std::io::Error),
    #[error("failed to apply substitution: {0}")]
    SubstituteIo(#[source] std::io::Error),
    #[error("render command failed: {0}")]
    RenderIo(#[source] std::io::Error),
    #[error("render command exited with status {0}")]
    RenderExit(i32),
    #[error("failed to read rendered PDF: {0}")]
    ReadPdf(#[source] std::io::Error),
    #[error("empty PDF generated")]
    EmptyPdf,
    #[error("storage error: {0}")]
    Storage(#[from] crate::storage::StorageError),
}
