//! Result objects returned by a contract run.

use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

pub use crate::storage::StoredFile;

/// The merged daily artifact. `id` is absent when the merge service
/// returned a reference URL instead of file bytes.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct MergedFile {
    pub id: Option<Uuid>,
    pub name: String,
    pub url: String,
}

/// Outcome of one `create_contracts` run. Constructed once per invocation
/// and handed to the caller; the core retains nothing.
#[derive(Debug, Serialize, ToSchema)]
pub struct BatchResult {
    pub ok: bool,
    /// Number of individual PDFs actually produced.
    pub count: usize,
    pub individuals: Vec<StoredFile>,
    pub merged: Option<MergedFile>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl BatchResult {
    pub fn failure(
        message: impl Into<String>,
        error: Option<String>,
        individuals: Vec<StoredFile>,
    ) -> Self {
        Self {
            ok: false,
            count: individuals.len(),
            individuals,
            merged: None,
            message: Some(message.into()),
            error,
        }
    }
}
