//! Remote PDF merge: payload building, the HTTP client, and persistence
//! of the merged result.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use log::{info, warn};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::storage::{BlobStorage, StorageArea, StoredFile};

use super::models::MergedFile;

/// Response bodies are truncated to this length for diagnostics.
const BODY_LOG_LIMIT: usize = 300;

#[derive(Debug, Error)]
pub enum MergeError {
    #[error("merge request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("merge service returned {code}: {body}")]
    Status { code: u16, body: String },
    #[error("invalid JSON from merge service: {0}")]
    InvalidResponse(#[source] serde_json::Error),
    #[error("merge service returned undecodable content: {0}")]
    Decode(#[from] base64::DecodeError),
    #[error("storage error: {0}")]
    Storage(#[from] crate::storage::StorageError),
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MergeFilePayload {
    pub name: String,
    pub content_base64: String,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MergeRequest {
    pub output_name: String,
    pub files: Vec<MergeFilePayload>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MergeResponse {
    pub content_base64: Option<String>,
    pub file_name: Option<String>,
    pub file_url: Option<String>,
}

#[async_trait]
pub trait MergeClient: Send + Sync {
    async fn merge(&self, request: &MergeRequest) -> Result<MergeResponse, MergeError>;
}

/// reqwest-backed client for the stateless merge endpoint.
pub struct HttpMergeClient {
    client: reqwest::Client,
    url: String,
}

impl HttpMergeClient {
    pub fn new(url: impl Into<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(120))
            .user_agent("transport-helper-server/0.3")
            .build()
            .expect("failed to create HTTP client");
        Self {
            client,
            url: url.into(),
        }
    }
}

#[async_trait]
impl MergeClient for HttpMergeClient {
    async fn merge(&self, request: &MergeRequest) -> Result<MergeResponse, MergeError> {
        info!("merging {} PDFs via {}", request.files.len(), self.url);

        let response = self.client.post(&self.url).json(request).send().await?;
        let code = response.status().as_u16();
        let body = response.text().await?;

        if !(200..300).contains(&code) {
            return Err(MergeError::Status {
                code,
                body: truncate_body(&body),
            });
        }
        serde_json::from_str(&body).map_err(MergeError::InvalidResponse)
    }
}

fn truncate_body(body: &str) -> String {
    body.chars().take(BODY_LOG_LIMIT).collect()
}

/// Collects the individual PDFs, invokes the merge service once, and
/// persists (or passes through) the combined result.
pub struct MergeCoordinator {
    client: Arc<dyn MergeClient>,
    storage: Arc<dyn BlobStorage>,
}

impl MergeCoordinator {
    pub fn new(client: Arc<dyn MergeClient>, storage: Arc<dyn BlobStorage>) -> Self {
        Self { client, storage }
    }

    /// `Ok(None)` means the service answered 2xx but supplied neither
    /// inline content nor a URL; the run still counts as merged-nothing.
    pub async fn merge(
        &self,
        individuals: &[StoredFile],
        output_name: &str,
    ) -> Result<Option<MergedFile>, MergeError> {
        let mut files = Vec::with_capacity(individuals.len());
        for pdf in individuals {
            let bytes = self.storage.read(StorageArea::Individual, &pdf.name).await?;
            files.push(MergeFilePayload {
                name: pdf.name.clone(),
                content_base64: BASE64.encode(bytes),
            });
        }

        let request = MergeRequest {
            output_name: output_name.to_string(),
            files,
        };
        let response = self.client.merge(&request).await?;

        if let Some(content) = response.content_base64 {
            let bytes = BASE64.decode(content.as_bytes())?;
            let name = response
                .file_name
                .unwrap_or_else(|| output_name.to_string());
            let stored = self.storage.store(StorageArea::Merged, &name, &bytes).await?;
            return Ok(Some(MergedFile {
                id: Some(stored.id),
                name: stored.name,
                url: stored.url,
            }));
        }

        if let Some(url) = response.file_url {
            return Ok(Some(MergedFile {
                id: None,
                name: output_name.to_string(),
                url,
            }));
        }

        warn!("merge service returned neither content nor a file URL");
        Ok(None)
    }
}
