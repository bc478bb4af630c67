//! Blob storage for generated PDFs.
//!
//! Two logical areas are exposed: individual per-appointment PDFs and the
//! merged daily PDF. Temporary template clones live in the render engine's
//! own workspace and never pass through here.

use std::fs;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("stored file not found: {0}")]
    NotFound(String),
    #[error("storage io error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageArea {
    Individual,
    Merged,
}

impl StorageArea {
    pub fn dir_name(&self) -> &'static str {
        match self {
            Self::Individual => "individual",
            Self::Merged => "merged",
        }
    }
}

/// A persisted blob. Identifies the stored artifact, never the data it was
/// generated from.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct StoredFile {
    pub id: Uuid,
    pub name: String,
    pub url: String,
}

#[async_trait]
pub trait BlobStorage: Send + Sync {
    async fn store(
        &self,
        area: StorageArea,
        name: &str,
        bytes: &[u8],
    ) -> Result<StoredFile, StorageError>;

    async fn read(&self, area: StorageArea, name: &str) -> Result<Vec<u8>, StorageError>;

    async fn delete(&self, area: StorageArea, name: &str) -> Result<(), StorageError>;
}

/// Filesystem-backed storage rooted at a configured directory; files are
/// served back under `/files/{area}/{name}`.
pub struct LocalStorage {
    root: PathBuf,
}

impl LocalStorage {
    pub fn new(root: impl Into<PathBuf>) -> std::io::Result<Self> {
        let root = root.into();
        for area in [StorageArea::Individual, StorageArea::Merged] {
            fs::create_dir_all(root.join(area.dir_name()))?;
        }
        Ok(Self { root })
    }

    fn path_for(&self, area: StorageArea, name: &str) -> PathBuf {
        self.root.join(area.dir_name()).join(name)
    }
}

#[async_trait]
impl BlobStorage for LocalStorage {
    async fn store(
        &self,
        area: StorageArea,
        name: &str,
        bytes: &[u8],
    ) -> Result<StoredFile, StorageError> {
        fs::write(self.path_for(area, name), bytes)?;
        Ok(StoredFile {
            id: Uuid::new_v4(),
            name: name.to_string(),
            url: format!("/files/{}/{}", area.dir_name(), name),
        })
    }

    async fn read(&self, area: StorageArea, name: &str) -> Result<Vec<u8>, StorageError> {
        let path = self.path_for(area, name);
        if !path.exists() {
            return Err(StorageError::NotFound(name.to_string()));
        }
        Ok(fs::read(path)?)
    }

    async fn delete(&self, area: StorageArea, name: &str) -> Result<(), StorageError> {
        let path = self.path_for(area, name);
        if !path.exists() {
            return Err(StorageError::NotFound(name.to_string()));
        }
        fs::remove_file(path)?;
        Ok(())
    }
}

/// Path helper for mounting the static file services.
pub fn area_dir(root: &str, area: StorageArea) -> PathBuf {
    Path::new(root).join(area.dir_name())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_store_and_read_round_trip() {
        let dir = TempDir::new().unwrap();
        let storage = LocalStorage::new(dir.path()).unwrap();

        let stored = storage
            .store(StorageArea::Individual, "contract.pdf", b"%PDF-fake")
            .await
            .unwrap();
        assert_eq!(stored.name, "contract.pdf");
        assert_eq!(stored.url, "/files/individual/contract.pdf");
        assert!(!stored.id.is_nil());

        let bytes = storage
            .read(StorageArea::Individual, "contract.pdf")
            .await
            .unwrap();
        assert_eq!(bytes, b"%PDF-fake");
    }

    #[tokio::test]
    async fn test_read_missing_is_not_found() {
        let dir = TempDir::new().unwrap();
        let storage = LocalStorage::new(dir.path()).unwrap();

        let err = storage
            .read(StorageArea::Merged, "nothing.pdf")
            .await
            .unwrap_err();
        assert!(matches!(err, StorageError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_delete_removes_file() {
        let dir = TempDir::new().unwrap();
        let storage = LocalStorage::new(dir.path()).unwrap();

        storage
            .store(StorageArea::Individual, "gone.pdf", b"x")
            .await
            .unwrap();
        storage
            .delete(StorageArea::Individual, "gone.pdf")
            .await
            .unwrap();

        assert!(matches!(
            storage.read(StorageArea::Individual, "gone.pdf").await,
            Err(StorageError::NotFound(_))
        ));
    }

    #[test]
    fn test_areas_map_to_distinct_dirs() {
        assert_ne!(
            StorageArea::Individual.dir_name(),
            StorageArea::Merged.dir_name()
        );
    }
}
