//! Local filesystem storage provider.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use bytes::Bytes;
use chrono::{DateTime, Utc};
use tokio::fs;
use tracing::debug;

use docflow_core::error::{AppError, ErrorKind};
use docflow_core::result::AppResult;
use docflow_core::traits::storage::{StorageObjectMeta, StorageProvider};

/// Local filesystem storage provider rooted at a single directory.
#[derive(Debug, Clone)]
pub struct LocalStorageProvider {
    /// Root directory for all stored files.
    root: PathBuf,
}

impl LocalStorageProvider {
    /// Create a new local storage provider rooted at the given path.
    pub async fn new(root_path: &str) -> AppResult<Self> {
        let root = PathBuf::from(root_path);
        fs::create_dir_all(&root).await.map_err(|e| {
            AppError::with_source(
                ErrorKind::Storage,
                format!("Failed to create storage root: {}", root.display()),
                e,
            )
        })?;
        Ok(Self { root })
    }

    /// Resolve a relative path to an absolute path within the root.
    fn resolve(&self, path: &str) -> PathBuf {
        let clean = path.trim_start_matches('/');
        self.root.join(clean)
    }

    /// Ensure the parent directory of a path exists.
    async fn ensure_parent(&self, path: &Path) -> AppResult<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await.map_err(|e| {
                AppError::with_source(
                    ErrorKind::Storage,
                    format!("Failed to create parent directory: {}", parent.display()),
                    e,
                )
            })?;
        }
        Ok(())
    }

    fn map_io(path: &str, action: &str, e: std::io::Error) -> AppError {
        if e.kind() == std::io::ErrorKind::NotFound {
            AppError::not_found(format!("File not found: {path}"))
        } else {
            AppError::with_source(ErrorKind::Storage, format!("Failed to {action}: {path}"), e)
        }
    }
}

#[async_trait]
impl StorageProvider for LocalStorageProvider {
    fn provider_type(&self) -> &str {
        "local"
    }

    async fn exists(&self, path: &str) -> AppResult<bool> {
        Ok(fs::try_exists(self.resolve(path)).await.unwrap_or(false))
    }

    async fn read_bytes(&self, path: &str) -> AppResult<Bytes> {
        let data = fs::read(self.resolve(path))
            .await
            .map_err(|e| Self::map_io(path, "read file", e))?;
        Ok(Bytes::from(data))
    }

    async fn write(&self, path: &str, data: Bytes) -> AppResult<()> {
        let full_path = self.resolve(path);
        self.ensure_parent(&full_path).await?;

        fs::write(&full_path, &data)
            .await
            .map_err(|e| Self::map_io(path, "write file", e))?;

        debug!(path, bytes = data.len(), "Wrote file");
        Ok(())
    }

    async fn copy(&self, from: &str, to: &str) -> AppResult<()> {
        let dst = self.resolve(to);
        self.ensure_parent(&dst).await?;

        fs::copy(self.resolve(from), &dst)
            .await
            .map_err(|e| Self::map_io(from, "copy file", e))?;

        debug!(from, to, "Copied file");
        Ok(())
    }

    async fn rename(&self, from: &str, to: &str) -> AppResult<()> {
        let dst = self.resolve(to);
        self.ensure_parent(&dst).await?;

        fs::rename(self.resolve(from), &dst)
            .await
            .map_err(|e| Self::map_io(from, "move file", e))?;

        debug!(from, to, "Moved file");
        Ok(())
    }

    async fn delete(&self, path: &str) -> AppResult<()> {
        fs::remove_file(self.resolve(path))
            .await
            .map_err(|e| Self::map_io(path, "delete file", e))?;

        debug!(path, "Deleted file");
        Ok(())
    }

    async fn create_dir(&self, path: &str) -> AppResult<()> {
        fs::create_dir_all(self.resolve(path))
            .await
            .map_err(|e| Self::map_io(path, "create directory", e))
    }

    async fn metadata(&self, path: &str) -> AppResult<StorageObjectMeta> {
        let meta = fs::metadata(self.resolve(path))
            .await
            .map_err(|e| Self::map_io(path, "stat file", e))?;

        let last_modified = meta
            .modified()
            .ok()
            .map(|t| DateTime::<Utc>::from(t));

        Ok(StorageObjectMeta {
            path: path.to_string(),
            size_bytes: meta.len(),
            last_modified,
            is_directory: meta.is_dir(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn provider() -> (tempfile::TempDir, LocalStorageProvider) {
        let dir = tempfile::tempdir().unwrap();
        let provider = LocalStorageProvider::new(dir.path().to_str().unwrap())
            .await
            .unwrap();
        (dir, provider)
    }

    #[tokio::test]
    async fn test_write_read_round_trip() {
        let (_dir, provider) = provider().await;
        provider
            .write("documents/drafts/2025/08/a.pdf", Bytes::from_static(b"hello"))
            .await
            .unwrap();
        let data = provider
            .read_bytes("documents/drafts/2025/08/a.pdf")
            .await
            .unwrap();
        assert_eq!(&data[..], b"hello");
    }

    #[tokio::test]
    async fn test_copy_keeps_source() {
        let (_dir, provider) = provider().await;
        provider.write("a/x.bin", Bytes::from_static(b"x")).await.unwrap();
        provider.copy("a/x.bin", "b/x.bin").await.unwrap();
        assert!(provider.exists("a/x.bin").await.unwrap());
        assert!(provider.exists("b/x.bin").await.unwrap());
    }

    #[tokio::test]
    async fn test_rename_removes_source() {
        let (_dir, provider) = provider().await;
        provider.write("a/x.bin", Bytes::from_static(b"x")).await.unwrap();
        provider.rename("a/x.bin", "b/y.bin").await.unwrap();
        assert!(!provider.exists("a/x.bin").await.unwrap());
        assert!(provider.exists("b/y.bin").await.unwrap());
    }

    #[tokio::test]
    async fn test_read_missing_is_not_found() {
        let (_dir, provider) = provider().await;
        let err = provider.read_bytes("nope.bin").await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn test_metadata() {
        let (_dir, provider) = provider().await;
        provider.write("m.bin", Bytes::from_static(b"12345")).await.unwrap();
        let meta = provider.metadata("m.bin").await.unwrap();
        assert_eq!(meta.size_bytes, 5);
        assert!(!meta.is_directory);
    }
}
