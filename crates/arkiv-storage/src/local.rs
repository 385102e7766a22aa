//! Local filesystem blob store.
//!
//! Objects are written under `<root>/<directory>/<uuid>_<file_name>`; the
//! uuid prefix keeps same-named uploads from colliding, since sibling-name
//! uniqueness is a metadata concern, not a storage one.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use bytes::Bytes;
use futures::stream::StreamExt;
use tokio::fs;
use tokio_util::io::ReaderStream;
use tracing::debug;
use uuid::Uuid;

use arkiv_core::error::{AppError, ErrorKind};
use arkiv_core::result::AppResult;
use arkiv_core::traits::blob::{BlobStore, ByteStream};

/// Blob store backed by a local directory tree.
#[derive(Debug, Clone)]
pub struct LocalBlobStore {
    /// Root directory for all stored blobs.
    root: PathBuf,
}

impl LocalBlobStore {
    /// Create a new blob store rooted at the given path.
    pub async fn new(root_path: &str) -> AppResult<Self> {
        let root = PathBuf::from(root_path);
        fs::create_dir_all(&root).await.map_err(|e| {
            AppError::with_source(
                ErrorKind::Storage,
                format!("Failed to create blob root: {}", root.display()),
                e,
            )
        })?;
        Ok(Self { root })
    }

    /// Resolve an opaque blob path to an absolute path within the root.
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
                    format!("Failed to create blob directory: {}", parent.display()),
                    e,
                )
            })?;
        }
        Ok(())
    }
}

#[async_trait]
impl BlobStore for LocalBlobStore {
    async fn store(&self, directory: &str, file_name: &str, data: Bytes) -> AppResult<String> {
        // File names come from client multipart parts; keep only the final
        // component so a crafted name cannot climb out of the directory.
        let safe_name = file_name
            .rsplit(['/', '\\'])
            .next()
            .filter(|n| !n.is_empty() && *n != "." && *n != "..")
            .unwrap_or("unnamed");

        let blob_path = format!(
            "{}/{}_{}",
            directory.trim_matches('/'),
            Uuid::new_v4(),
            safe_name
        );
        let full_path = self.resolve(&blob_path);
        self.ensure_parent(&full_path).await?;

        fs::write(&full_path, &data).await.map_err(|e| {
            AppError::with_source(
                ErrorKind::Storage,
                format!("Failed to write blob: {blob_path}"),
                e,
            )
        })?;

        debug!(path = %blob_path, bytes = data.len(), "Stored blob");
        Ok(blob_path)
    }

    async fn read(&self, path: &str) -> AppResult<ByteStream> {
        let full_path = self.resolve(path);
        let file = fs::File::open(&full_path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                AppError::not_found(format!("Blob not found: {path}"))
            } else {
                AppError::with_source(
                    ErrorKind::Storage,
                    format!("Failed to open blob: {path}"),
                    e,
                )
            }
        })?;

        let stream = ReaderStream::new(file);
        Ok(Box::pin(stream.map(|r| r.map(|b| b.into()))))
    }

    async fn delete(&self, path: &str) -> AppResult<()> {
        let full_path = self.resolve(path);
        match fs::remove_file(&full_path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(AppError::with_source(
                ErrorKind::Storage,
                format!("Failed to delete blob: {path}"),
                e,
            )),
        }
    }

    async fn health_check(&self) -> AppResult<bool> {
        Ok(self.root.exists() && self.root.is_dir())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn store_in_temp() -> (LocalBlobStore, PathBuf) {
        let dir = std::env::temp_dir().join(format!("arkiv-blobs-{}", Uuid::new_v4()));
        let store = LocalBlobStore::new(dir.to_str().expect("utf8 path"))
            .await
            .expect("create store");
        (store, dir)
    }

    #[tokio::test]
    async fn test_store_scopes_by_directory_and_uniquifies_names() {
        let (store, dir) = store_in_temp().await;

        let a = store
            .store("files/u1", "report.txt", Bytes::from_static(b"one"))
            .await
            .expect("store a");
        let b = store
            .store("files/u1", "report.txt", Bytes::from_static(b"two"))
            .await
            .expect("store b");

        assert!(a.starts_with("files/u1/"));
        assert_ne!(a, b);

        let _ = fs::remove_dir_all(dir).await;
    }

    #[tokio::test]
    async fn test_store_strips_path_components_from_names() {
        let (store, dir) = store_in_temp().await;

        let path = store
            .store("files/u1", "../../etc/passwd", Bytes::from_static(b"x"))
            .await
            .expect("store");
        assert!(path.starts_with("files/u1/"));
        assert!(path.ends_with("passwd"));

        let _ = fs::remove_dir_all(dir).await;
    }

    #[tokio::test]
    async fn test_read_missing_blob_is_not_found() {
        let (store, dir) = store_in_temp().await;

        let err = match store.read("files/u1/nope").await {
            Ok(_) => panic!("missing"),
            Err(e) => e,
        };
        assert_eq!(err.kind, ErrorKind::NotFound);

        let _ = fs::remove_dir_all(dir).await;
    }

    #[tokio::test]
    async fn test_delete_is_idempotent() {
        let (store, dir) = store_in_temp().await;

        let path = store
            .store("files/u1", "a.txt", Bytes::from_static(b"x"))
            .await
            .expect("store");
        store.delete(&path).await.expect("first delete");
        store.delete(&path).await.expect("second delete");

        let _ = fs::remove_dir_all(dir).await;
    }
}
