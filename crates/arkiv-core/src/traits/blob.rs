//! Blob store trait — the opaque byte-storage collaborator.
//!
//! Uploaded file content is handed to a [`BlobStore`] and referenced from
//! node metadata only by the opaque path the store returns. The trait is
//! defined here in `arkiv-core` and implemented in `arkiv-storage`.

use std::pin::Pin;

use async_trait::async_trait;
use bytes::Bytes;
use futures::Stream;

use crate::result::AppResult;

/// A byte stream type used for reading stored content.
pub type ByteStream = Pin<Box<dyn Stream<Item = Result<Bytes, std::io::Error>> + Send>>;

/// Trait for byte-storage backends.
///
/// Paths returned by [`store`](BlobStore::store) are opaque to callers;
/// the path scheme is the implementation's concern.
#[async_trait]
pub trait BlobStore: Send + Sync + std::fmt::Debug + 'static {
    /// Store a blob under the given directory scope and return its
    /// opaque path.
    async fn store(&self, directory: &str, file_name: &str, data: Bytes) -> AppResult<String>;

    /// Read a stored blob as a byte stream.
    async fn read(&self, path: &str) -> AppResult<ByteStream>;

    /// Delete a stored blob. Missing blobs are not an error.
    async fn delete(&self, path: &str) -> AppResult<()>;

    /// Check whether the store is reachable and writable.
    async fn health_check(&self) -> AppResult<bool>;
}
