//! Blob store contract.
//!
//! The core never reads blob bytes — it records path strings and asks the
//! store for signed URLs, existence, and deletion. Signed-URL cryptography
//! belongs to the backing service.

use std::collections::HashSet;
use std::sync::RwLock;

use async_trait::async_trait;
use thiserror::Error;

use podharbor_core::Fault;

#[derive(Debug, Error)]
pub enum BlobError {
    #[error("blob backend failure: {0}")]
    Backend(String),
}

impl From<BlobError> for Fault {
    fn from(err: BlobError) -> Self {
        Fault::internal(err.to_string())
    }
}

#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Time-limited URL granting direct write access to `path`.
    async fn signed_upload_url(&self, path: &str) -> Result<String, BlobError>;

    /// Time-limited URL granting direct read access to `path`.
    async fn signed_download_url(&self, path: &str) -> Result<String, BlobError>;

    async fn exists(&self, path: &str) -> Result<bool, BlobError>;

    /// Idempotent: deleting an absent blob succeeds. Retried cascades depend
    /// on this.
    async fn delete(&self, path: &str) -> Result<(), BlobError>;
}

/// In-memory blob store for tests and development.
///
/// Requesting an upload URL does not create the object — like a real object
/// store, the blob exists only once the upload lands, which tests simulate
/// with [`InMemoryBlobStore::put`].
#[derive(Debug, Default)]
pub struct InMemoryBlobStore {
    objects: RwLock<HashSet<String>>,
}

impl InMemoryBlobStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark an upload as completed.
    pub fn put(&self, path: &str) {
        self.objects.write().unwrap().insert(path.to_string());
    }

    pub fn contains(&self, path: &str) -> bool {
        self.objects.read().unwrap().contains(path)
    }
}

#[async_trait]
impl BlobStore for InMemoryBlobStore {
    async fn signed_upload_url(&self, path: &str) -> Result<String, BlobError> {
        Ok(format!("memory://{path}?sig=upload"))
    }

    async fn signed_download_url(&self, path: &str) -> Result<String, BlobError> {
        Ok(format!("memory://{path}?sig=download"))
    }

    async fn exists(&self, path: &str) -> Result<bool, BlobError> {
        Ok(self.objects.read().map_err(lock_poisoned)?.contains(path))
    }

    async fn delete(&self, path: &str) -> Result<(), BlobError> {
        self.objects.write().map_err(lock_poisoned)?.remove(path);
        Ok(())
    }
}

fn lock_poisoned<T>(_: std::sync::PoisonError<T>) -> BlobError {
    BlobError::Backend("lock poisoned".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn delete_is_idempotent() {
        let store = InMemoryBlobStore::new();
        store.put("media/x.png");

        store.delete("media/x.png").await.unwrap();
        assert!(!store.exists("media/x.png").await.unwrap());

        // Deleting again is not an error.
        store.delete("media/x.png").await.unwrap();
    }
}
