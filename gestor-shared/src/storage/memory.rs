/// In-memory blob store backend
///
/// Holds blobs in a map for development runs and tests, mirroring the
/// contract of the S3 backend: uploads return a URL whose last segment is
/// the blob name, deletes are idempotent.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::RwLock;

use super::BlobStore;

/// Blob store holding everything in process memory
pub struct MemoryBlobStore {
    base_url: String,
    blobs: RwLock<HashMap<String, Vec<u8>>>,
}

impl MemoryBlobStore {
    /// Creates an empty store serving URLs under a synthetic scheme
    pub fn new() -> Self {
        Self {
            base_url: "memory://anexos".to_string(),
            blobs: RwLock::new(HashMap::new()),
        }
    }

    /// Whether a blob with this name is currently stored
    pub fn contains(&self, name: &str) -> bool {
        self.blobs.read().unwrap().contains_key(name)
    }

    /// Number of stored blobs
    pub fn len(&self) -> usize {
        self.blobs.read().unwrap().len()
    }

    /// Whether the store holds no blobs
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for MemoryBlobStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BlobStore for MemoryBlobStore {
    async fn upload(
        &self,
        name: &str,
        bytes: Vec<u8>,
        _content_type: Option<&str>,
    ) -> anyhow::Result<String> {
        self.blobs.write().unwrap().insert(name.to_string(), bytes);
        Ok(format!("{}/{}", self.base_url, name))
    }

    async fn delete(&self, name: &str) -> anyhow::Result<()> {
        self.blobs.write().unwrap().remove(name);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::blob_name_from_url;

    #[tokio::test]
    async fn test_upload_and_delete() {
        let store = MemoryBlobStore::new();

        let url = store
            .upload("123-a.pdf", b"conteudo".to_vec(), Some("application/pdf"))
            .await
            .unwrap();

        assert_eq!(url, "memory://anexos/123-a.pdf");
        assert!(store.contains("123-a.pdf"));

        store.delete("123-a.pdf").await.unwrap();
        assert!(!store.contains("123-a.pdf"));
    }

    #[tokio::test]
    async fn test_delete_is_idempotent() {
        let store = MemoryBlobStore::new();
        assert!(store.delete("nunca-existiu.txt").await.is_ok());
    }

    #[tokio::test]
    async fn test_url_round_trips_to_blob_name() {
        let store = MemoryBlobStore::new();

        let url = store
            .upload("456-b.png", b"png".to_vec(), None)
            .await
            .unwrap();

        assert_eq!(blob_name_from_url(&url), Some("456-b.png"));
    }
}
