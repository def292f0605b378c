/// Blob storage for task attachments
///
/// Attachment bytes live in a blob store; tarefas reference them by URL
/// only. The [`BlobStore`] trait is the injected port: the S3 backend is the
/// production implementation, the in-memory backend serves development and
/// tests.
///
/// Blob names are `{unix_millis}-{sanitized original filename}`, which keeps
/// them unique per upload while staying recognizable. The name is the last
/// path segment of the returned URL, so deletion can recover it from the URL
/// stored in `anexos`.
///
/// # Modules
///
/// - `s3`: S3-compatible backend (aws-sdk-s3)
/// - `memory`: In-memory backend for development and tests

pub mod memory;
pub mod s3;

pub use memory::MemoryBlobStore;
pub use s3::{S3BlobStore, S3Config};

use async_trait::async_trait;
use chrono::Utc;

/// Blob store interface
///
/// Uploads return the publicly retrievable URL of the stored blob; deletes
/// take the blob name (see [`blob_name_from_url`]) and are idempotent.
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Stores `bytes` under `name` and returns the blob's URL
    async fn upload(
        &self,
        name: &str,
        bytes: Vec<u8>,
        content_type: Option<&str>,
    ) -> anyhow::Result<String>;

    /// Deletes the blob stored under `name`
    ///
    /// Deleting a blob that does not exist is not an error.
    async fn delete(&self, name: &str) -> anyhow::Result<()>;
}

/// Builds a unique blob name for an uploaded file
///
/// Format: `{unix_millis}-{sanitized original filename}`.
pub fn blob_name(original_filename: &str) -> String {
    format!(
        "{}-{}",
        Utc::now().timestamp_millis(),
        sanitize_filename(original_filename)
    )
}

/// Extracts the blob name from an attachment URL
///
/// The name is the last path segment; returns `None` for URLs without one.
pub fn blob_name_from_url(url: &str) -> Option<&str> {
    url.rsplit('/').next().filter(|name| !name.is_empty())
}

/// Replaces path separators and other unsafe characters in a filename
fn sanitize_filename(original: &str) -> String {
    let cleaned: String = original
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect();

    if cleaned.is_empty() {
        "ficheiro".to_string()
    } else {
        cleaned
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blob_name_keeps_original_filename() {
        let name = blob_name("relatorio.pdf");
        assert!(name.ends_with("-relatorio.pdf"));
    }

    #[test]
    fn test_blob_name_sanitizes_separators() {
        let name = blob_name("../etc/passwd");
        assert!(!name.contains('/'));
        assert!(name.ends_with("-.._etc_passwd"));
    }

    #[test]
    fn test_blob_name_handles_empty_filename() {
        let name = blob_name("");
        assert!(name.ends_with("-ficheiro"));
    }

    #[test]
    fn test_blob_name_from_url() {
        let url = "http://localhost:9000/anexos/1735689600000-relatorio.pdf";
        assert_eq!(
            blob_name_from_url(url),
            Some("1735689600000-relatorio.pdf")
        );
    }

    #[test]
    fn test_blob_name_from_url_rejects_trailing_slash() {
        assert_eq!(blob_name_from_url("http://localhost:9000/anexos/"), None);
    }
}
