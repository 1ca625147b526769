use crate::services::storage::{BucketStatus, ObjectStore, StorageError, UrlSigner};
use aws_sdk_s3::primitives::ByteStream;
use bytes::Bytes;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

/// Bucket, object and pre-signing operations on top of the configured clients.
pub struct S3Service {
    store: Arc<dyn ObjectStore>,
    signer: Arc<dyn UrlSigner>,
    destination_folder: PathBuf,
}

impl S3Service {
    pub fn new(
        store: Arc<dyn ObjectStore>,
        signer: Arc<dyn UrlSigner>,
        destination_folder: PathBuf,
    ) -> Self {
        Self {
            store,
            signer,
            destination_folder,
        }
    }

    pub async fn create_bucket(&self, bucket: &str) -> Result<String, StorageError> {
        let location = self.store.create_bucket(bucket).await?;
        info!("🪣 Bucket '{}' created", bucket);
        Ok(format!("Bucket created: {}", location.unwrap_or_default()))
    }

    pub async fn does_bucket_exist(&self, bucket: &str) -> BucketStatus {
        let status = self.store.head_bucket(bucket).await;
        if let BucketStatus::Error(cause) = &status {
            warn!("Bucket lookup for '{}' failed: {}", bucket, cause);
        }
        status
    }

    pub async fn get_all_buckets(&self) -> Result<Vec<String>, StorageError> {
        self.store.list_buckets().await
    }

    /// Uploads the file at `path` under `key`.
    pub async fn upload_file(
        &self,
        bucket: &str,
        key: &str,
        path: &Path,
    ) -> Result<bool, StorageError> {
        let body = ByteStream::from_path(path)
            .await
            .map_err(|e| StorageError::Body(format!("{}: {}", path.display(), e)))?;
        self.put(bucket, key, body).await
    }

    pub async fn upload_bytes(
        &self,
        bucket: &str,
        key: &str,
        data: Bytes,
    ) -> Result<bool, StorageError> {
        self.put(bucket, key, ByteStream::from(data)).await
    }

    async fn put(&self, bucket: &str, key: &str, body: ByteStream) -> Result<bool, StorageError> {
        let uploaded = self.store.put_object(bucket, key, body).await?;
        if uploaded {
            info!("📤 Uploaded {}/{}", bucket, key);
        }
        Ok(uploaded)
    }

    /// Fetches the whole object and writes it beneath the destination folder.
    pub async fn download_file(&self, bucket: &str, key: &str) -> Result<PathBuf, StorageError> {
        let file_name =
            local_file_name(key).ok_or_else(|| StorageError::InvalidKey(key.to_string()))?;

        let data = self.store.get_object(bucket, key).await?;

        // One level only: a missing parent surfaces as a write error.
        if let Err(e) = tokio::fs::create_dir(&self.destination_folder).await {
            if e.kind() != ErrorKind::AlreadyExists {
                return Err(StorageError::Write(e.to_string()));
            }
        }

        let file_path = self.destination_folder.join(file_name);
        tokio::fs::write(&file_path, &data)
            .await
            .map_err(|e| StorageError::Write(e.to_string()))?;

        info!(
            "📥 Downloaded {}/{} ({} bytes) to {}",
            bucket,
            key,
            data.len(),
            file_path.display()
        );
        Ok(file_path)
    }

    pub async fn generate_presigned_upload_url(
        &self,
        bucket: &str,
        key: &str,
        duration: Duration,
    ) -> Result<String, StorageError> {
        self.signer.presign_put(bucket, key, duration).await
    }

    pub async fn generate_presigned_download_url(
        &self,
        bucket: &str,
        key: &str,
        duration: Duration,
    ) -> Result<String, StorageError> {
        self.signer.presign_get(bucket, key, duration).await
    }

    pub async fn ping(&self) -> bool {
        self.store.list_buckets().await.is_ok()
    }
}

/// Last `/`-separated segment of `key`, or `None` if that is not a usable file name.
pub fn local_file_name(key: &str) -> Option<&str> {
    let name = key.rsplit('/').next().unwrap_or(key);
    match name {
        "" | "." | ".." => None,
        name if name.contains('\\') => None,
        name => Some(name),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_local_file_name() {
        assert_eq!(local_file_name("report.pdf"), Some("report.pdf"));
        assert_eq!(local_file_name("2024/q1/report.pdf"), Some("report.pdf"));
        assert_eq!(local_file_name("/report.pdf"), Some("report.pdf"));
        assert_eq!(local_file_name("../../etc/passwd"), Some("passwd"));
    }

    #[test]
    fn test_local_file_name_rejects_unusable_names() {
        assert_eq!(local_file_name(""), None);
        assert_eq!(local_file_name("folder/"), None);
        assert_eq!(local_file_name(".."), None);
        assert_eq!(local_file_name("a/."), None);
        assert_eq!(local_file_name("..\\secret"), None);
    }
}
