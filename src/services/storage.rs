use async_trait::async_trait;
use aws_sdk_s3::Client;
use aws_sdk_s3::config::http::HttpResponse;
use aws_sdk_s3::error::{DisplayErrorContext, ProvideErrorMetadata, SdkError};
use aws_sdk_s3::presigning::PresigningConfig;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::types::{BucketLocationConstraint, CreateBucketConfiguration};
use bytes::Bytes;
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Bucket {0} does not exist")]
    NoSuchBucket(String),

    #[error("Key {key} does not exist in bucket {bucket}")]
    NoSuchKey { bucket: String, key: String },

    #[error("Cannot derive a local file name from key {0:?}")]
    InvalidKey(String),

    #[error("Failed to presign request: {0}")]
    Presign(String),

    #[error("Failed to read object body: {0}")]
    Body(String),

    #[error("Error to download file: {0}")]
    Write(String),

    #[error("Storage service error: {0}")]
    Service(String),
}

/// Outcome of a metadata-only bucket lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BucketStatus {
    Exists,
    NotFound,
    /// The lookup itself failed (permissions, network, ...).
    Error(String),
}

impl BucketStatus {
    pub fn exists(&self) -> bool {
        matches!(self, BucketStatus::Exists)
    }

    /// Text reported over HTTP. Lookup failures read the same as a missing bucket.
    pub fn message(&self, bucket: &str) -> String {
        match self {
            BucketStatus::Exists => format!("Bucket {} exist", bucket),
            BucketStatus::NotFound | BucketStatus::Error(_) => {
                format!("Bucket {} does not exist", bucket)
            }
        }
    }
}

#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Creates a bucket and returns the location reported by the service.
    async fn create_bucket(&self, bucket: &str) -> Result<Option<String>, StorageError>;
    async fn head_bucket(&self, bucket: &str) -> BucketStatus;
    async fn list_buckets(&self) -> Result<Vec<String>, StorageError>;
    /// Returns `false` when the service answered with a non-success status.
    async fn put_object(
        &self,
        bucket: &str,
        key: &str,
        body: ByteStream,
    ) -> Result<bool, StorageError>;
    async fn get_object(&self, bucket: &str, key: &str) -> Result<Bytes, StorageError>;
}

#[async_trait]
pub trait UrlSigner: Send + Sync {
    async fn presign_put(
        &self,
        bucket: &str,
        key: &str,
        expires_in: Duration,
    ) -> Result<String, StorageError>;
    async fn presign_get(
        &self,
        bucket: &str,
        key: &str,
        expires_in: Duration,
    ) -> Result<String, StorageError>;
}

fn sdk_error<E>(err: SdkError<E, HttpResponse>, bucket: &str) -> StorageError
where
    E: ProvideErrorMetadata + std::error::Error + 'static,
{
    if err.as_service_error().and_then(|e| e.code()) == Some("NoSuchBucket") {
        return StorageError::NoSuchBucket(bucket.to_string());
    }
    StorageError::Service(DisplayErrorContext(&err).to_string())
}

/// us-east-1 is the default location and S3 rejects it as an explicit constraint.
fn bucket_configuration(region: Option<&str>) -> Option<CreateBucketConfiguration> {
    match region {
        None | Some("") | Some("us-east-1") => None,
        Some(region) => Some(
            CreateBucketConfiguration::builder()
                .location_constraint(BucketLocationConstraint::from(region))
                .build(),
        ),
    }
}

#[derive(Clone)]
pub struct S3ObjectStore {
    client: Client,
}

impl S3ObjectStore {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ObjectStore for S3ObjectStore {
    async fn create_bucket(&self, bucket: &str) -> Result<Option<String>, StorageError> {
        let region: Option<&str> = self.client.config().region().map(|r| r.as_ref());
        let res = self
            .client
            .create_bucket()
            .bucket(bucket)
            .set_create_bucket_configuration(bucket_configuration(region))
            .send()
            .await
            .map_err(|e| {
                tracing::error!("S3 create_bucket failed: bucket={}, error={:?}", bucket, e);
                sdk_error(e, bucket)
            })?;

        Ok(res.location().map(str::to_string))
    }

    async fn head_bucket(&self, bucket: &str) -> BucketStatus {
        match self.client.head_bucket().bucket(bucket).send().await {
            Ok(_) => BucketStatus::Exists,
            Err(e) => {
                if e.as_service_error().is_some_and(|se| se.is_not_found()) {
                    BucketStatus::NotFound
                } else {
                    BucketStatus::Error(DisplayErrorContext(&e).to_string())
                }
            }
        }
    }

    async fn list_buckets(&self) -> Result<Vec<String>, StorageError> {
        let res = self
            .client
            .list_buckets()
            .send()
            .await
            .map_err(|e| StorageError::Service(DisplayErrorContext(&e).to_string()))?;

        Ok(res
            .buckets()
            .iter()
            .filter_map(|b| b.name().map(str::to_string))
            .collect())
    }

    async fn put_object(
        &self,
        bucket: &str,
        key: &str,
        body: ByteStream,
    ) -> Result<bool, StorageError> {
        let res = self
            .client
            .put_object()
            .bucket(bucket)
            .key(key)
            .body(body)
            .send()
            .await;

        match res {
            Ok(_) => Ok(true),
            Err(SdkError::ServiceError(err)) => {
                tracing::warn!(
                    "S3 put_object rejected: bucket={}, key={}, status={}, error={:?}",
                    bucket,
                    key,
                    err.raw().status().as_u16(),
                    err.err()
                );
                Ok(false)
            }
            Err(e) => Err(StorageError::Service(DisplayErrorContext(&e).to_string())),
        }
    }

    async fn get_object(&self, bucket: &str, key: &str) -> Result<Bytes, StorageError> {
        let res = self
            .client
            .get_object()
            .bucket(bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| {
                if e.as_service_error().is_some_and(|se| se.is_no_such_key()) {
                    StorageError::NoSuchKey {
                        bucket: bucket.to_string(),
                        key: key.to_string(),
                    }
                } else {
                    sdk_error(e, bucket)
                }
            })?;

        let data = res
            .body
            .collect()
            .await
            .map_err(|e| StorageError::Body(e.to_string()))?;
        Ok(data.into_bytes())
    }
}

/// Signs requests locally; nothing is sent to the service.
#[derive(Clone)]
pub struct S3UrlSigner {
    client: Client,
}

impl S3UrlSigner {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

fn presigning_config(expires_in: Duration) -> Result<PresigningConfig, StorageError> {
    PresigningConfig::expires_in(expires_in).map_err(|e| StorageError::Presign(e.to_string()))
}

#[async_trait]
impl UrlSigner for S3UrlSigner {
    async fn presign_put(
        &self,
        bucket: &str,
        key: &str,
        expires_in: Duration,
    ) -> Result<String, StorageError> {
        let request = self
            .client
            .put_object()
            .bucket(bucket)
            .key(key)
            .presigned(presigning_config(expires_in)?)
            .await
            .map_err(|e| StorageError::Presign(DisplayErrorContext(&e).to_string()))?;

        Ok(request.uri().to_string())
    }

    async fn presign_get(
        &self,
        bucket: &str,
        key: &str,
        expires_in: Duration,
    ) -> Result<String, StorageError> {
        let request = self
            .client
            .get_object()
            .bucket(bucket)
            .key(key)
            .presigned(presigning_config(expires_in)?)
            .await
            .map_err(|e| StorageError::Presign(DisplayErrorContext(&e).to_string()))?;

        Ok(request.uri().to_string())
    }
}
