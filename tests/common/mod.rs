#![allow(dead_code)]

use async_trait::async_trait;
use aws_sdk_s3::primitives::ByteStream;
use axum::Router;
use axum::body::Body;
use axum::http::{Request, Response};
use bytes::Bytes;
use http_body_util::BodyExt;
use s3_proxy_api::config::ServerConfig;
use s3_proxy_api::services::S3Service;
use s3_proxy_api::services::storage::{BucketStatus, ObjectStore, StorageError, UrlSigner};
use s3_proxy_api::{AppState, create_app};
use std::collections::{BTreeMap, HashMap};
use std::path::Path;
use std::sync::Mutex;
use std::sync::Arc;
use std::time::Duration;

const ONE_WEEK: Duration = Duration::from_secs(7 * 24 * 60 * 60);

#[derive(Default)]
pub struct MockObjectStore {
    buckets: Mutex<BTreeMap<String, HashMap<String, Bytes>>>,
    /// Makes every bucket lookup fail as if the service were unreachable.
    pub fail_lookups: bool,
}

impl MockObjectStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_lookups() -> Self {
        Self {
            fail_lookups: true,
            ..Self::default()
        }
    }

    pub fn with_bucket(self, bucket: &str) -> Self {
        self.buckets
            .lock()
            .unwrap()
            .insert(bucket.to_string(), HashMap::new());
        self
    }

    pub fn object(&self, bucket: &str, key: &str) -> Option<Bytes> {
        self.buckets
            .lock()
            .unwrap()
            .get(bucket)
            .and_then(|objects| objects.get(key).cloned())
    }
}

#[async_trait]
impl ObjectStore for MockObjectStore {
    async fn create_bucket(&self, bucket: &str) -> Result<Option<String>, StorageError> {
        let mut buckets = self.buckets.lock().unwrap();
        if buckets.contains_key(bucket) {
            return Err(StorageError::Service(format!(
                "BucketAlreadyOwnedByYou: {}",
                bucket
            )));
        }
        buckets.insert(bucket.to_string(), HashMap::new());
        Ok(Some(format!("/{}", bucket)))
    }

    async fn head_bucket(&self, bucket: &str) -> BucketStatus {
        if self.fail_lookups {
            return BucketStatus::Error("dispatch failure: connection refused".to_string());
        }
        if self.buckets.lock().unwrap().contains_key(bucket) {
            BucketStatus::Exists
        } else {
            BucketStatus::NotFound
        }
    }

    async fn list_buckets(&self) -> Result<Vec<String>, StorageError> {
        Ok(self.buckets.lock().unwrap().keys().cloned().collect())
    }

    async fn put_object(
        &self,
        bucket: &str,
        key: &str,
        body: ByteStream,
    ) -> Result<bool, StorageError> {
        let data = body
            .collect()
            .await
            .map_err(|e| StorageError::Body(e.to_string()))?
            .into_bytes();

        let mut buckets = self.buckets.lock().unwrap();
        match buckets.get_mut(bucket) {
            Some(objects) => {
                objects.insert(key.to_string(), data);
                Ok(true)
            }
            // S3 answers NoSuchBucket with a 404.
            None => Ok(false),
        }
    }

    async fn get_object(&self, bucket: &str, key: &str) -> Result<Bytes, StorageError> {
        let buckets = self.buckets.lock().unwrap();
        let objects = buckets
            .get(bucket)
            .ok_or_else(|| StorageError::NoSuchBucket(bucket.to_string()))?;
        objects
            .get(key)
            .cloned()
            .ok_or_else(|| StorageError::NoSuchKey {
                bucket: bucket.to_string(),
                key: key.to_string(),
            })
    }
}

pub struct MockUrlSigner;

impl MockUrlSigner {
    fn sign(
        method: &str,
        bucket: &str,
        key: &str,
        expires_in: Duration,
    ) -> Result<String, StorageError> {
        if expires_in > ONE_WEEK {
            return Err(StorageError::Presign(
                "presigned requests may not expire later than one week".to_string(),
            ));
        }
        Ok(format!(
            "http://mock-s3/{}/{}?X-Amz-Method={}&X-Amz-Expires={}&X-Amz-Signature=mock",
            bucket,
            key,
            method,
            expires_in.as_secs()
        ))
    }
}

#[async_trait]
impl UrlSigner for MockUrlSigner {
    async fn presign_put(
        &self,
        bucket: &str,
        key: &str,
        expires_in: Duration,
    ) -> Result<String, StorageError> {
        Self::sign("PUT", bucket, key, expires_in)
    }

    async fn presign_get(
        &self,
        bucket: &str,
        key: &str,
        expires_in: Duration,
    ) -> Result<String, StorageError> {
        Self::sign("GET", bucket, key, expires_in)
    }
}

pub fn service(store: Arc<MockObjectStore>, destination: &Path) -> S3Service {
    S3Service::new(store, Arc::new(MockUrlSigner), destination.to_path_buf())
}

pub fn test_app(store: Arc<MockObjectStore>, destination: &Path) -> Router {
    test_app_with_limit(store, destination, ServerConfig::default().max_file_size)
}

pub fn test_app_with_limit(
    store: Arc<MockObjectStore>,
    destination: &Path,
    max_file_size: usize,
) -> Router {
    let config = ServerConfig {
        destination_folder: destination.to_path_buf(),
        max_file_size,
    };
    create_app(AppState {
        s3: Arc::new(service(store, destination)),
        config,
    })
}

pub fn request(method: &str, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

pub fn form_request(uri: &str, form: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("Content-Type", "application/x-www-form-urlencoded")
        .body(Body::from(form.to_string()))
        .unwrap()
}

pub const BOUNDARY: &str = "---------------------------123456789012345678901234567";

/// Multipart body with optional text fields and an optional file part.
pub fn multipart_body(fields: &[(&str, &str)], file: Option<(&str, &[u8])>) -> Vec<u8> {
    let mut body = Vec::new();
    for (name, value) in fields {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            )
            .as_bytes(),
        );
    }
    if let Some((filename, content)) = file {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{filename}\"\r\nContent-Type: application/octet-stream\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(content);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body
}

pub fn multipart_request(uri: &str, body: Vec<u8>) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(
            "Content-Type",
            format!("multipart/form-data; boundary={}", BOUNDARY),
        )
        .body(Body::from(body))
        .unwrap()
}

pub async fn body_text(response: Response<Body>) -> String {
    let body = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(body.to_vec()).unwrap()
}
