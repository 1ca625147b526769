use std::env;
use std::path::PathBuf;
use thiserror::Error;
use url::Url;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    Missing(&'static str),

    #[error("Invalid region: {0:?}")]
    InvalidRegion(String),

    #[error("Invalid endpoint {endpoint:?}: {reason}")]
    InvalidEndpoint { endpoint: String, reason: String },
}

/// Object-storage connection settings
#[derive(Debug, Clone)]
pub struct StorageConfig {
    /// Static access key id
    pub access_key: String,

    /// Static secret access key
    pub secret_key: String,

    /// Signing region (default: "us-east-1")
    pub region: String,

    /// Endpoint override, e.g. a MinIO URL. `None` uses the SDK default for the region.
    pub endpoint: Option<String>,

    /// Endpoint the pre-signed URLs point at (default: same as `endpoint`)
    pub presign_endpoint: Option<String>,

    /// Address buckets as `endpoint/bucket` instead of `bucket.endpoint` (default: true)
    pub force_path_style: bool,
}

impl StorageConfig {
    pub const DEFAULT_REGION: &'static str = "us-east-1";

    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        let access_key =
            env::var("S3_ACCESS_KEY").map_err(|_| ConfigError::Missing("S3_ACCESS_KEY"))?;
        let secret_key =
            env::var("S3_SECRET_KEY").map_err(|_| ConfigError::Missing("S3_SECRET_KEY"))?;

        let endpoint = non_empty_var("S3_ENDPOINT");

        Ok(Self {
            access_key,
            secret_key,
            region: env::var("S3_REGION").unwrap_or_else(|_| Self::DEFAULT_REGION.to_string()),
            presign_endpoint: non_empty_var("S3_PRESIGN_ENDPOINT").or_else(|| endpoint.clone()),
            endpoint,
            force_path_style: env::var("S3_FORCE_PATH_STYLE")
                .map(|v| v.to_lowercase() != "false" && v != "0")
                .unwrap_or(true),
        })
    }

    /// Rejects region and endpoint strings the SDK could not build a client from.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let region_ok = !self.region.is_empty()
            && self
                .region
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-');
        if !region_ok {
            return Err(ConfigError::InvalidRegion(self.region.clone()));
        }

        for endpoint in [&self.endpoint, &self.presign_endpoint].into_iter().flatten() {
            validate_endpoint(endpoint)?;
        }

        Ok(())
    }
}

fn validate_endpoint(endpoint: &str) -> Result<(), ConfigError> {
    let invalid = |reason: String| ConfigError::InvalidEndpoint {
        endpoint: endpoint.to_string(),
        reason,
    };

    let url = Url::parse(endpoint).map_err(|e| invalid(e.to_string()))?;
    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(invalid(format!("unsupported scheme '{}'", url.scheme())));
    }
    if url.host_str().is_none() {
        return Err(invalid("missing host".to_string()));
    }
    Ok(())
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}

/// HTTP server settings
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Directory downloaded objects are written to (default: "./downloads")
    pub destination_folder: PathBuf,

    /// Maximum request body size in bytes (default: 256 MB)
    pub max_file_size: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            destination_folder: PathBuf::from("./downloads"),
            max_file_size: 256 * 1024 * 1024, // 256 MB
        }
    }
}

impl ServerConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let default = Self::default();

        Self {
            destination_folder: non_empty_var("DESTINATION_FOLDER")
                .map(PathBuf::from)
                .unwrap_or(default.destination_folder),

            max_file_size: env::var("MAX_FILE_SIZE")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(default.max_file_size),
        }
    }
}
