use crate::config::StorageConfig;
use crate::services::storage::{S3ObjectStore, S3UrlSigner};
use aws_sdk_s3::config::{Credentials, Region};
use std::sync::Arc;
use tracing::info;

/// Client handles shared by every request.
#[derive(Clone)]
pub struct S3Clients {
    pub store: Arc<S3ObjectStore>,
    pub signer: Arc<S3UrlSigner>,
}

pub async fn setup_clients(config: &StorageConfig) -> anyhow::Result<S3Clients> {
    config.validate()?;

    info!(
        "☁️  S3 Storage: {} (Region: {}, Path style: {})",
        config.endpoint.as_deref().unwrap_or("default endpoint"),
        config.region,
        config.force_path_style
    );

    let client = build_client(config, config.endpoint.as_deref()).await;
    let presign_client = if config.presign_endpoint == config.endpoint {
        client.clone()
    } else {
        info!(
            "🔏 Pre-signing against: {}",
            config.presign_endpoint.as_deref().unwrap_or("default endpoint")
        );
        build_client(config, config.presign_endpoint.as_deref()).await
    };

    Ok(S3Clients {
        store: Arc::new(S3ObjectStore::new(client)),
        signer: Arc::new(S3UrlSigner::new(presign_client)),
    })
}

async fn build_client(config: &StorageConfig, endpoint: Option<&str>) -> aws_sdk_s3::Client {
    let mut loader = aws_config::from_env()
        .region(Region::new(config.region.clone()))
        .credentials_provider(Credentials::new(
            config.access_key.clone(),
            config.secret_key.clone(),
            None,
            None,
            "static",
        ));
    if let Some(endpoint) = endpoint {
        loader = loader.endpoint_url(endpoint);
    }
    let aws_config = loader.load().await;

    let s3_config = aws_sdk_s3::config::Builder::from(&aws_config)
        .force_path_style(config.force_path_style)
        .build();

    aws_sdk_s3::Client::from_conf(s3_config)
}
