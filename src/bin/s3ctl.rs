use clap::{Parser, Subcommand};
use dotenvy::dotenv;
use s3_proxy_api::config::{ServerConfig, StorageConfig};
use s3_proxy_api::infrastructure::storage;
use s3_proxy_api::services::S3Service;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::error;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Runs the bucket, object and pre-signing operations without the HTTP server.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    CreateBucket {
        bucket: String,
    },
    BucketExists {
        bucket: String,
    },
    ListBuckets,
    /// Upload a local file
    Upload {
        bucket: String,
        key: String,
        path: PathBuf,
    },
    /// Download an object into DESTINATION_FOLDER
    Download {
        bucket: String,
        key: String,
    },
    PresignUpload {
        bucket: String,
        key: String,
        #[arg(short, long, default_value_t = 15)]
        minutes: u64,
    },
    PresignDownload {
        bucket: String,
        key: String,
        #[arg(short, long, default_value_t = 15)]
        minutes: u64,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "s3ctl=info,s3_proxy_api=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let clients = storage::setup_clients(&StorageConfig::from_env()?).await?;
    let service = S3Service::new(
        clients.store,
        clients.signer,
        ServerConfig::from_env().destination_folder,
    );

    if let Err(e) = run(&service, cli.command).await {
        error!("❌ {}", e);
        std::process::exit(1);
    }
    Ok(())
}

async fn run(service: &S3Service, command: Command) -> anyhow::Result<()> {
    match command {
        Command::CreateBucket { bucket } => println!("{}", service.create_bucket(&bucket).await?),
        Command::BucketExists { bucket } => {
            let status = service.does_bucket_exist(&bucket).await;
            println!("{}", status.message(&bucket));
            if !status.exists() {
                std::process::exit(2);
            }
        }
        Command::ListBuckets => {
            for name in service.get_all_buckets().await? {
                println!("{}", name);
            }
        }
        Command::Upload { bucket, key, path } => {
            if !service.upload_file(&bucket, &key, &path).await? {
                anyhow::bail!("Error uploading file");
            }
            println!("File uploaded successfully");
        }
        Command::Download { bucket, key } => {
            let path = service.download_file(&bucket, &key).await?;
            println!("{}", path.display());
        }
        Command::PresignUpload {
            bucket,
            key,
            minutes,
        } => {
            let ttl = Duration::from_secs(minutes.saturating_mul(60));
            println!(
                "{}",
                service
                    .generate_presigned_upload_url(&bucket, &key, ttl)
                    .await?
            );
        }
        Command::PresignDownload {
            bucket,
            key,
            minutes,
        } => {
            let ttl = Duration::from_secs(minutes.saturating_mul(60));
            println!(
                "{}",
                service
                    .generate_presigned_download_url(&bucket, &key, ttl)
                    .await?
            );
        }
    }
    Ok(())
}
