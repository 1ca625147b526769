use crate::api::error::AppError;
use crate::api::extract::Params;
use axum::extract::State;
use std::time::Duration;

use super::types::*;

fn lifetime(minutes: u64) -> Duration {
    Duration::from_secs(minutes.saturating_mul(60))
}

#[utoipa::path(
    post,
    path = "/s3/generatePresignedUploadUrl",
    params(PresignParams),
    responses(
        (status = 200, description = "Pre-signed PUT URL", body = String),
        (status = 400, description = "Invalid lifetime")
    ),
    tag = "presign"
)]
pub async fn generate_presigned_upload_url(
    State(state): State<crate::AppState>,
    Params(params): Params<PresignParams>,
) -> Result<String, AppError> {
    Ok(state
        .s3
        .generate_presigned_upload_url(&params.bucket_name, &params.key, lifetime(params.minutes))
        .await?)
}

#[utoipa::path(
    post,
    path = "/s3/generatePresignedDownloadUrl",
    params(PresignParams),
    responses(
        (status = 200, description = "Pre-signed GET URL", body = String),
        (status = 400, description = "Invalid lifetime")
    ),
    tag = "presign"
)]
pub async fn generate_presigned_download_url(
    State(state): State<crate::AppState>,
    Params(params): Params<PresignParams>,
) -> Result<String, AppError> {
    Ok(state
        .s3
        .generate_presigned_download_url(
            &params.bucket_name,
            &params.key,
            lifetime(params.minutes),
        )
        .await?)
}
