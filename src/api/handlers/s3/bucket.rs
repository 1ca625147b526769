use crate::api::error::AppError;
use crate::api::extract::Params;
use axum::{
    Json,
    extract::{Path, State},
};

use super::types::*;

#[utoipa::path(
    post,
    path = "/s3/createBucket",
    params(BucketParams),
    responses(
        (status = 200, description = "Bucket created", body = String),
        (status = 500, description = "Storage service rejected the request")
    ),
    tag = "buckets"
)]
pub async fn create_bucket(
    State(state): State<crate::AppState>,
    Params(params): Params<BucketParams>,
) -> Result<String, AppError> {
    Ok(state.s3.create_bucket(&params.bucket_name).await?)
}

#[utoipa::path(
    get,
    path = "/s3/doesBucketExist/{bucketName}",
    params(
        ("bucketName" = String, Path, description = "Name of the bucket")
    ),
    responses(
        (status = 200, description = "Whether the bucket exists", body = String)
    ),
    tag = "buckets"
)]
pub async fn does_bucket_exist(
    State(state): State<crate::AppState>,
    Path(bucket_name): Path<String>,
) -> String {
    state
        .s3
        .does_bucket_exist(&bucket_name)
        .await
        .message(&bucket_name)
}

#[utoipa::path(
    get,
    path = "/s3/getAllBuckets",
    responses(
        (status = 200, description = "Names of all visible buckets", body = Vec<String>)
    ),
    tag = "buckets"
)]
pub async fn get_all_buckets(
    State(state): State<crate::AppState>,
) -> Result<Json<Vec<String>>, AppError> {
    Ok(Json(state.s3.get_all_buckets().await?))
}
