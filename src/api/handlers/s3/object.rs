use crate::api::error::AppError;
use crate::api::extract::Params;
use axum::{
    extract::{Multipart, Query, State, multipart::MultipartError},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use bytes::Bytes;

use super::types::*;

fn multipart_error(e: MultipartError) -> AppError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge("Request body exceeds the maximum allowed limit".to_string())
    } else {
        AppError::BadRequest(e.body_text())
    }
}

fn missing(name: &str) -> AppError {
    AppError::BadRequest(format!("Missing parameter: {}", name))
}

#[utoipa::path(
    post,
    path = "/s3/uploadFile",
    params(UploadQuery),
    request_body(content = UploadForm, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "File uploaded successfully", body = String),
        (status = 400, description = "Missing parameter or file part"),
        (status = 413, description = "File exceeds the maximum allowed size"),
        (status = 500, description = "Error uploading file", body = String)
    ),
    tag = "objects"
)]
pub async fn upload_file(
    State(state): State<crate::AppState>,
    Query(query): Query<UploadQuery>,
    mut multipart: Multipart,
) -> Result<Response, AppError> {
    let mut bucket_name = query.bucket_name;
    let mut key = query.key;
    let mut data: Option<Bytes> = None;

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "bucketName" => bucket_name = Some(field.text().await.map_err(multipart_error)?),
            "key" => key = Some(field.text().await.map_err(multipart_error)?),
            "file" => {
                let filename = field.file_name().unwrap_or("unnamed").to_string();
                let bytes = field.bytes().await.map_err(multipart_error)?;
                tracing::debug!("Received file part '{}' ({} bytes)", filename, bytes.len());
                data = Some(bytes);
            }
            _ => {}
        }
    }

    let bucket_name = bucket_name.ok_or_else(|| missing("bucketName"))?;
    let key = key.ok_or_else(|| missing("key"))?;
    let data = data.ok_or_else(|| missing("file"))?;

    if state.s3.upload_bytes(&bucket_name, &key, data).await? {
        Ok("File uploaded successfully".into_response())
    } else {
        Ok((StatusCode::INTERNAL_SERVER_ERROR, "Error uploading file").into_response())
    }
}

#[utoipa::path(
    post,
    path = "/s3/downloadFile",
    params(ObjectParams),
    responses(
        (status = 200, description = "File written to the destination folder", body = String),
        (status = 400, description = "Key has no usable file name"),
        (status = 404, description = "Bucket or key not found")
    ),
    tag = "objects"
)]
pub async fn download_file(
    State(state): State<crate::AppState>,
    Params(params): Params<ObjectParams>,
) -> Result<String, AppError> {
    state
        .s3
        .download_file(&params.bucket_name, &params.key)
        .await?;
    Ok("File download successfully".to_string())
}
