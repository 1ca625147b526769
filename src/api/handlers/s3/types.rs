use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};

#[derive(Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct BucketParams {
    /// Name of the bucket
    pub bucket_name: String,
}

#[derive(Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct ObjectParams {
    pub bucket_name: String,
    /// Object key within the bucket
    pub key: String,
}

#[derive(Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct PresignParams {
    pub bucket_name: String,
    pub key: String,
    /// Lifetime of the URL in minutes
    pub minutes: u64,
}

/// `bucketName` and `key` may be sent in the query string instead of the form.
#[derive(Deserialize, IntoParams, Default)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct UploadQuery {
    pub bucket_name: Option<String>,
    pub key: Option<String>,
}

/// Multipart form accepted by the upload endpoint.
#[derive(Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UploadForm {
    pub bucket_name: String,
    pub key: String,
    #[schema(value_type = String, format = Binary)]
    pub file: Vec<u8>,
}
