pub mod api;
pub mod config;
pub mod infrastructure;
pub mod services;

use crate::config::ServerConfig;
use crate::services::S3Service;
use axum::{
    Router,
    middleware::from_fn,
    routing::{get, post},
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[derive(OpenApi)]
#[openapi(
    paths(
        api::handlers::s3::bucket::create_bucket,
        api::handlers::s3::bucket::does_bucket_exist,
        api::handlers::s3::bucket::get_all_buckets,
        api::handlers::s3::object::upload_file,
        api::handlers::s3::object::download_file,
        api::handlers::s3::presign::generate_presigned_upload_url,
        api::handlers::s3::presign::generate_presigned_download_url,
        api::handlers::health::health_check,
    ),
    components(
        schemas(
            api::handlers::s3::UploadForm,
            api::handlers::health::HealthResponse,
        )
    ),
    tags(
        (name = "buckets", description = "Bucket endpoints"),
        (name = "objects", description = "Object upload and download endpoints"),
        (name = "presign", description = "Pre-signed URL endpoints"),
        (name = "system", description = "Service health")
    )
)]
pub struct ApiDoc;

#[derive(Clone)]
pub struct AppState {
    pub s3: Arc<S3Service>,
    pub config: ServerConfig,
}

pub fn create_app(state: AppState) -> Router {
    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(|request: &axum::http::Request<_>| {
            let request_id = request
                .headers()
                .get("x-request-id")
                .and_then(|v| v.to_str().ok())
                .unwrap_or("unknown");
            tracing::info_span!(
                "http_request",
                method = %request.method(),
                uri = %request.uri(),
                request_id = %request_id,
            )
        })
        .on_request(|request: &axum::http::Request<_>, _span: &tracing::Span| {
            info!("📥 {} {}", request.method(), request.uri());
        })
        .on_response(
            |response: &axum::http::Response<_>,
             latency: std::time::Duration,
             _span: &tracing::Span| {
                info!(
                    "📤 Finished in {:?} with status {}",
                    latency,
                    response.status()
                );
            },
        );

    let s3_routes = Router::new()
        .route("/createBucket", post(api::handlers::s3::create_bucket))
        .route(
            "/doesBucketExist/:bucketName",
            get(api::handlers::s3::does_bucket_exist),
        )
        .route("/getAllBuckets", get(api::handlers::s3::get_all_buckets))
        .route("/uploadFile", post(api::handlers::s3::upload_file))
        .route("/downloadFile", post(api::handlers::s3::download_file))
        .route(
            "/generatePresignedUploadUrl",
            post(api::handlers::s3::generate_presigned_upload_url),
        )
        .route(
            "/generatePresignedDownloadUrl",
            post(api::handlers::s3::generate_presigned_download_url),
        );

    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .route("/health", get(api::handlers::health::health_check))
        .nest("/s3", s3_routes)
        .layer(axum::extract::DefaultBodyLimit::max(state.config.max_file_size))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(trace_layer)
        .layer(from_fn(api::middleware::request_id::request_id_middleware))
        .with_state(state)
}
