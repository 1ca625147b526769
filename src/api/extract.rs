use crate::api::error::AppError;
use axum::{
    async_trait,
    extract::{FromRequest, Request},
    http::{StatusCode, header::CONTENT_TYPE},
};
use bytes::Bytes;
use serde::de::DeserializeOwned;

/// Scalar request parameters, read from the query string and from an
/// url-encoded form body. A name present in both takes the form value.
#[derive(Debug, Clone)]
pub struct Params<T>(pub T);

fn is_form(req: &Request) -> bool {
    req.headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse::<mime::Mime>().ok())
        .is_some_and(|m| m.essence_str() == mime::APPLICATION_WWW_FORM_URLENCODED.essence_str())
}

fn pairs(input: &[u8]) -> Result<Vec<(String, String)>, AppError> {
    serde_urlencoded::from_bytes(input)
        .map_err(|e| AppError::BadRequest(format!("Failed to parse parameters: {}", e)))
}

#[async_trait]
impl<T, S> FromRequest<S> for Params<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let mut params = pairs(req.uri().query().unwrap_or_default().as_bytes())?;

        if is_form(&req) {
            let body = Bytes::from_request(req, state).await.map_err(|e| {
                if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
                    AppError::PayloadTooLarge(e.body_text())
                } else {
                    AppError::BadRequest(e.body_text())
                }
            })?;
            let form = pairs(&body)?;
            params.retain(|(name, _)| !form.iter().any(|(n, _)| n == name));
            params.extend(form);
        }

        let encoded = serde_urlencoded::to_string(&params)
            .map_err(|e| AppError::BadRequest(e.to_string()))?;
        let value = serde_urlencoded::from_str::<T>(&encoded)
            .map_err(|e| AppError::BadRequest(format!("Failed to deserialize parameters: {}", e)))?;
        Ok(Params(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use serde::Deserialize;

    #[derive(Deserialize, Debug, PartialEq)]
    #[serde(rename_all = "camelCase")]
    struct Sample {
        bucket_name: String,
        minutes: u64,
    }

    #[tokio::test]
    async fn test_params_from_query() {
        let req = Request::builder()
            .method("POST")
            .uri("/x?bucketName=media&minutes=5")
            .body(Body::empty())
            .unwrap();
        let Params(sample) = Params::<Sample>::from_request(req, &()).await.unwrap();
        assert_eq!(
            sample,
            Sample {
                bucket_name: "media".to_string(),
                minutes: 5
            }
        );
    }

    #[tokio::test]
    async fn test_params_from_form_body() {
        let req = Request::builder()
            .method("POST")
            .uri("/x")
            .header(CONTENT_TYPE, "application/x-www-form-urlencoded; charset=utf-8")
            .body(Body::from("bucketName=media&minutes=10"))
            .unwrap();
        let Params(sample) = Params::<Sample>::from_request(req, &()).await.unwrap();
        assert_eq!(sample.minutes, 10);
    }

    #[tokio::test]
    async fn test_params_rejects_negative_minutes() {
        let req = Request::builder()
            .method("POST")
            .uri("/x?bucketName=media&minutes=-1")
            .body(Body::empty())
            .unwrap();
        let res = Params::<Sample>::from_request(req, &()).await;
        assert!(matches!(res, Err(AppError::BadRequest(_))));
    }

    #[tokio::test]
    async fn test_params_merge_query_and_form_body() {
        let req = Request::builder()
            .method("POST")
            .uri("/x?bucketName=media&minutes=1")
            .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from("minutes=30"))
            .unwrap();
        let Params(sample) = Params::<Sample>::from_request(req, &()).await.unwrap();
        assert_eq!(
            sample,
            Sample {
                bucket_name: "media".to_string(),
                minutes: 30
            }
        );
    }

    #[tokio::test]
    async fn test_params_ignore_body_that_is_not_a_form() {
        let req = Request::builder()
            .method("POST")
            .uri("/x?bucketName=media&minutes=2")
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(r#"{"minutes":9}"#))
            .unwrap();
        let Params(sample) = Params::<Sample>::from_request(req, &()).await.unwrap();
        assert_eq!(sample.minutes, 2);
    }
}
