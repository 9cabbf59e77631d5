//! Custom extractors
//!
//! Provides the request correlation id and a JSON body extractor whose
//! rejections carry it.

use crate::error::{ApiError, ServerError};
use axum::{
    extract::{rejection::JsonRejection, FromRequest, FromRequestParts, Request},
    http::{request::Parts, HeaderMap},
    Json,
};
use std::convert::Infallible;

/// Header carrying the correlation id
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Read the correlation id set by the request-id layer
pub(crate) fn request_id_from(headers: &HeaderMap) -> String {
    headers
        .get(REQUEST_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .filter(|value| !value.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| uuid::Uuid::new_v4().to_string())
}

/// Correlation id of the current request
///
/// Taken from `x-request-id`; a fresh UUID is generated when the header is
/// absent.
#[derive(Debug, Clone)]
pub struct CorrelationId(pub String);

#[axum::async_trait]
impl<S> FromRequestParts<S> for CorrelationId
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self(request_id_from(&parts.headers)))
    }
}

/// JSON extractor with descriptive 400 responses
pub struct JsonExtractor<T>(pub T);

#[axum::async_trait]
impl<S, T> FromRequest<S> for JsonExtractor<T>
where
    T: serde::de::DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let request_id = request_id_from(req.headers());

        match Json::<T>::from_request(req, state).await {
            Ok(value) => Ok(Self(value.0)),
            Err(rejection) => {
                let message = match rejection {
                    JsonRejection::JsonDataError(err) => {
                        format!("Invalid JSON data: {}", err.body_text())
                    }
                    JsonRejection::JsonSyntaxError(err) => {
                        format!("Invalid JSON payload: {}", err.body_text())
                    }
                    JsonRejection::MissingJsonContentType(_) => {
                        "Content-Type must be application/json".to_string()
                    }
                    _ => format!("Failed to read request body: {}", rejection),
                };

                tracing::warn!(request_id = %request_id, error = %message, "Rejected request body");
                Err(ServerError::InvalidRequest(message).with_request_id(request_id))
            }
        }
    }
}
