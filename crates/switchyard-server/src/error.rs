//! Server error types

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::fmt;
use switchyard_runtime::PipelineError;

/// Message returned for internal failures; details only go to the log
pub const INTERNAL_ERROR_MESSAGE: &str = "An internal error occurred while processing the request";

/// Server error type
#[derive(Debug)]
pub enum ServerError {
    /// Malformed request (bad JSON, wrong content type, non-object payload)
    InvalidRequest(String),

    /// Unknown endpoint
    NotFound(String),

    /// Known endpoint, wrong method
    MethodNotAllowed(String),

    /// Internal server error
    InternalError(String),
}

impl ServerError {
    /// Error kind reported in the `error` field
    pub fn kind(&self) -> &'static str {
        match self {
            ServerError::InvalidRequest(_) => "InvalidRequest",
            ServerError::NotFound(_) => "NotFound",
            ServerError::MethodNotAllowed(_) => "MethodNotAllowed",
            ServerError::InternalError(_) => "InternalServerError",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ServerError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            ServerError::NotFound(_) => StatusCode::NOT_FOUND,
            ServerError::MethodNotAllowed(_) => StatusCode::METHOD_NOT_ALLOWED,
            ServerError::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn message(&self) -> &str {
        match self {
            ServerError::InvalidRequest(msg)
            | ServerError::NotFound(msg)
            | ServerError::MethodNotAllowed(msg)
            | ServerError::InternalError(msg) => msg,
        }
    }

    /// Attach the request's correlation id
    pub fn with_request_id(self, request_id: impl Into<String>) -> ApiError {
        ApiError {
            error: self,
            request_id: Some(request_id.into()),
        }
    }
}

impl fmt::Display for ServerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServerError::InvalidRequest(msg) => write!(f, "Invalid request: {}", msg),
            ServerError::NotFound(msg) => write!(f, "Not found: {}", msg),
            ServerError::MethodNotAllowed(msg) => write!(f, "Method not allowed: {}", msg),
            ServerError::InternalError(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for ServerError {}

impl From<PipelineError> for ServerError {
    fn from(err: PipelineError) -> Self {
        tracing::error!(error = %err, "Pipeline error");
        ServerError::InternalError(INTERNAL_ERROR_MESSAGE.to_string())
    }
}

impl From<anyhow::Error> for ServerError {
    fn from(err: anyhow::Error) -> Self {
        tracing::error!(error = %err, "Unhandled error");
        ServerError::InternalError(INTERNAL_ERROR_MESSAGE.to_string())
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        ApiError {
            error: self,
            request_id: None,
        }
        .into_response()
    }
}

/// A [`ServerError`] tied to a request
#[derive(Debug)]
pub struct ApiError {
    pub error: ServerError,
    pub request_id: Option<String>,
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.request_id {
            Some(id) => write!(f, "{} (request_id={})", self.error, id),
            None => write!(f, "{}", self.error),
        }
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.error.status();

        let mut body = json!({
            "error": self.error.kind(),
            "message": self.error.message(),
            "status": status.as_u16(),
        });
        if let Some(request_id) = self.request_id {
            body["request_id"] = json!(request_id);
        }

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;
    use serde_json::Value;

    async fn body_json(response: Response) -> Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[test]
    fn test_invalid_request_display() {
        let err = ServerError::InvalidRequest("missing content type".to_string());
        assert_eq!(err.to_string(), "Invalid request: missing content type");
    }

    #[test]
    fn test_not_found_display() {
        let err = ServerError::NotFound("/nope".to_string());
        assert_eq!(err.to_string(), "Not found: /nope");
    }

    #[test]
    fn test_pipeline_error_hides_detail() {
        let err: ServerError = PipelineError::Internal("secret detail".to_string()).into();
        assert!(matches!(err, ServerError::InternalError(_)));
        assert!(!err.to_string().contains("secret detail"));
    }

    #[test]
    fn test_anyhow_error_conversion() {
        let err: ServerError = anyhow::anyhow!("disk on fire").into();
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!err.to_string().contains("disk on fire"));
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(
            ServerError::InvalidRequest(String::new()).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ServerError::MethodNotAllowed(String::new()).status(),
            StatusCode::METHOD_NOT_ALLOWED
        );
    }

    #[tokio::test]
    async fn test_api_error_body_includes_request_id() {
        let response = ServerError::InvalidRequest("bad json".to_string())
            .with_request_id("req-1")
            .into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = body_json(response).await;
        assert_eq!(body["error"], "InvalidRequest");
        assert_eq!(body["message"], "bad json");
        assert_eq!(body["request_id"], "req-1");
        assert_eq!(body["status"], 400);
    }

    #[tokio::test]
    async fn test_server_error_body_without_request_id() {
        let body = body_json(ServerError::NotFound("x".to_string()).into_response()).await;
        assert_eq!(body["error"], "NotFound");
        assert!(body.get("request_id").is_none());
    }

    #[test]
    fn test_error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<ServerError>();
        assert_send_sync::<ApiError>();
    }
}
