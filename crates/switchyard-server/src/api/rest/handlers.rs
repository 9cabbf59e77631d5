//! API endpoint handlers

use super::conversions::{header_map, outcome_to_response};
use super::extractors::{request_id_from, CorrelationId, JsonExtractor};
use super::types::*;
use crate::error::{ApiError, ServerError};
use axum::{
    extract::{Request, State},
    http::{header, HeaderMap, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::Value;
use switchyard_runtime::RequestRecord;
use tracing::{debug, info};

/// Webhook endpoint: runs the payload through the pipeline
pub(super) async fn webhook(
    State(state): State<AppState>,
    CorrelationId(request_id): CorrelationId,
    headers: HeaderMap,
    JsonExtractor(payload): JsonExtractor<Value>,
) -> Result<Response, ApiError> {
    info!(request_id = %request_id, "Received webhook");

    let inbound = header_map(&headers);
    let mut record = RequestRecord::new(request_id.clone());

    let outcome = state
        .pipeline
        .process(payload, &inbound, &mut record)
        .await
        .map_err(|e| ServerError::from(e).with_request_id(request_id.as_str()))?;

    debug!(
        request_id = %request_id,
        stage_durations = ?record.stage_durations(),
        "Webhook stages"
    );

    Ok(outcome_to_response(outcome, &request_id))
}

/// Health check endpoint
pub(super) async fn health(CorrelationId(request_id): CorrelationId) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now(),
        request_id,
    })
}

/// Active configuration endpoint
pub(super) async fn config_info(
    State(state): State<AppState>,
    CorrelationId(request_id): CorrelationId,
) -> Response {
    Json(ConfigResponse {
        config: &state.config,
        request_id,
    })
    .into_response()
}

/// Fallback for unknown paths
pub(super) async fn not_found(CorrelationId(request_id): CorrelationId, request: Request) -> ApiError {
    ServerError::NotFound(format!(
        "The requested endpoint {} {} does not exist",
        request.method(),
        request.uri().path()
    ))
    .with_request_id(request_id)
}

/// Middleware turning axum's bare 405 responses into JSON errors
pub(super) async fn method_not_allowed_as_json(request: Request, next: Next) -> Response {
    let request_id = request_id_from(request.headers());
    let method = request.method().clone();
    let path = request.uri().path().to_string();

    let response = next.run(request).await;
    if response.status() != StatusCode::METHOD_NOT_ALLOWED {
        return response;
    }

    let allow = response.headers().get(header::ALLOW).cloned();
    let mut json = ServerError::MethodNotAllowed(format!(
        "Method {} is not allowed for {}",
        method, path
    ))
    .with_request_id(request_id)
    .into_response();

    if let Some(allow) = allow {
        json.headers_mut().insert(header::ALLOW, allow);
    }
    json
}
