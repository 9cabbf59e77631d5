//! Router creation and configuration

use super::handlers::*;
use super::types::AppState;
use axum::{
    http::{header, HeaderValue, Response, StatusCode},
    middleware,
    routing::{get, post},
    Router,
};
use serde_json::json;
use std::any::Any;
use tower::ServiceBuilder;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;

/// Create REST API router
///
/// Every request gets an `x-request-id` (the caller's, or a new UUID) that is
/// echoed on the response.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/webhook", post(webhook))
        .route("/health", get(health))
        .route("/config", get(config_info))
        .fallback(not_found)
        .with_state(state)
        .layer(middleware::from_fn(method_not_allowed_as_json))
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
                .layer(PropagateRequestIdLayer::x_request_id())
                .layer(TraceLayer::new_for_http())
                .layer(CatchPanicLayer::custom(panic_response)),
        )
}

fn panic_response(_panic: Box<dyn Any + Send + 'static>) -> Response<String> {
    tracing::error!("Handler panicked");

    let body = json!({
        "error": "InternalServerError",
        "message": crate::error::INTERNAL_ERROR_MESSAGE,
        "status": 500,
    })
    .to_string();

    let mut response = Response::new(body);
    *response.status_mut() = StatusCode::INTERNAL_SERVER_ERROR;
    response.headers_mut().insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("application/json"),
    );
    response
}
