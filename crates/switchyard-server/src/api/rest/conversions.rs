//! Conversion utilities
//!
//! Maps pipeline outcomes to HTTP status codes and response bodies, and
//! inbound headers to the plain map the runtime forwards from.

use super::types::WebhookResponse;
use crate::error::ServerError;
use axum::{
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use std::collections::HashMap;
use switchyard_runtime::{FilteringSummary, ForwardingSummary, PipelineOutcome, RoutingSummary};

/// Status code and body for a pipeline outcome
pub(super) fn outcome_to_response(outcome: PipelineOutcome, request_id: &str) -> Response {
    match outcome {
        PipelineOutcome::ValidationFailed { message, .. } => ServerError::InvalidRequest(message)
            .with_request_id(request_id)
            .into_response(),
        other => {
            let (status, body) = outcome_body(other, request_id);
            (status, Json(body)).into_response()
        }
    }
}

/// Body of a non-validation outcome
pub(super) fn outcome_body(outcome: PipelineOutcome, request_id: &str) -> (StatusCode, WebhookResponse) {
    let base = |status: &str, result: &str| WebhookResponse {
        status: status.to_string(),
        result: result.to_string(),
        request_id: request_id.to_string(),
        error_message: None,
        filtering_summary: None,
        routing_summary: None,
        forwarding_summary: None,
        destination_response: None,
    };

    match outcome {
        PipelineOutcome::ValidationFailed { message, .. } => (
            StatusCode::BAD_REQUEST,
            WebhookResponse {
                error_message: Some(message),
                ..base("failed", "validation_failed")
            },
        ),
        PipelineOutcome::Dropped { filtering } => (
            StatusCode::OK,
            WebhookResponse {
                filtering_summary: Some(FilteringSummary::from(&filtering)),
                ..base("processed", "dropped")
            },
        ),
        PipelineOutcome::RoutingFailed {
            filtering,
            routing,
            error_message,
        } => (
            StatusCode::NOT_FOUND,
            WebhookResponse {
                error_message: Some(error_message),
                filtering_summary: Some(FilteringSummary::from(&filtering)),
                routing_summary: Some(RoutingSummary::from(&routing)),
                ..base("failed", "routing_failed")
            },
        ),
        PipelineOutcome::ForwardingFailed {
            filtering,
            routing,
            forwarding,
            error_message,
        } => (
            StatusCode::BAD_GATEWAY,
            WebhookResponse {
                error_message: Some(error_message),
                filtering_summary: Some(FilteringSummary::from(&filtering)),
                routing_summary: Some(RoutingSummary::from(&routing)),
                forwarding_summary: Some(ForwardingSummary::from(&forwarding)),
                ..base("failed", "forwarding_failed")
            },
        ),
        PipelineOutcome::Forwarded {
            filtering,
            routing,
            forwarding,
            response,
        } => (
            StatusCode::OK,
            WebhookResponse {
                filtering_summary: Some(FilteringSummary::from(&filtering)),
                routing_summary: Some(RoutingSummary::from(&routing)),
                forwarding_summary: Some(ForwardingSummary::from(&forwarding)),
                destination_response: Some(response),
                ..base("forwarded", "success")
            },
        ),
    }
}

/// Inbound headers as a name -> value map; non-UTF-8 values are skipped
pub(super) fn header_map(headers: &HeaderMap) -> HashMap<String, String> {
    headers
        .iter()
        .filter_map(|(name, value)| {
            value
                .to_str()
                .ok()
                .map(|v| (name.as_str().to_string(), v.to_string()))
        })
        .collect()
}
