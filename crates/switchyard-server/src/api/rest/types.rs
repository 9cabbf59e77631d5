//! REST API type definitions

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use switchyard_core::Config;
use switchyard_runtime::{
    DestinationResponse, FilteringSummary, ForwardingSummary, ProcessingPipeline, RoutingSummary,
};

/// Application state
#[derive(Clone)]
pub struct AppState {
    pub pipeline: Arc<ProcessingPipeline>,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(config: Config, pipeline: ProcessingPipeline) -> Self {
        Self {
            pipeline: Arc::new(pipeline),
            config: Arc::new(config),
        }
    }
}

/// Health check response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: DateTime<Utc>,
    pub request_id: String,
}

/// Active configuration response
#[derive(Debug, Serialize)]
pub struct ConfigResponse<'a> {
    pub config: &'a Config,
    pub request_id: String,
}

/// Result of processing a webhook
///
/// Only the summaries for stages that ran are present.
#[derive(Debug, Serialize, Deserialize)]
pub struct WebhookResponse {
    /// `processed`, `forwarded` or `failed`
    pub status: String,

    /// `dropped`, `success`, `routing_failed` or `forwarding_failed`
    pub result: String,

    pub request_id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filtering_summary: Option<FilteringSummary>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub routing_summary: Option<RoutingSummary>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub forwarding_summary: Option<ForwardingSummary>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub destination_response: Option<DestinationResponse>,
}
