//! Processing pipeline
//!
//! Sequences validation, filtering, routing and forwarding for one payload:
//!
//! ```text
//! Validating -> Filtering -> [Dropped]
//!            -> Routing   -> [RoutingFailed]
//!            -> Forwarding -> [ForwardingFailed | Forwarded]
//! ```
//!
//! The pipeline is built once from configuration and shared between requests.

use crate::context::{RequestRecord, Stage};
use crate::error::{PipelineError, Result};
use crate::filter::FilterEngine;
use crate::forwarder::{Forwarder, RequestForwarder};
use crate::result::{DestinationResponse, PipelineOutcome};
use crate::routing::RoutingEngine;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use switchyard_core::types::json_type_name;
use switchyard_core::Config;

/// Message reported for payloads that are not JSON objects
pub const INVALID_PAYLOAD_MESSAGE: &str = "Payload must be a JSON object";

/// Four-stage processing pipeline
pub struct ProcessingPipeline {
    filter: FilterEngine,
    router: RoutingEngine,
    forwarder: Arc<dyn Forwarder>,
}

impl ProcessingPipeline {
    /// Build the pipeline from validated configuration
    pub fn new(config: &Config) -> Result<Self> {
        let forwarder = RequestForwarder::new(config.general.route_timeout_duration())?;
        Ok(Self::with_forwarder(config, Arc::new(forwarder)))
    }

    /// Build the pipeline with a custom forwarder
    pub fn with_forwarder(config: &Config, forwarder: Arc<dyn Forwarder>) -> Self {
        Self {
            filter: FilterEngine::new(config.filtering.clone()),
            router: RoutingEngine::new(config.routes.clone()),
            forwarder,
        }
    }

    /// Process one payload
    ///
    /// # Arguments
    /// * `payload` - Parsed request body
    /// * `headers` - Inbound request headers, used for forwarding
    /// * `record` - Request record to fill in
    ///
    /// Stage outcomes are returned as [`PipelineOutcome`]; only broken
    /// invariants produce an error, which is also written to the record's
    /// `error` metadata.
    pub async fn process(
        &self,
        payload: Value,
        headers: &HashMap<String, String>,
        record: &mut RequestRecord,
    ) -> Result<PipelineOutcome> {
        let result = self.run(payload, headers, record).await;
        record.finish();

        match &result {
            Ok(outcome) => {
                tracing::info!(
                    request_id = %record.request_id,
                    result = outcome.result_label(),
                    "Request processed"
                );
            }
            Err(e) => {
                tracing::error!(request_id = %record.request_id, error = %e, "Pipeline failed");
                record.add_metadata("error", Value::String(e.to_string()));
            }
        }

        result
    }

    async fn run(
        &self,
        payload: Value,
        headers: &HashMap<String, String>,
        record: &mut RequestRecord,
    ) -> Result<PipelineOutcome> {
        record.mark_stage(Stage::Validation);
        record.add_metadata("payload", payload.clone());

        if !payload.is_object() {
            let payload_type = json_type_name(&payload);
            tracing::warn!(request_id = %record.request_id, payload_type, "Rejected non-object payload");
            return Ok(PipelineOutcome::ValidationFailed {
                message: INVALID_PAYLOAD_MESSAGE.to_string(),
                payload_type,
            });
        }

        record.mark_stage(Stage::Filtering);
        let filtering = self.filter.evaluate(&payload);
        record.set_filtering(filtering.clone())?;

        if !filtering.passed {
            tracing::info!(
                request_id = %record.request_id,
                default_action_applied = filtering.default_action_applied,
                "Payload dropped by filter"
            );
            return Ok(PipelineOutcome::Dropped { filtering });
        }

        record.mark_stage(Stage::Routing);
        let routing = self.router.resolve(&payload);
        record.set_routing(routing.clone())?;

        let destination = match (routing.success, routing.destination_url.clone()) {
            (true, Some(url)) => url,
            (true, None) => {
                return Err(PipelineError::Internal(
                    "routing succeeded without a destination".to_string(),
                ))
            }
            (false, _) => {
                let error_message = routing
                    .error_message
                    .clone()
                    .unwrap_or_else(|| crate::routing::NO_MATCHING_ROUTE.to_string());
                tracing::info!(request_id = %record.request_id, error = %error_message, "Routing failed");
                return Ok(PipelineOutcome::RoutingFailed {
                    filtering,
                    routing,
                    error_message,
                });
            }
        };

        record.mark_stage(Stage::Forwarding);
        let forwarding = self.forwarder.forward(&destination, &payload, headers).await;
        record.set_forwarding(forwarding.clone())?;

        if !forwarding.success {
            let error_message = forwarding
                .error_message
                .clone()
                .unwrap_or_else(|| "forwarding failed".to_string());
            return Ok(PipelineOutcome::ForwardingFailed {
                filtering,
                routing,
                forwarding,
                error_message,
            });
        }

        let response = DestinationResponse::from_outcome(&forwarding).ok_or_else(|| {
            PipelineError::Internal("successful forward without a status code".to_string())
        })?;

        Ok(PipelineOutcome::Forwarded {
            filtering,
            routing,
            forwarding,
            response,
        })
    }
}
