//! Pipeline outcome types
//!
//! `PipelineOutcome` is the terminal, stage-tagged result of one request. The
//! summary types are the compact views reported back to callers.

use crate::filter::FilteringOutcome;
use crate::forwarder::{ForwardErrorKind, ForwardingOutcome};
use crate::routing::RoutingOutcome;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Terminal result of processing one payload
#[derive(Debug, Clone, PartialEq)]
pub enum PipelineOutcome {
    /// Payload was not a JSON object
    ValidationFailed {
        message: String,
        payload_type: &'static str,
    },

    /// Filtering did not pass
    Dropped { filtering: FilteringOutcome },

    /// Filtering passed but no destination was resolved
    RoutingFailed {
        filtering: FilteringOutcome,
        routing: RoutingOutcome,
        error_message: String,
    },

    /// Destination resolved but the transport failed
    ForwardingFailed {
        filtering: FilteringOutcome,
        routing: RoutingOutcome,
        forwarding: ForwardingOutcome,
        error_message: String,
    },

    /// Payload delivered; the destination answered
    Forwarded {
        filtering: FilteringOutcome,
        routing: RoutingOutcome,
        forwarding: ForwardingOutcome,
        response: DestinationResponse,
    },
}

impl PipelineOutcome {
    /// Short result label (`dropped`, `routing_failed`, ...)
    pub fn result_label(&self) -> &'static str {
        match self {
            PipelineOutcome::ValidationFailed { .. } => "validation_failed",
            PipelineOutcome::Dropped { .. } => "dropped",
            PipelineOutcome::RoutingFailed { .. } => "routing_failed",
            PipelineOutcome::ForwardingFailed { .. } => "forwarding_failed",
            PipelineOutcome::Forwarded { .. } => "success",
        }
    }

    pub fn filtering(&self) -> Option<&FilteringOutcome> {
        match self {
            PipelineOutcome::ValidationFailed { .. } => None,
            PipelineOutcome::Dropped { filtering }
            | PipelineOutcome::RoutingFailed { filtering, .. }
            | PipelineOutcome::ForwardingFailed { filtering, .. }
            | PipelineOutcome::Forwarded { filtering, .. } => Some(filtering),
        }
    }

    pub fn routing(&self) -> Option<&RoutingOutcome> {
        match self {
            PipelineOutcome::RoutingFailed { routing, .. }
            | PipelineOutcome::ForwardingFailed { routing, .. }
            | PipelineOutcome::Forwarded { routing, .. } => Some(routing),
            _ => None,
        }
    }

    pub fn forwarding(&self) -> Option<&ForwardingOutcome> {
        match self {
            PipelineOutcome::ForwardingFailed { forwarding, .. }
            | PipelineOutcome::Forwarded { forwarding, .. } => Some(forwarding),
            _ => None,
        }
    }
}

/// The destination's answer, as reported to the caller
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DestinationResponse {
    pub status_code: u16,
    pub headers: BTreeMap<String, String>,

    /// Parsed JSON when the body is JSON, otherwise the body text
    pub body: Value,

    pub destination_url: String,
    pub response_time_ms: f64,
}

impl DestinationResponse {
    /// Build from a successful forwarding outcome; `None` when no status was received
    pub fn from_outcome(outcome: &ForwardingOutcome) -> Option<Self> {
        Some(Self {
            status_code: outcome.status_code?,
            headers: outcome.headers.clone(),
            body: outcome.body_value(),
            destination_url: outcome.destination_url.clone(),
            response_time_ms: outcome.response_time_ms,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilteringSummary {
    pub rules_evaluated: usize,
    pub default_action_applied: bool,

    /// Fields of the rules that passed; `None` when none did
    pub matched_rules: Option<Vec<String>>,
}

impl From<&FilteringOutcome> for FilteringSummary {
    fn from(outcome: &FilteringOutcome) -> Self {
        let matched = outcome.matched_rules();
        Self {
            rules_evaluated: outcome.rules_evaluated,
            default_action_applied: outcome.default_action_applied,
            matched_rules: (!matched.is_empty()).then_some(matched),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoutingSummary {
    pub success: bool,
    pub destination_url: Option<String>,
    pub field_path: String,
    pub matched_value: Option<String>,
    pub rule_index: Option<usize>,
    pub total_rules: usize,
}

impl From<&RoutingOutcome> for RoutingSummary {
    fn from(outcome: &RoutingOutcome) -> Self {
        Self {
            success: outcome.success,
            destination_url: outcome.destination_url.clone(),
            field_path: outcome.field_path.clone(),
            matched_value: outcome.matched_value.clone(),
            rule_index: outcome.rule_index,
            total_rules: outcome.total_rules,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForwardingSummary {
    pub success: bool,
    pub destination_url: String,
    pub status_code: Option<u16>,
    pub response_time_ms: f64,
    pub error_type: Option<ForwardErrorKind>,
    pub error_message: Option<String>,
}

impl From<&ForwardingOutcome> for ForwardingSummary {
    fn from(outcome: &ForwardingOutcome) -> Self {
        Self {
            success: outcome.success,
            destination_url: outcome.destination_url.clone(),
            status_code: outcome.status_code,
            response_time_ms: outcome.response_time_ms,
            error_type: outcome.error_kind,
            error_message: outcome.error_message.clone(),
        }
    }
}
