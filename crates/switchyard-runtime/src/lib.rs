//! Switchyard Runtime - Processing pipeline for the Switchyard webhook router
//!
//! This crate evaluates inbound payloads:
//! - Filter engine (rule evaluation with AND/OR logic and a default action)
//! - Routing engine (first-match-wins value to URL lookup)
//! - Request forwarder (HTTP POST with timeout and error classification)
//! - Processing pipeline and per-request record

pub mod context;
pub mod error;
pub mod filter;
pub mod forwarder;
pub mod pipeline;
pub mod result;
pub mod routing;

// Re-export main types
pub use context::{RequestRecord, Stage};
pub use error::{PipelineError, Result};
pub use filter::{FilterEngine, FilteringOutcome, RuleResult};
pub use forwarder::{ForwardErrorKind, Forwarder, ForwardingOutcome, RequestForwarder};
pub use pipeline::ProcessingPipeline;
pub use result::{
    DestinationResponse, FilteringSummary, ForwardingSummary, PipelineOutcome, RoutingSummary,
};
pub use routing::{RouteAttempt, RoutingEngine, RoutingOutcome};
