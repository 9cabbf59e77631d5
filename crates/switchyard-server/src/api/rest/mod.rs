//! REST API implementation
//!
//! - types: Request/response type definitions
//! - extractors: Correlation id and JSON body extractors
//! - conversions: Pipeline outcome to HTTP response mapping
//! - handlers: API endpoint handlers
//! - router: Router creation and middleware stack
//! - tests: Unit tests for all components

mod conversions;
mod extractors;
mod handlers;
mod router;
mod tests;
pub mod types;

// Re-export public API
pub use extractors::{CorrelationId, JsonExtractor, REQUEST_ID_HEADER};
pub use router::create_router;
pub use types::{AppState, ConfigResponse, HealthResponse, WebhookResponse};
