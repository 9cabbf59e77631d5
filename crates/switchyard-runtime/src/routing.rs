//! Content-based routing
//!
//! Mappings are tried in configuration order; the first one whose field
//! extracts to a non-null value with an exact key in its table wins.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use switchyard_core::types::canonical_string;
use switchyard_core::{extract, RouteMapping};

pub const NO_ROUTES_CONFIGURED: &str = "no routing rules configured";
pub const NO_MATCHING_ROUTE: &str = "no matching routing rule found";

/// Diagnostic record of one mapping that was tried
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteAttempt {
    pub rule_index: usize,
    pub field_path: String,

    /// Canonical string form of the extracted value
    pub matched_value: Option<String>,

    /// Why this mapping did not resolve a destination
    pub error: Option<String>,
}

/// Result of a routing decision
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoutingOutcome {
    pub success: bool,
    pub destination_url: Option<String>,

    /// Field path of the winning mapping; the first mapping's path on failure
    pub field_path: String,

    pub matched_value: Option<String>,
    pub rule_index: Option<usize>,
    pub error_message: Option<String>,

    /// Number of configured mappings
    pub total_rules: usize,

    pub attempts: Vec<RouteAttempt>,
}

/// Resolves destinations from payload content
#[derive(Debug, Clone)]
pub struct RoutingEngine {
    routes: Vec<RouteMapping>,
}

impl RoutingEngine {
    /// Create a new routing engine
    pub fn new(routes: Vec<RouteMapping>) -> Self {
        Self { routes }
    }

    /// Find the destination for `payload`
    pub fn resolve(&self, payload: &Value) -> RoutingOutcome {
        if self.routes.is_empty() {
            tracing::info!("No routing rules configured");
            return RoutingOutcome {
                success: false,
                destination_url: None,
                field_path: String::new(),
                matched_value: None,
                rule_index: None,
                error_message: Some(NO_ROUTES_CONFIGURED.to_string()),
                total_rules: 0,
                attempts: Vec::new(),
            };
        }

        let mut attempts = Vec::with_capacity(self.routes.len());
        let mut last_value: Option<String> = None;

        for (index, route) in self.routes.iter().enumerate() {
            let field_path = route.field.to_string();

            let value = match extract(payload, &route.field) {
                Ok(value) => value,
                Err(e) => {
                    tracing::debug!(rule_index = index, field = %field_path, error = %e, "Routing field extraction failed");
                    attempts.push(RouteAttempt {
                        rule_index: index,
                        field_path,
                        matched_value: None,
                        error: Some(format!("Field extraction failed: {}", e)),
                    });
                    continue;
                }
            };

            let Some(key) = canonical_string(value) else {
                tracing::debug!(rule_index = index, field = %field_path, "Routing field is null");
                attempts.push(RouteAttempt {
                    rule_index: index,
                    field_path,
                    matched_value: None,
                    error: Some("Extracted field value is null".to_string()),
                });
                continue;
            };

            last_value = Some(key.clone());

            if let Some(destination) = route.lookup(&key) {
                tracing::info!(
                    rule_index = index,
                    field = %field_path,
                    matched_value = %key,
                    destination_url = %destination,
                    "Routing decision made"
                );
                attempts.push(RouteAttempt {
                    rule_index: index,
                    field_path: field_path.clone(),
                    matched_value: Some(key.clone()),
                    error: None,
                });
                return RoutingOutcome {
                    success: true,
                    destination_url: Some(destination.to_string()),
                    field_path,
                    matched_value: Some(key),
                    rule_index: Some(index),
                    error_message: None,
                    total_rules: self.routes.len(),
                    attempts,
                };
            }

            tracing::debug!(rule_index = index, field = %field_path, value = %key, "No mapping for value");
            attempts.push(RouteAttempt {
                rule_index: index,
                field_path,
                error: Some(format!("No mapping found for value: {}", key)),
                matched_value: Some(key),
            });
        }

        tracing::info!(total_rules = self.routes.len(), "No routing rules matched");

        RoutingOutcome {
            success: false,
            destination_url: None,
            field_path: self.routes[0].field.to_string(),
            matched_value: last_value,
            rule_index: None,
            error_message: Some(NO_MATCHING_ROUTE.to_string()),
            total_rules: self.routes.len(),
            attempts,
        }
    }
}
