//! Per-request record
//!
//! A `RequestRecord` is created by the boundary for every inbound request and
//! filled in by the pipeline as stages run. Stage outcomes can only be set in
//! pipeline order.

use crate::error::{PipelineError, Result};
use crate::filter::FilteringOutcome;
use crate::forwarder::ForwardingOutcome;
use crate::routing::RoutingOutcome;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fmt;

/// Pipeline stage, in execution order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    Validation,
    Filtering,
    Routing,
    Forwarding,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Validation => "validation",
            Stage::Filtering => "filtering",
            Stage::Routing => "routing",
            Stage::Forwarding => "forwarding",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Everything known about one request as it moves through the pipeline
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestRecord {
    /// Correlation id
    pub request_id: String,

    pub received_at: DateTime<Utc>,

    /// Start timestamp of each stage that ran
    pub stages: BTreeMap<Stage, DateTime<Utc>>,

    pub completed_at: Option<DateTime<Utc>>,

    filtering: Option<FilteringOutcome>,
    routing: Option<RoutingOutcome>,
    forwarding: Option<ForwardingOutcome>,

    /// Free-form diagnostics
    pub metadata: Map<String, Value>,
}

impl RequestRecord {
    /// Create a new record stamped with the current time
    pub fn new(request_id: impl Into<String>) -> Self {
        Self {
            request_id: request_id.into(),
            received_at: Utc::now(),
            stages: BTreeMap::new(),
            completed_at: None,
            filtering: None,
            routing: None,
            forwarding: None,
            metadata: Map::new(),
        }
    }

    /// Record the start of `stage`
    pub fn mark_stage(&mut self, stage: Stage) {
        self.stages.insert(stage, Utc::now());
    }

    pub fn stage_started(&self, stage: Stage) -> Option<DateTime<Utc>> {
        self.stages.get(&stage).copied()
    }

    /// Record that processing finished
    pub fn finish(&mut self) {
        self.completed_at = Some(Utc::now());
    }

    /// Add a diagnostic entry
    pub fn add_metadata(&mut self, key: impl Into<String>, value: Value) {
        self.metadata.insert(key.into(), value);
    }

    pub fn filtering(&self) -> Option<&FilteringOutcome> {
        self.filtering.as_ref()
    }

    pub fn routing(&self) -> Option<&RoutingOutcome> {
        self.routing.as_ref()
    }

    pub fn forwarding(&self) -> Option<&ForwardingOutcome> {
        self.forwarding.as_ref()
    }

    /// Time spent in each stage, in milliseconds
    ///
    /// A stage lasts until the next recorded stage starts, or until
    /// [`finish`](Self::finish) for the last one. Stages without an end are
    /// left out.
    pub fn stage_durations(&self) -> BTreeMap<Stage, f64> {
        let marks: Vec<(Stage, DateTime<Utc>)> =
            self.stages.iter().map(|(stage, at)| (*stage, *at)).collect();

        marks
            .iter()
            .enumerate()
            .filter_map(|(i, (stage, start))| {
                let end = marks.get(i + 1).map(|(_, next)| *next).or(self.completed_at)?;
                let millis = (end - *start).num_microseconds()? as f64 / 1000.0;
                Some((*stage, millis))
            })
            .collect()
    }

    pub(crate) fn set_filtering(&mut self, outcome: FilteringOutcome) -> Result<()> {
        if self.filtering.is_some() {
            return Err(PipelineError::Internal(
                "filtering outcome recorded twice".to_string(),
            ));
        }
        self.filtering = Some(outcome);
        Ok(())
    }

    pub(crate) fn set_routing(&mut self, outcome: RoutingOutcome) -> Result<()> {
        if self.filtering.is_none() {
            return Err(PipelineError::StageOrder {
                stage: Stage::Routing.as_str(),
                expected: Stage::Filtering.as_str(),
            });
        }
        self.routing = Some(outcome);
        Ok(())
    }

    pub(crate) fn set_forwarding(&mut self, outcome: ForwardingOutcome) -> Result<()> {
        if self.routing.is_none() {
            return Err(PipelineError::StageOrder {
                stage: Stage::Forwarding.as_str(),
                expected: Stage::Routing.as_str(),
            });
        }
        self.forwarding = Some(outcome);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use serde_json::json;

    fn filtering() -> FilteringOutcome {
        FilteringOutcome {
            passed: true,
            rules_evaluated: 0,
            rule_results: vec![],
            default_action_applied: true,
            error_message: None,
        }
    }

    fn routing() -> RoutingOutcome {
        RoutingOutcome {
            success: false,
            destination_url: None,
            field_path: "a".to_string(),
            matched_value: None,
            rule_index: None,
            error_message: None,
            total_rules: 1,
            attempts: vec![],
        }
    }

    #[test]
    fn test_new_record() {
        let record = RequestRecord::new("req-1");
        assert_eq!(record.request_id, "req-1");
        assert!(record.stages.is_empty());
        assert!(record.filtering().is_none());
        assert!(record.metadata.is_empty());
    }

    #[test]
    fn test_mark_stage_and_metadata() {
        let mut record = RequestRecord::new("req-1");
        record.mark_stage(Stage::Validation);
        record.add_metadata("payload", json!({"a": 1}));

        assert!(record.stage_started(Stage::Validation).is_some());
        assert!(record.stage_started(Stage::Filtering).is_none());
        assert_eq!(record.metadata["payload"], json!({"a": 1}));
    }

    #[test]
    fn test_stage_durations() {
        let mut record = RequestRecord::new("req-1");
        let start = record.received_at;
        record.stages.insert(Stage::Validation, start);
        record.stages.insert(Stage::Filtering, start + Duration::milliseconds(2));
        record.stages.insert(Stage::Routing, start + Duration::milliseconds(5));

        let durations = record.stage_durations();
        assert_eq!(durations.get(&Stage::Validation), Some(&2.0));
        assert_eq!(durations.get(&Stage::Filtering), Some(&3.0));
        assert!(durations.get(&Stage::Routing).is_none());

        record.completed_at = Some(start + Duration::milliseconds(9));
        assert_eq!(record.stage_durations().get(&Stage::Routing), Some(&4.0));
    }

    #[test]
    fn test_outcomes_must_follow_pipeline_order() {
        let mut record = RequestRecord::new("req-1");
        let err = record.set_routing(routing()).unwrap_err();
        assert!(matches!(
            err,
            PipelineError::StageOrder {
                stage: "routing",
                expected: "filtering"
            }
        ));

        record.set_filtering(filtering()).unwrap();
        assert!(record.set_filtering(filtering()).is_err());
        record.set_routing(routing()).unwrap();
        assert!(record.routing().is_some());
    }

    #[test]
    fn test_stage_serializes_lowercase() {
        assert_eq!(serde_json::to_value(Stage::Forwarding).unwrap(), json!("forwarding"));
        assert_eq!(Stage::Routing.to_string(), "routing");
    }
}
