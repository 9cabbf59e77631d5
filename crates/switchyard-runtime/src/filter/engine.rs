//! Filter engine: evaluates the configured rule set against a payload

use super::operators::apply_operator;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use switchyard_core::{extract, FilterOperator, FilterRule, FilteringConfig};

/// Result of evaluating one rule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleResult {
    /// Field path of the rule
    pub field: String,

    pub operator: FilterOperator,

    /// Comparison value from configuration
    pub rule_value: Value,

    /// Value found in the payload (`null` when extraction failed)
    pub extracted_value: Value,

    pub passed: bool,

    /// Extraction error, if any
    pub error: Option<String>,
}

/// Result of evaluating the whole rule set
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilteringOutcome {
    /// Whether the payload continues to routing
    pub passed: bool,

    pub rules_evaluated: usize,

    pub rule_results: Vec<RuleResult>,

    /// True when the decision came from the default action
    pub default_action_applied: bool,

    pub error_message: Option<String>,
}

impl FilteringOutcome {
    /// Field paths of the rules that passed, in rule order
    pub fn matched_rules(&self) -> Vec<String> {
        self.rule_results
            .iter()
            .filter(|r| r.passed)
            .map(|r| r.field.clone())
            .collect()
    }
}

/// Evaluates payloads against a fixed rule set
#[derive(Debug, Clone)]
pub struct FilterEngine {
    config: FilteringConfig,
}

impl FilterEngine {
    /// Create a new filter engine
    pub fn new(config: FilteringConfig) -> Self {
        Self { config }
    }

    /// Evaluate `payload` against every rule, in order
    ///
    /// All rules are evaluated (no short-circuit) so the outcome carries a
    /// result per rule. When the combined result is false, or there are no
    /// rules, the default action decides.
    pub fn evaluate(&self, payload: &Value) -> FilteringOutcome {
        if !payload.is_object() {
            return FilteringOutcome {
                passed: false,
                rules_evaluated: 0,
                rule_results: Vec::new(),
                default_action_applied: true,
                error_message: Some("Payload must be a JSON object".to_string()),
            };
        }

        let rules = self.config.rules();
        let rule_results: Vec<RuleResult> = rules
            .iter()
            .map(|rule| self.evaluate_rule(payload, rule))
            .collect();

        let default_action = self.config.default_action;
        let (passed, default_action_applied) = if rules.is_empty() {
            (default_action.passes(), true)
        } else {
            let outcomes: Vec<bool> = rule_results.iter().map(|r| r.passed).collect();
            if self.config.logic().combine(&outcomes) {
                (true, false)
            } else {
                (default_action.passes(), true)
            }
        };

        tracing::debug!(
            passed,
            default_action_applied,
            rules_evaluated = rules.len(),
            "Filter evaluation complete"
        );

        FilteringOutcome {
            passed,
            rules_evaluated: rules.len(),
            rule_results,
            default_action_applied,
            error_message: None,
        }
    }

    fn evaluate_rule(&self, payload: &Value, rule: &FilterRule) -> RuleResult {
        let mut result = RuleResult {
            field: rule.field.to_string(),
            operator: rule.operator,
            rule_value: rule.value.to_json(),
            extracted_value: Value::Null,
            passed: false,
            error: None,
        };

        match extract(payload, &rule.field) {
            Ok(value) => {
                result.passed = apply_operator(rule.operator, value, &rule.value);
                result.extracted_value = value.clone();
            }
            Err(e) => {
                tracing::debug!(field = %rule.field, error = %e, "Rule field extraction failed");
                result.error = Some(e.to_string());
            }
        }

        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use switchyard_core::{DefaultAction, FieldPath, LogicOperator, RuleValue};

    fn rule(field: &str, operator: FilterOperator, value: impl Into<RuleValue>) -> FilterRule {
        FilterRule::new(FieldPath::parse(field).unwrap(), operator, value)
    }

    fn engine(logic: LogicOperator, rules: Vec<FilterRule>, default: DefaultAction) -> FilterEngine {
        FilterEngine::new(FilteringConfig::new(logic, rules, default))
    }

    fn alert_rules() -> Vec<FilterRule> {
        vec![
            rule("objectType", FilterOperator::Equals, "alert"),
            rule("object.severity", FilterOperator::GreaterThan, 3.0),
        ]
    }

    #[test]
    fn test_and_all_pass() {
        let engine = engine(LogicOperator::And, alert_rules(), DefaultAction::Drop);
        let outcome = engine.evaluate(&json!({"objectType": "alert", "object": {"severity": 5}}));

        assert!(outcome.passed);
        assert!(!outcome.default_action_applied);
        assert_eq!(outcome.rules_evaluated, 2);
        assert_eq!(outcome.matched_rules(), vec!["objectType", "object.severity"]);
        assert_eq!(outcome.rule_results[1].extracted_value, json!(5));
        assert_eq!(outcome.rule_results[1].rule_value, json!(3.0));
    }

    #[test]
    fn test_and_one_fails_applies_drop() {
        let engine = engine(LogicOperator::And, alert_rules(), DefaultAction::Drop);
        let outcome = engine.evaluate(&json!({"objectType": "alert", "object": {"severity": 1}}));

        assert!(!outcome.passed);
        assert!(outcome.default_action_applied);
        assert_eq!(outcome.matched_rules(), vec!["objectType"]);
    }

    #[test]
    fn test_or_one_passes() {
        let engine = engine(LogicOperator::Or, alert_rules(), DefaultAction::Drop);
        let outcome = engine.evaluate(&json!({"objectType": "incident", "object": {"severity": 9}}));

        assert!(outcome.passed);
        assert!(!outcome.default_action_applied);
    }

    #[test]
    fn test_default_pass_when_rules_fail() {
        let engine = engine(LogicOperator::And, alert_rules(), DefaultAction::Pass);
        let outcome = engine.evaluate(&json!({"objectType": "info", "object": {"severity": 1}}));

        assert!(outcome.passed);
        assert!(outcome.default_action_applied);
        assert!(outcome.matched_rules().is_empty());
    }

    #[test]
    fn test_extraction_error_recorded_on_rule() {
        let engine = engine(LogicOperator::Or, alert_rules(), DefaultAction::Drop);
        let outcome = engine.evaluate(&json!({"objectType": "alert"}));

        assert!(outcome.passed);
        let failed = &outcome.rule_results[1];
        assert!(!failed.passed);
        assert_eq!(failed.extracted_value, Value::Null);
        assert_eq!(failed.error.as_deref(), Some("Key 'object' not found"));
    }

    #[test]
    fn test_null_field_fails_rule_without_error() {
        let engine = engine(
            LogicOperator::And,
            vec![rule("object.owner", FilterOperator::NotEquals, "nobody")],
            DefaultAction::Drop,
        );
        let outcome = engine.evaluate(&json!({"object": {"owner": null}}));

        assert!(!outcome.passed);
        assert!(outcome.rule_results[0].error.is_none());
    }

    #[test]
    fn test_empty_rules_apply_default_action() {
        let outcome = engine(LogicOperator::And, vec![], DefaultAction::Pass).evaluate(&json!({}));
        assert!(outcome.passed);
        assert!(outcome.default_action_applied);
        assert_eq!(outcome.rules_evaluated, 0);

        let outcome = engine(LogicOperator::Or, vec![], DefaultAction::Drop).evaluate(&json!({}));
        assert!(!outcome.passed);
        assert!(outcome.default_action_applied);
    }

    #[test]
    fn test_non_object_payload() {
        let engine = engine(LogicOperator::And, alert_rules(), DefaultAction::Pass);
        let outcome = engine.evaluate(&json!([1, 2, 3]));

        assert!(!outcome.passed);
        assert!(outcome.default_action_applied);
        assert_eq!(outcome.rules_evaluated, 0);
        assert!(outcome.error_message.is_some());
    }

    #[test]
    fn test_rule_result_serializes_operator_name() {
        let engine = engine(LogicOperator::And, alert_rules(), DefaultAction::Drop);
        let outcome = engine.evaluate(&json!({"objectType": "alert"}));
        let value = serde_json::to_value(&outcome.rule_results[0]).unwrap();
        assert_eq!(value["operator"], json!("equals"));
        assert_eq!(value["field"], json!("objectType"));
    }
}
