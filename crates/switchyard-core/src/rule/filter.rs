//! Filter rule definitions

use super::operator::{DefaultAction, FilterOperator, LogicOperator};
use crate::error::ConfigError;
use crate::path::FieldPath;
use crate::types::RuleValue;
use serde::{Deserialize, Serialize};

/// A single field comparison
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterRule {
    /// Path of the payload field to compare
    pub field: FieldPath,

    /// Comparison operator
    pub operator: FilterOperator,

    /// Value the field is compared against
    pub value: RuleValue,
}

impl FilterRule {
    /// Create a new rule
    pub fn new(field: FieldPath, operator: FilterOperator, value: impl Into<RuleValue>) -> Self {
        FilterRule {
            field,
            operator,
            value: value.into(),
        }
    }

    /// Check operator/value compatibility
    ///
    /// # Arguments
    /// * `location` - Configuration path of this rule, used in error messages
    pub fn validate(&self, location: &str) -> Result<(), ConfigError> {
        let field = format!("{}.value", location);

        if self.operator.requires_list() {
            let items = self.value.as_list().ok_or_else(|| {
                ConfigError::invalid(
                    &field,
                    format!("operator '{}' requires a list value", self.operator),
                )
            })?;
            if let Some(position) = items.iter().position(|item| !item.is_scalar()) {
                return Err(ConfigError::invalid(
                    format!("{}[{}]", field, position),
                    "list items must be strings, numbers or booleans",
                ));
            }
        } else if !self.value.is_scalar() {
            return Err(ConfigError::invalid(
                &field,
                format!("operator '{}' does not accept a list value", self.operator),
            ));
        }

        if self.operator.requires_number() && !self.value.is_numeric() {
            return Err(ConfigError::invalid(
                &field,
                format!("operator '{}' requires a numeric value", self.operator),
            ));
        }

        Ok(())
    }
}

/// Rules plus the logic combining them
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterConditions {
    pub logic: LogicOperator,
    pub rules: Vec<FilterRule>,
}

/// The `filtering` configuration section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilteringConfig {
    #[serde(default)]
    pub default_action: DefaultAction,
    pub conditions: FilterConditions,
}

impl FilteringConfig {
    pub fn new(logic: LogicOperator, rules: Vec<FilterRule>, default_action: DefaultAction) -> Self {
        FilteringConfig {
            default_action,
            conditions: FilterConditions { logic, rules },
        }
    }

    pub fn rules(&self) -> &[FilterRule] {
        &self.conditions.rules
    }

    pub fn logic(&self) -> LogicOperator {
        self.conditions.logic
    }

    /// Validate the section; at least one rule is required
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.conditions.rules.is_empty() {
            return Err(ConfigError::Empty("filtering.conditions.rules".to_string()));
        }

        for (index, rule) in self.conditions.rules.iter().enumerate() {
            rule.validate(&format!("filtering.conditions.rules[{}]", index))?;
        }

        Ok(())
    }
}
