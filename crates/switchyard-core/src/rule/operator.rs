//! Operators for filter rules

use serde::{Deserialize, Serialize};
use std::fmt;

/// Comparison operator of a single filter rule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterOperator {
    /// Equal, after numeric coercion
    Equals,
    /// Not equal, after numeric coercion
    NotEquals,
    /// Field value is a member of the comparison list
    In,
    /// Field string contains any listed substring, or field list shares an element
    ContainsAny,
    /// Numeric less than
    LessThan,
    /// Numeric greater than
    GreaterThan,
}

impl FilterOperator {
    pub fn as_str(&self) -> &'static str {
        match self {
            FilterOperator::Equals => "equals",
            FilterOperator::NotEquals => "not_equals",
            FilterOperator::In => "in",
            FilterOperator::ContainsAny => "contains_any",
            FilterOperator::LessThan => "less_than",
            FilterOperator::GreaterThan => "greater_than",
        }
    }

    /// Returns true if the comparison value must be a list
    pub fn requires_list(&self) -> bool {
        matches!(self, FilterOperator::In | FilterOperator::ContainsAny)
    }

    /// Returns true if the comparison value must be a number
    pub fn requires_number(&self) -> bool {
        matches!(self, FilterOperator::LessThan | FilterOperator::GreaterThan)
    }
}

impl fmt::Display for FilterOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How individual rule results are combined
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LogicOperator {
    #[serde(rename = "AND", alias = "and")]
    And,
    #[serde(rename = "OR", alias = "or")]
    Or,
}

impl LogicOperator {
    /// Combine rule results; an empty slice combines to true
    pub fn combine(&self, results: &[bool]) -> bool {
        match self {
            LogicOperator::And => results.iter().all(|passed| *passed),
            LogicOperator::Or => results.is_empty() || results.iter().any(|passed| *passed),
        }
    }
}

/// Action applied when the rules do not affirmatively pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DefaultAction {
    Pass,
    #[default]
    Drop,
}

impl DefaultAction {
    pub fn passes(&self) -> bool {
        matches!(self, DefaultAction::Pass)
    }
}
