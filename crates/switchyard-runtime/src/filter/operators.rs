//! Filter operator evaluation
//!
//! Comparisons never fail: type mismatches evaluate to `false`.

use serde_json::Value;
use switchyard_core::types::as_number;
use switchyard_core::{FilterOperator, RuleValue};

/// Apply `op` to an extracted field value and the rule's comparison value
pub(crate) fn apply_operator(op: FilterOperator, field: &Value, rule: &RuleValue) -> bool {
    // A null field only equals a null comparison value, which cannot be configured
    if field.is_null() {
        tracing::debug!("Null field value with operator {}, returning false", op);
        return false;
    }

    match op {
        FilterOperator::Equals => coerced_equals(field, rule),
        FilterOperator::NotEquals => !coerced_equals(field, rule),
        FilterOperator::In => match rule.as_list() {
            Some(items) => items.iter().any(|item| scalar_equals(field, item)),
            None => false,
        },
        FilterOperator::ContainsAny => match rule.as_list() {
            Some(items) => contains_any(field, items),
            None => false,
        },
        FilterOperator::LessThan => compare_numbers(field, rule).is_some_and(|(l, r)| l < r),
        FilterOperator::GreaterThan => compare_numbers(field, rule).is_some_and(|(l, r)| l > r),
    }
}

/// Equality with numeric coercion
///
/// When either side is a number, both are converted to `f64`; if either
/// conversion fails the original values are compared as they are.
fn coerced_equals(field: &Value, rule: &RuleValue) -> bool {
    if field.is_number() || rule.is_numeric() {
        if let (Some(l), Some(r)) = (as_number(field), rule.as_number()) {
            return l == r;
        }
    }
    scalar_equals(field, rule)
}

/// Strict equality: numbers numerically, strings and booleans exactly
fn scalar_equals(field: &Value, rule: &RuleValue) -> bool {
    match (field, rule) {
        (Value::Number(l), RuleValue::Number(r)) => l.as_f64() == Some(*r),
        (Value::String(l), RuleValue::String(r)) => l == r,
        (Value::Bool(l), RuleValue::Bool(r)) => l == r,
        _ => false,
    }
}

fn contains_any(field: &Value, items: &[RuleValue]) -> bool {
    match field {
        Value::String(haystack) => items.iter().any(|item| match item {
            RuleValue::String(needle) => haystack.contains(needle.as_str()),
            _ => false,
        }),
        Value::Array(elements) => items
            .iter()
            .any(|item| elements.iter().any(|element| scalar_equals(element, item))),
        _ => false,
    }
}

fn compare_numbers(field: &Value, rule: &RuleValue) -> Option<(f64, f64)> {
    Some((as_number(field)?, rule.as_number()?))
}
