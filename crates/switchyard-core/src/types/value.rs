//! Comparison values and JSON coercion helpers
//!
//! `RuleValue` is the value side of a filter rule as written in configuration.
//! Payload data stays as `serde_json::Value`; the helpers here give both sides
//! an explicit numeric coercion and a canonical string form.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Comparison value of a filter rule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RuleValue {
    /// Boolean value
    Bool(bool),
    /// Number value (f64 covers both integers and floats)
    Number(f64),
    /// String value
    String(String),
    /// List of scalar values, for `in` and `contains_any`
    List(Vec<RuleValue>),
}

impl RuleValue {
    /// Numeric view of this value
    ///
    /// Numbers convert directly, strings are parsed after trimming, everything
    /// else has no numeric form.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            RuleValue::Number(n) => Some(*n),
            RuleValue::String(s) => parse_number(s),
            RuleValue::Bool(_) | RuleValue::List(_) => None,
        }
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, RuleValue::Number(_))
    }

    pub fn is_scalar(&self) -> bool {
        !matches!(self, RuleValue::List(_))
    }

    pub fn as_list(&self) -> Option<&[RuleValue]> {
        match self {
            RuleValue::List(items) => Some(items),
            _ => None,
        }
    }

    /// JSON representation, used in diagnostics
    pub fn to_json(&self) -> Value {
        match self {
            RuleValue::Bool(b) => Value::Bool(*b),
            RuleValue::Number(n) => serde_json::Number::from_f64(*n)
                .map(Value::Number)
                .unwrap_or(Value::Null),
            RuleValue::String(s) => Value::String(s.clone()),
            RuleValue::List(items) => Value::Array(items.iter().map(RuleValue::to_json).collect()),
        }
    }
}

impl From<&str> for RuleValue {
    fn from(s: &str) -> Self {
        RuleValue::String(s.to_string())
    }
}

impl From<f64> for RuleValue {
    fn from(n: f64) -> Self {
        RuleValue::Number(n)
    }
}

impl From<bool> for RuleValue {
    fn from(b: bool) -> Self {
        RuleValue::Bool(b)
    }
}

impl<T: Into<RuleValue>> From<Vec<T>> for RuleValue {
    fn from(items: Vec<T>) -> Self {
        RuleValue::List(items.into_iter().map(Into::into).collect())
    }
}

fn parse_number(s: &str) -> Option<f64> {
    s.trim().parse::<f64>().ok()
}

/// Numeric view of a payload value (numbers directly, strings parsed)
pub fn as_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => parse_number(s),
        _ => None,
    }
}

/// Canonical string form of a payload value, used as a routing key
///
/// Strings are returned verbatim, numbers in their JSON form (`404`, `1.5`),
/// booleans as `True` / `False`. Arrays and objects use compact JSON. `null`
/// has no string form.
pub fn canonical_string(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(true) => Some("True".to_string()),
        Value::Bool(false) => Some("False".to_string()),
        other => Some(other.to_string()),
    }
}

/// Short JSON type name for diagnostics
pub fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_rule_value_deserialize_variants() {
        let v: RuleValue = serde_json::from_value(json!("alert")).unwrap();
        assert_eq!(v, RuleValue::String("alert".to_string()));

        let v: RuleValue = serde_json::from_value(json!(3)).unwrap();
        assert_eq!(v, RuleValue::Number(3.0));

        let v: RuleValue = serde_json::from_value(json!(true)).unwrap();
        assert_eq!(v, RuleValue::Bool(true));

        let v: RuleValue = serde_json::from_value(json!(["a", 2])).unwrap();
        assert_eq!(
            v,
            RuleValue::List(vec![RuleValue::String("a".to_string()), RuleValue::Number(2.0)])
        );
    }

    #[test]
    fn test_rule_value_as_number() {
        assert_eq!(RuleValue::Number(2.5).as_number(), Some(2.5));
        assert_eq!(RuleValue::from(" 42 ").as_number(), Some(42.0));
        assert_eq!(RuleValue::from("high").as_number(), None);
        assert_eq!(RuleValue::Bool(true).as_number(), None);
        assert_eq!(RuleValue::from(vec![1.0]).as_number(), None);
    }

    #[test]
    fn test_json_as_number() {
        assert_eq!(as_number(&json!(7)), Some(7.0));
        assert_eq!(as_number(&json!("1e3")), Some(1000.0));
        assert_eq!(as_number(&json!("seven")), None);
        assert_eq!(as_number(&json!(null)), None);
        assert_eq!(as_number(&json!([1])), None);
    }

    #[test]
    fn test_canonical_string() {
        assert_eq!(canonical_string(&json!(404)).as_deref(), Some("404"));
        assert_eq!(canonical_string(&json!(1.5)).as_deref(), Some("1.5"));
        assert_eq!(canonical_string(&json!("404")).as_deref(), Some("404"));
        assert_eq!(canonical_string(&json!(false)).as_deref(), Some("False"));
        assert_eq!(canonical_string(&json!(true)).as_deref(), Some("True"));
        assert_eq!(canonical_string(&json!(null)), None);
    }

    #[test]
    fn test_to_json() {
        let v = RuleValue::from(vec!["a", "b"]);
        assert_eq!(v.to_json(), json!(["a", "b"]));
        assert_eq!(RuleValue::Number(5.0).to_json(), json!(5.0));
    }

    #[test]
    fn test_json_type_name() {
        assert_eq!(json_type_name(&json!({})), "object");
        assert_eq!(json_type_name(&json!([])), "array");
        assert_eq!(json_type_name(&json!("x")), "string");
    }
}
