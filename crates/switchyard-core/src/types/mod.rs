//! Value types and JSON helpers

pub mod value;

pub use value::{as_number, canonical_string, json_type_name, RuleValue};
