//! Payload filtering
//!
//! Rules are evaluated in order and combined with AND/OR logic; the rule set's
//! default action decides when the combination does not pass.

mod engine;
mod operators;

pub use engine::{FilterEngine, FilteringOutcome, RuleResult};
