//! Filter rules and route mappings
//!
//! These are the configuration-level definitions; evaluation lives in the
//! runtime crate.

pub mod filter;
pub mod operator;
pub mod route;

pub use filter::{FilterConditions, FilterRule, FilteringConfig};
pub use operator::{DefaultAction, FilterOperator, LogicOperator};
pub use route::RouteMapping;
