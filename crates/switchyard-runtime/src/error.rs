//! Runtime error types

use thiserror::Error;

/// Pipeline-level failure
///
/// Stage outcomes (drops, routing misses, transport failures) are not errors;
/// this covers broken invariants and setup failures only.
#[derive(Error, Debug)]
pub enum PipelineError {
    /// Invariant violated while processing
    #[error("Internal pipeline error: {0}")]
    Internal(String),

    /// A stage ran out of order
    #[error("Stage '{stage}' ran before '{expected}'")]
    StageOrder {
        stage: &'static str,
        expected: &'static str,
    },
}

/// Result type for runtime operations
pub type Result<T> = std::result::Result<T, PipelineError>;
