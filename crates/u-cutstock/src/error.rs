//! Engine errors.
//!
//! Lookup failures, empty jobs and unplaceable pieces are reported inside an
//! [`crate::OptimizationOutcome`]; only unexpected faults surface here.

use thiserror::Error;

/// Result type for engine operations.
pub type Result<T> = std::result::Result<T, EngineError>;

#[derive(Debug, Error)]
pub enum EngineError {
    /// A request or plan could not be encoded.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
