//! Error types for the worker pool.

use std::time::Duration;
use thiserror::Error;

/// Errors returned by [`crate::WorkerPool`].
#[derive(Debug, Error)]
pub enum PoolError {
    /// `execute` was called before `initialize`.
    #[error("Worker pool is not initialized")]
    NotInitialized,

    /// The pool was shut down before the task completed.
    #[error("Worker pool is shut down")]
    ShutDown,

    /// No result arrived within the task timeout.
    #[error("Task timed out after {0:?}")]
    Timeout(Duration),

    /// The handler reported a failure.
    #[error("Task failed: {0}")]
    TaskFailed(String),

    /// The worker panicked while running the task.
    #[error("Worker crashed: {0}")]
    WorkerCrashed(String),

    /// A task or result could not be encoded or decoded.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A worker thread could not be spawned.
    #[error("Failed to spawn worker: {0}")]
    Spawn(#[from] std::io::Error),

    /// Pool configuration is invalid.
    #[error("Invalid pool configuration: {0}")]
    InvalidConfig(String),
}

/// Result type alias for pool operations.
pub type Result<T> = std::result::Result<T, PoolError>;
