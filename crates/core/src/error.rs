//! Error types for U-Cutstock.

use thiserror::Error;

/// Result type alias for U-Cutstock operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while preparing or running a cutting plan.
#[derive(Debug, Error)]
pub enum Error {
    /// Invalid demand line provided.
    #[error("Invalid piece: {0}")]
    InvalidPiece(String),

    /// Invalid stock resource provided.
    #[error("Invalid stock: {0}")]
    InvalidStock(String),

    /// Nothing to cut or nothing to cut from.
    #[error("Empty input: {0}")]
    EmptyInput(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Serialization error.
    #[cfg(feature = "serde")]
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// Internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}
