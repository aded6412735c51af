//! Shared error types for congruence analysis.

use thiserror::Error;

/// Main error type for coordmap operations.
#[derive(Debug, Error)]
pub enum CongruenceError {
    /// Malformed or inconsistent mined artifact: unknown id references,
    /// sparse identifier maps, axis mismatches, negative weights. Fatal for
    /// the run that hit it; never coerced to a zero score.
    #[error("data integrity error: {0}")]
    DataIntegrity(String),

    /// IO errors
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// JSON errors
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl CongruenceError {
    /// Create a data integrity error from any message.
    pub fn integrity(message: impl Into<String>) -> Self {
        Self::DataIntegrity(message.into())
    }
}

pub type Result<T> = std::result::Result<T, CongruenceError>;
