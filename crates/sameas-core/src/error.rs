//! Engine error types

use thiserror::Error;

/// Errors raised at the engine's parsing boundaries.
///
/// Evaluation itself never fails: unknown targets and unparseable timestamps
/// degrade to documented neutral outcomes instead.
#[derive(Debug, Error)]
pub enum Error {
    /// Evaluation input could not be decoded
    #[error("invalid evaluate input: {0}")]
    InvalidInput(String),

    /// A record in a statement batch was malformed
    #[error("invalid statement line {line}: {reason}")]
    InvalidStatementLine { line: usize, reason: String },

    /// An opaque identifier failed validation
    #[error("invalid identifier: {0:?}")]
    InvalidIdentifier(String),

    /// Serialization/deserialization error
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for engine operations
pub type Result<T> = std::result::Result<T, Error>;
