//! Common error types for sameas I/O surfaces.

use thiserror::Error;

/// Common error type for batch runs, prompts and remote triggers.
#[derive(Error, Debug)]
pub enum Error {
    /// IO error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Remote answered with a non-success status
    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },

    /// Request never got an answer
    #[error("network error: {0}")]
    Network(String),

    /// Missing or malformed configuration; fail fast, never retried
    #[error("configuration error: {0}")]
    Config(String),

    /// Batch locator or payload problem
    #[error("batch error: {0}")]
    Batch(String),

    /// Engine error
    #[error(transparent)]
    Core(#[from] sameas_core::Error),
}

/// Result type alias using sameas Error.
pub type Result<T> = std::result::Result<T, Error>;
