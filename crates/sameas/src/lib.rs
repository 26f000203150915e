//! # sameas shared library
//!
//! I/O surfaces around the `sameas-core` engine:
//! - **batch**: fetch newline-delimited statement batches and evaluate them
//! - **prompt**: render review prompts for an evaluated claim
//! - **dispatch**: trigger a remote evaluation run for a batch
//! - **config**: environment configuration
//! - **error**: common error types
//! - **tracing**: logging setup
//!
//! ## Usage
//!
//! ```rust,ignore
//! use sameas::batch::{parse_dispatch_payload, run_batch};
//! use sameas_core::Evaluator;
//!
//! let payload = parse_dispatch_payload(&raw)?;
//! let report = run_batch(&payload, &Evaluator::new())?;
//! ```

pub mod batch;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod prompt;
pub mod tracing;

// Re-export commonly used items at crate root
pub use batch::{BatchLocator, BatchReport, DispatchPayload};
pub use config::Config;
pub use error::{Error, Result};
