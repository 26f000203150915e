//! Statements - the data model of the engine
//!
//! A statement is a subject–predicate–object triple with opaque and raw
//! identifier forms. Statements are immutable once built; the engine only
//! reads them.
//!
//! # Example
//!
//! ```rust
//! use sameas_core::statement::{StatementBuilder, statement_id};
//!
//! let statement = StatementBuilder::new()
//!     .subject("person:alice")
//!     .predicate("pred:sameas")
//!     .predicate_raw("https://www.w3.org/2002/07/owl#sameAs")
//!     .object("person:a-smith")
//!     .build();
//!
//! assert_eq!(statement.id, statement_id("person:alice", "pred:sameas", "person:a-smith"));
//! ```

pub mod batch;
mod id;
mod types;

pub use batch::parse_batch;
pub use id::{
    predicate_id, raw_identifier, statement_id, validate_identifier, PREDICATE_ID_PREFIX,
    RAW_ID_SEP, STATEMENT_ID_PREFIX,
};
pub use types::{Statement, StatementBuilder};
