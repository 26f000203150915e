//! Identity-equivalence evaluation engine
//!
//! Evaluates one "A is the same entity as B" claim against a supplied,
//! already materialized set of statements and produces a graded decision
//! (`same` / `different` / `uncertain`), a confidence estimate, per-metric
//! rationale and a reconstructed validity timeline.
//!
//! The engine is synchronous, single-threaded and side-effect free; it reads
//! only its arguments and the clock, so independent claims over the same
//! statement set can be evaluated in parallel without synchronization.
//!
//! # Example
//!
//! ```rust
//! use sameas_core::{Decision, EvaluateInput, Evaluator, StatementBuilder};
//! use sameas_core::predicates::OWL_SAME_AS;
//!
//! let claim = StatementBuilder::new()
//!     .subject("person:ada")
//!     .predicate("pred:sameas")
//!     .predicate_raw(OWL_SAME_AS)
//!     .object("person:countess-lovelace")
//!     .build();
//!
//! let input = EvaluateInput {
//!     target_statement_id: claim.id.clone(),
//!     statements: vec![claim],
//! };
//! let result = Evaluator::new().evaluate(&input);
//! assert_eq!(result.decision, Decision::Uncertain);
//! assert!(result.review_required);
//! ```

pub mod aggregate;
pub mod error;
pub mod evaluate;
pub mod interval;
pub mod method;
pub mod metrics;
pub mod predicates;
pub mod resolve;
pub mod statement;
pub mod store;

// Re-export main types at crate root
pub use aggregate::{Decision, DecisionPolicy, MetricResult, WeightTable};
pub use error::{Error, Result};
pub use evaluate::{evaluate_json, EvaluateInput, EvaluationResult, Evaluator};
pub use interval::{reconcile, IntervalStatus, ValidityInterval};
pub use method::MethodMeta;
pub use metrics::{Metric, MetricDraft};
pub use predicates::PredicateSet;
pub use resolve::{EvidenceContext, EvidenceResolver};
pub use statement::{parse_batch, Statement, StatementBuilder};
pub use store::StatementStore;
