//! Equivalence-claim evaluator
//!
//! Orchestrates evidence resolution, interval reconciliation, the metric
//! evaluators and the aggregator for one target claim.
//!
//! Evaluation is synchronous and side-effect free apart from reading the
//! clock; pin `now_ms` for reproducible output.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::aggregate::{
    confidence, normalize_score, raw_score, Decision, DecisionPolicy, EvidenceSignals,
    MetricResult, WeightTable,
};
use crate::error::Error;
use crate::interval::{has_any_valid_interval, now_ms, reconcile, ValidityInterval};
use crate::metrics;
use crate::predicates::PredicateSet;
use crate::resolve::EvidenceResolver;
use crate::statement::Statement;
use crate::store::StatementStore;

/// Input for one evaluation (JSON-friendly)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvaluateInput {
    pub target_statement_id: String,
    pub statements: Vec<Statement>,
}

/// Terminal result of one evaluation. Never mutated after construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvaluationResult {
    pub target_statement_id: String,
    /// The resolved equivalence statement, `None` when it could not be assessed
    pub same_as_statement: Option<Statement>,
    pub valid_from_statements: Vec<Statement>,
    pub valid_through_statements: Vec<Statement>,
    pub citation_statements_by_valid_from: BTreeMap<String, Vec<Statement>>,
    pub citation_statements_by_valid_through: BTreeMap<String, Vec<Statement>>,
    pub has_valid_from_evidence: bool,
    pub has_valid_through_evidence: bool,
    pub has_citation_for_every_valid_from: bool,
    pub has_citation_for_every_valid_through: bool,
    pub validity_intervals: Vec<ValidityInterval>,
    pub has_any_valid_interval: bool,
    pub decision: Decision,
    /// Normalized score in [0, 1]
    pub score: f64,
    /// Confidence in [0, 1]
    pub confidence: f64,
    pub review_required: bool,
    pub sub_metrics: Vec<MetricResult>,
    /// Distinct supporting statement ids, sorted ascending
    pub evidence_ids: Vec<String>,
    /// Metrics scoring above +0.2
    pub positive_evidence_count: usize,
    /// Metrics scoring below -0.2
    pub negative_evidence_count: usize,
}

impl EvaluationResult {
    /// The fixed answer for a claim the engine cannot assess
    pub fn unassessable(target_statement_id: impl Into<String>) -> Self {
        Self {
            target_statement_id: target_statement_id.into(),
            same_as_statement: None,
            valid_from_statements: Vec::new(),
            valid_through_statements: Vec::new(),
            citation_statements_by_valid_from: BTreeMap::new(),
            citation_statements_by_valid_through: BTreeMap::new(),
            has_valid_from_evidence: false,
            has_valid_through_evidence: false,
            has_citation_for_every_valid_from: false,
            has_citation_for_every_valid_through: false,
            validity_intervals: Vec::new(),
            has_any_valid_interval: false,
            decision: Decision::Uncertain,
            score: 0.5,
            confidence: 0.0,
            review_required: true,
            sub_metrics: Vec::new(),
            evidence_ids: Vec::new(),
            positive_evidence_count: 0,
            negative_evidence_count: 0,
        }
    }

    pub fn metric(&self, key: &str) -> Option<&MetricResult> {
        self.sub_metrics.iter().find(|m| m.key == key)
    }
}

const POSITIVE_SIGNAL: f64 = 0.2;

/// Evaluator with injected policy: predicates, weights, thresholds and clock.
#[derive(Debug, Clone, Default)]
pub struct Evaluator {
    predicates: PredicateSet,
    weights: WeightTable,
    policy: DecisionPolicy,
    now_ms: Option<i64>,
}

impl Evaluator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_predicates(mut self, predicates: PredicateSet) -> Self {
        self.predicates = predicates;
        self
    }

    pub fn with_weights(mut self, weights: WeightTable) -> Self {
        self.weights = weights;
        self
    }

    pub fn with_policy(mut self, policy: DecisionPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Evaluate as of a fixed time instead of the wall clock
    pub fn at(mut self, now_ms: i64) -> Self {
        self.now_ms = Some(now_ms);
        self
    }

    pub fn predicates(&self) -> &PredicateSet {
        &self.predicates
    }

    /// Evaluate a single input
    pub fn evaluate(&self, input: &EvaluateInput) -> EvaluationResult {
        let store = StatementStore::new(input.statements.clone());
        self.evaluate_in(&store, &input.target_statement_id)
    }

    /// Evaluate one target against an already indexed store
    pub fn evaluate_in(&self, store: &StatementStore, target_statement_id: &str) -> EvaluationResult {
        let target = match store.get(target_statement_id) {
            Some(t) if t.predicate_raw == self.predicates.equivalence => t,
            Some(t) => {
                debug!(
                    target_id = target_statement_id,
                    predicate = %t.predicate_raw,
                    "target is not an equivalence claim"
                );
                return EvaluationResult::unassessable(target_statement_id);
            }
            None => {
                debug!(target_id = target_statement_id, "target statement not found");
                return EvaluationResult::unassessable(target_statement_id);
            }
        };

        let now = self.now_ms.unwrap_or_else(now_ms);
        let ctx = EvidenceResolver::new(store, &self.predicates).resolve(target);

        let validity_intervals = reconcile(&ctx.valid_from, &ctx.valid_through, now);
        let has_any_valid_interval = has_any_valid_interval(&validity_intervals);

        let sub_metrics = self.weights.apply(metrics::evaluate_all(&ctx));
        let raw = raw_score(&sub_metrics);

        let evidence_ids: Vec<String> = sub_metrics
            .iter()
            .flat_map(|m| m.evidence_ids.iter().cloned())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        let signals = EvidenceSignals {
            has_valid_from: ctx.has_valid_from_evidence,
            has_valid_through: ctx.has_valid_through_evidence,
            every_valid_from_cited: ctx.has_citation_for_every_valid_from,
            every_valid_through_cited: ctx.has_citation_for_every_valid_through,
            evidence_count: evidence_ids.len(),
        };
        let confidence = confidence(&signals, &sub_metrics);
        let decision = self.policy.decide(
            &sub_metrics,
            ctx.has_citation_for_every_valid_from,
            raw,
            confidence,
        );
        let review_required = self.policy.review_required(decision, confidence);

        debug!(
            target_id = %target.id,
            %decision,
            raw_score = raw,
            confidence,
            intervals = validity_intervals.len(),
            "evaluated equivalence claim"
        );

        EvaluationResult {
            target_statement_id: target_statement_id.to_string(),
            same_as_statement: Some(target.clone()),
            valid_from_statements: ctx.valid_from,
            valid_through_statements: ctx.valid_through,
            citation_statements_by_valid_from: ctx.citations_by_valid_from,
            citation_statements_by_valid_through: ctx.citations_by_valid_through,
            has_valid_from_evidence: ctx.has_valid_from_evidence,
            has_valid_through_evidence: ctx.has_valid_through_evidence,
            has_citation_for_every_valid_from: ctx.has_citation_for_every_valid_from,
            has_citation_for_every_valid_through: ctx.has_citation_for_every_valid_through,
            validity_intervals,
            has_any_valid_interval,
            decision,
            score: normalize_score(raw),
            confidence,
            review_required,
            positive_evidence_count: sub_metrics
                .iter()
                .filter(|m| m.score > POSITIVE_SIGNAL)
                .count(),
            negative_evidence_count: sub_metrics
                .iter()
                .filter(|m| m.score < -POSITIVE_SIGNAL)
                .count(),
            sub_metrics,
            evidence_ids,
        }
    }

    /// Evaluate the named target, or every equivalence claim in store order.
    pub fn evaluate_all(&self, statements: Vec<Statement>, target: Option<&str>) -> Vec<EvaluationResult> {
        let store = StatementStore::new(statements);

        if let Some(target) = target {
            return vec![self.evaluate_in(&store, target)];
        }

        store
            .all()
            .iter()
            .filter(|s| s.predicate_raw == self.predicates.equivalence)
            .map(|candidate| self.evaluate_in(&store, &candidate.id))
            .collect()
    }
}

/// Top-level function: evaluate from JSON input, return JSON output.
/// Errors are reported as `{"error": ...}` rather than panicking.
pub fn evaluate_json(input: &str) -> String {
    let parsed: EvaluateInput = match serde_json::from_str(input) {
        Ok(v) => v,
        Err(e) => return error_json(&Error::InvalidInput(e.to_string())),
    };

    let result = Evaluator::new().evaluate(&parsed);

    match serde_json::to_string(&result) {
        Ok(json) => json,
        Err(e) => error_json(&Error::Serialization(e)),
    }
}

fn error_json(err: &Error) -> String {
    serde_json::json!({ "error": err.to_string() }).to_string()
}
