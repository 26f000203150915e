//! Scoring heuristics
//!
//! Four independent, stateless evaluators. Each reads the shared
//! [`EvidenceContext`] and produces a signed score with its supporting
//! statement ids and a rationale:
//!
//! - **Name alignment**: do both sides carry a matching name?
//! - **Affiliation overlap**: do both sides share an organization?
//! - **Citation chain**: is every validFrom backed by a primary source?
//! - **Explicit contradiction**: is the pair asserted to be different?
//!
//! Evaluators always run; missing evidence yields a neutral or mildly
//! negative score, never an error. Order of evaluation does not matter.

mod affiliation;
mod citation;
mod contradiction;
mod name;

use ahash::AHashSet;
use serde::{Deserialize, Serialize};

use crate::resolve::EvidenceContext;

pub use affiliation::affiliation_overlap;
pub use citation::citation_chain;
pub use contradiction::explicit_contradiction;
pub use name::name_alignment;

/// Output of one evaluator, before weighting
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricDraft {
    /// Stable identifier, also the weight-table key
    pub key: String,
    pub label: String,
    /// Conventionally in [-1, 1]; not clamped here
    pub score: f64,
    /// Supporting statement ids, unique, in first-seen order
    pub evidence_ids: Vec<String>,
    pub reason: String,
}

/// The closed set of evaluators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    NameAlignment,
    AffiliationOverlap,
    CitationChain,
    ExplicitContradiction,
}

impl Metric {
    /// Every evaluator, in reporting order
    pub const ALL: [Metric; 4] = [
        Metric::NameAlignment,
        Metric::AffiliationOverlap,
        Metric::CitationChain,
        Metric::ExplicitContradiction,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            Self::NameAlignment => "name_alignment",
            Self::AffiliationOverlap => "affiliation_overlap",
            Self::CitationChain => "citation_chain",
            Self::ExplicitContradiction => "explicit_contradiction",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::NameAlignment => "Name Alignment",
            Self::AffiliationOverlap => "Affiliation Overlap",
            Self::CitationChain => "Citation Chain Completeness",
            Self::ExplicitContradiction => "Explicit Contradiction",
        }
    }

    pub fn evaluate(&self, ctx: &EvidenceContext<'_>) -> MetricDraft {
        match self {
            Self::NameAlignment => name_alignment(ctx),
            Self::AffiliationOverlap => affiliation_overlap(ctx),
            Self::CitationChain => citation_chain(ctx),
            Self::ExplicitContradiction => explicit_contradiction(ctx),
        }
    }

    pub(crate) fn draft(&self, score: f64, evidence_ids: Vec<String>, reason: impl Into<String>) -> MetricDraft {
        MetricDraft {
            key: self.key().to_string(),
            label: self.label().to_string(),
            score,
            evidence_ids,
            reason: reason.into(),
        }
    }
}

impl std::fmt::Display for Metric {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.key())
    }
}

/// Run every evaluator against one context
pub fn evaluate_all(ctx: &EvidenceContext<'_>) -> Vec<MetricDraft> {
    Metric::ALL.iter().map(|m| m.evaluate(ctx)).collect()
}

/// Case-fold, trim and collapse internal whitespace.
pub fn normalize_text(value: &str) -> String {
    value
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Deduplicate ids, preserving first-seen order.
pub fn collect_unique_ids<'a>(ids: impl IntoIterator<Item = &'a str>) -> Vec<String> {
    let mut seen = AHashSet::new();
    let mut unique = Vec::new();

    for id in ids {
        if seen.insert(id) {
            unique.push(id.to_string());
        }
    }

    unique
}
