//! Score aggregation, confidence and decision policy
//!
//! Weighted mean of the metric scores, mapped from [-1, 1] onto [0, 1] for
//! presentation. Confidence is additive over evidence-completeness signals:
//!
//! - floor 0.35
//! - +0.15 validFrom evidence, +0.05 validThrough evidence
//! - +0.15 every validFrom cited, +0.05 every validThrough cited
//! - +0.02 per distinct evidence statement (max +0.20)
//! - +0.05 per metric with |score| >= 0.5 (max +0.15)
//!
//! The decision is an ordered policy; the first matching rule wins.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::metrics::{Metric, MetricDraft};

/// Final categorical verdict
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Decision {
    Same,
    Different,
    Uncertain,
}

impl std::fmt::Display for Decision {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Same => write!(f, "same"),
            Self::Different => write!(f, "different"),
            Self::Uncertain => write!(f, "uncertain"),
        }
    }
}

/// A metric result with its weight applied
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricResult {
    pub key: String,
    pub label: String,
    pub score: f64,
    pub weight: f64,
    /// score × weight
    pub contribution: f64,
    pub evidence_ids: Vec<String>,
    pub reason: String,
}

/// Fixed per-metric weights, keyed by metric key
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightTable {
    pub weights: BTreeMap<String, f64>,
    /// Weight for keys missing from `weights`
    pub fallback: f64,
}

impl Default for WeightTable {
    fn default() -> Self {
        let weights = [
            (Metric::NameAlignment, 0.25),
            (Metric::AffiliationOverlap, 0.20),
            (Metric::CitationChain, 0.20),
            (Metric::ExplicitContradiction, 0.45),
        ]
        .into_iter()
        .map(|(m, w)| (m.key().to_string(), w))
        .collect();

        Self {
            weights,
            fallback: 0.10,
        }
    }
}

impl WeightTable {
    pub fn weight(&self, key: &str) -> f64 {
        self.weights.get(key).copied().unwrap_or(self.fallback)
    }

    /// Attach weights and contributions to raw metric drafts
    pub fn apply(&self, drafts: Vec<MetricDraft>) -> Vec<MetricResult> {
        drafts
            .into_iter()
            .map(|d| {
                let weight = self.weight(&d.key);
                MetricResult {
                    contribution: d.score * weight,
                    key: d.key,
                    label: d.label,
                    score: d.score,
                    weight,
                    evidence_ids: d.evidence_ids,
                    reason: d.reason,
                }
            })
            .collect()
    }
}

/// Thresholds of the decision policy and the review gate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionPolicy {
    /// Contradiction score at or below which the verdict is `different`
    pub contradiction_override: f64,
    /// Name score at or above which a fully cited claim is `same`
    pub name_shortcut: f64,
    /// Affiliation score at or above which a fully cited claim is `same`
    pub affiliation_shortcut: f64,
    pub same_raw_score: f64,
    pub different_raw_score: f64,
    /// Minimum confidence for the raw-score rules
    pub min_confidence: f64,
    /// `same` verdicts below this confidence still require review
    pub review_confidence: f64,
}

impl Default for DecisionPolicy {
    fn default() -> Self {
        Self {
            contradiction_override: -1.0,
            name_shortcut: 1.0,
            affiliation_shortcut: 0.8,
            same_raw_score: 0.55,
            different_raw_score: -0.35,
            min_confidence: 0.55,
            review_confidence: 0.7,
        }
    }
}

/// Evidence-completeness signals consumed by the confidence estimate
#[derive(Debug, Clone, Copy, Default)]
pub struct EvidenceSignals {
    pub has_valid_from: bool,
    pub has_valid_through: bool,
    pub every_valid_from_cited: bool,
    pub every_valid_through_cited: bool,
    /// Distinct statement ids across all metrics
    pub evidence_count: usize,
}

const CONFIDENCE_FLOOR: f64 = 0.35;
const EVIDENCE_STEP: f64 = 0.02;
const EVIDENCE_CAP: f64 = 0.20;
const SIGNAL_STEP: f64 = 0.05;
const SIGNAL_CAP: f64 = 0.15;
const STRONG_SIGNAL: f64 = 0.5;

pub fn clamp(value: f64, min: f64, max: f64) -> f64 {
    value.max(min).min(max)
}

/// Σ(score·weight) / Σ(weight), with an empty/zero weight sum treated as 1
pub fn raw_score(metrics: &[MetricResult]) -> f64 {
    let total_weight: f64 = metrics.iter().map(|m| m.weight).sum();
    let total_weight = if total_weight == 0.0 { 1.0 } else { total_weight };
    metrics.iter().map(|m| m.contribution).sum::<f64>() / total_weight
}

/// Map a raw score in [-1, 1] onto [0, 1]
pub fn normalize_score(raw: f64) -> f64 {
    clamp((raw + 1.0) / 2.0, 0.0, 1.0)
}

pub fn confidence(signals: &EvidenceSignals, metrics: &[MetricResult]) -> f64 {
    let flag = |set: bool, bonus: f64| if set { bonus } else { 0.0 };
    let strong = metrics
        .iter()
        .filter(|m| m.score.abs() >= STRONG_SIGNAL)
        .count();

    clamp(
        CONFIDENCE_FLOOR
            + flag(signals.has_valid_from, 0.15)
            + flag(signals.has_valid_through, 0.05)
            + flag(signals.every_valid_from_cited, 0.15)
            + flag(signals.every_valid_through_cited, 0.05)
            + (signals.evidence_count as f64 * EVIDENCE_STEP).min(EVIDENCE_CAP)
            + (strong as f64 * SIGNAL_STEP).min(SIGNAL_CAP),
        0.0,
        1.0,
    )
}

fn score_of(metrics: &[MetricResult], metric: Metric) -> Option<f64> {
    metrics
        .iter()
        .find(|m| m.key == metric.key())
        .map(|m| m.score)
}

impl DecisionPolicy {
    /// Apply the ordered policy
    pub fn decide(
        &self,
        metrics: &[MetricResult],
        every_valid_from_cited: bool,
        raw: f64,
        confidence: f64,
    ) -> Decision {
        let contradiction = score_of(metrics, Metric::ExplicitContradiction);
        let name = score_of(metrics, Metric::NameAlignment).unwrap_or(0.0);
        let affiliation = score_of(metrics, Metric::AffiliationOverlap).unwrap_or(0.0);

        if contradiction.is_some_and(|s| s <= self.contradiction_override) {
            Decision::Different
        } else if every_valid_from_cited
            && (name >= self.name_shortcut || affiliation >= self.affiliation_shortcut)
        {
            Decision::Same
        } else if raw >= self.same_raw_score && confidence >= self.min_confidence {
            Decision::Same
        } else if raw <= self.different_raw_score && confidence >= self.min_confidence {
            Decision::Different
        } else {
            Decision::Uncertain
        }
    }

    pub fn review_required(&self, decision: Decision, confidence: f64) -> bool {
        decision != Decision::Same || confidence < self.review_confidence
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    fn result(metric: Metric, score: f64) -> MetricResult {
        let table = WeightTable::default();
        let weight = table.weight(metric.key());
        MetricResult {
            key: metric.key().to_string(),
            label: metric.label().to_string(),
            score,
            weight,
            contribution: score * weight,
            evidence_ids: Vec::new(),
            reason: String::new(),
        }
    }

    fn metrics(name: f64, affiliation: f64, citation: f64, contradiction: f64) -> Vec<MetricResult> {
        vec![
            result(Metric::NameAlignment, name),
            result(Metric::AffiliationOverlap, affiliation),
            result(Metric::CitationChain, citation),
            result(Metric::ExplicitContradiction, contradiction),
        ]
    }

    #[test]
    fn default_weights_and_fallback() {
        let table = WeightTable::default();
        assert_eq!(table.weight("name_alignment"), 0.25);
        assert_eq!(table.weight("explicit_contradiction"), 0.45);
        assert_eq!(table.weight("some_future_metric"), 0.10);
    }

    #[test]
    fn apply_computes_contribution() {
        let table = WeightTable::default();
        let drafts = vec![MetricDraft {
            key: "citation_chain".into(),
            label: "Citation Chain Completeness".into(),
            score: -0.5,
            evidence_ids: vec!["x".into()],
            reason: "r".into(),
        }];
        let applied = table.apply(drafts);
        assert!((applied[0].contribution - (-0.1)).abs() < EPS);
        assert_eq!(applied[0].evidence_ids, vec!["x".to_string()]);
    }

    #[test]
    fn raw_score_is_weighted_mean() {
        // (1*0.25 + 0 + 1*0.2 + 0) / 1.1
        let m = metrics(1.0, 0.0, 1.0, 0.0);
        assert!((raw_score(&m) - 0.45 / 1.1).abs() < EPS);
        assert_eq!(raw_score(&[]), 0.0);
    }

    #[test]
    fn normalized_score_is_clamped() {
        assert_eq!(normalize_score(-1.0), 0.0);
        assert_eq!(normalize_score(0.0), 0.5);
        assert_eq!(normalize_score(1.0), 1.0);
        assert_eq!(normalize_score(3.0), 1.0);
        assert_eq!(normalize_score(-3.0), 0.0);
    }

    #[test]
    fn confidence_floor_and_caps() {
        let none = EvidenceSignals::default();
        assert!((confidence(&none, &metrics(0.0, 0.0, -0.2, 0.0)) - 0.35).abs() < EPS);

        let all = EvidenceSignals {
            has_valid_from: true,
            has_valid_through: true,
            every_valid_from_cited: true,
            every_valid_through_cited: true,
            evidence_count: 50,
        };
        // 0.35 + 0.4 + 0.2 + 0.15 = 1.1, clamped
        assert_eq!(confidence(&all, &metrics(1.0, 0.8, 1.0, -1.0)), 1.0);

        let some = EvidenceSignals {
            has_valid_from: true,
            evidence_count: 3,
            ..Default::default()
        };
        // 0.35 + 0.15 + 0.06 + 0.05 (one strong metric)
        assert!((confidence(&some, &metrics(1.0, 0.0, -0.2, 0.0)) - 0.61).abs() < EPS);
    }

    #[test]
    fn contradiction_overrides_everything() {
        let policy = DecisionPolicy::default();
        let m = metrics(1.0, 0.8, 1.0, -1.0);
        assert_eq!(policy.decide(&m, true, 0.9, 1.0), Decision::Different);
    }

    #[test]
    fn cited_name_match_is_same() {
        let policy = DecisionPolicy::default();
        let m = metrics(1.0, 0.0, 1.0, 0.0);
        assert_eq!(policy.decide(&m, true, 0.1, 0.1), Decision::Same);
        // Not cited: falls through to the raw-score rules
        assert_eq!(policy.decide(&m, false, 0.1, 0.1), Decision::Uncertain);
    }

    #[test]
    fn cited_affiliation_match_is_same() {
        let policy = DecisionPolicy::default();
        let m = metrics(-1.0, 0.8, 1.0, 0.0);
        assert_eq!(policy.decide(&m, true, -0.5, 0.9), Decision::Same);
    }

    #[test]
    fn raw_score_rules_need_confidence() {
        let policy = DecisionPolicy::default();
        let m = metrics(0.0, 0.0, 0.0, 0.0);
        assert_eq!(policy.decide(&m, false, 0.55, 0.55), Decision::Same);
        assert_eq!(policy.decide(&m, false, 0.55, 0.54), Decision::Uncertain);
        assert_eq!(policy.decide(&m, false, -0.35, 0.55), Decision::Different);
        assert_eq!(policy.decide(&m, false, -0.34, 0.9), Decision::Uncertain);
    }

    #[test]
    fn missing_metrics_default_to_neutral() {
        let policy = DecisionPolicy::default();
        assert_eq!(policy.decide(&[], true, 0.0, 1.0), Decision::Uncertain);
    }

    #[test]
    fn review_gate() {
        let policy = DecisionPolicy::default();
        assert!(policy.review_required(Decision::Uncertain, 1.0));
        assert!(policy.review_required(Decision::Different, 1.0));
        assert!(policy.review_required(Decision::Same, 0.69));
        assert!(!policy.review_required(Decision::Same, 0.7));
    }

    #[test]
    fn decision_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Decision::Uncertain).unwrap(), "\"uncertain\"");
        assert_eq!(Decision::Same.to_string(), "same");
    }
}
