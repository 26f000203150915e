//! Affiliation overlap heuristic

use std::collections::BTreeSet;

use super::{collect_unique_ids, Metric, MetricDraft};
use crate::resolve::EvidenceContext;
use crate::statement::Statement;

/// Compare the organizations each side works for / is a member of.
///
/// Shared target: +0.8. Both sides affiliated, disjoint: -0.6.
/// One side only: -0.1. Neither: 0.
pub fn affiliation_overlap(ctx: &EvidenceContext<'_>) -> MetricDraft {
    let metric = Metric::AffiliationOverlap;
    let rel_a = affiliations_of(ctx, &ctx.target.subject_id);
    let rel_b = affiliations_of(ctx, &ctx.target.object_id);

    let set_a: BTreeSet<&str> = rel_a.iter().map(|s| s.object_id.as_str()).collect();
    let set_b: BTreeSet<&str> = rel_b.iter().map(|s| s.object_id.as_str()).collect();

    let evidence = collect_unique_ids(rel_a.iter().chain(rel_b.iter()).map(|s| s.id.as_str()));

    if set_a.is_empty() && set_b.is_empty() {
        return metric.draft(0.0, evidence, "No affiliation predicates found for either side.");
    }

    if set_a.intersection(&set_b).next().is_some() {
        return metric.draft(
            0.8,
            evidence,
            "Shared affiliation target found between both sides.",
        );
    }

    if !set_a.is_empty() && !set_b.is_empty() {
        return metric.draft(
            -0.6,
            evidence,
            "Affiliation evidence exists on both sides with no overlap.",
        );
    }

    metric.draft(-0.1, evidence, "Affiliation evidence exists only on one side.")
}

fn affiliations_of<'a>(ctx: &EvidenceContext<'a>, subject_id: &str) -> Vec<&'a Statement> {
    ctx.store
        .all()
        .iter()
        .filter(|s| s.subject_id == subject_id && ctx.predicates.is_affiliation(&s.predicate_raw))
        .collect()
}
