//! Explicit contradiction check

use super::{collect_unique_ids, Metric, MetricDraft};
use crate::resolve::EvidenceContext;

/// -1 when a differentFrom statement links the same pair in either direction,
/// otherwise 0. Never positive.
pub fn explicit_contradiction(ctx: &EvidenceContext<'_>) -> MetricDraft {
    let metric = Metric::ExplicitContradiction;
    let (a, b) = (&ctx.target.subject_id, &ctx.target.object_id);

    let contradictions: Vec<&str> = ctx
        .store
        .all()
        .iter()
        .filter(|s| {
            s.predicate_raw == ctx.predicates.different_from
                && ((&s.subject_id == a && &s.object_id == b)
                    || (&s.subject_id == b && &s.object_id == a))
        })
        .map(|s| s.id.as_str())
        .collect();

    if contradictions.is_empty() {
        return metric.draft(0.0, Vec::new(), "No explicit contradiction found.");
    }

    metric.draft(
        -1.0,
        collect_unique_ids(contradictions),
        "Found explicit differentFrom contradiction for the same pair.",
    )
}
