//! Name alignment heuristic

use std::collections::BTreeSet;

use super::{collect_unique_ids, normalize_text, Metric, MetricDraft};
use crate::resolve::EvidenceContext;
use crate::statement::Statement;

/// Compare normalized name values asserted for each side of the pair.
///
/// | names                       | score |
/// |-----------------------------|-------|
/// | neither side                | 0     |
/// | both sides, some overlap    | +1    |
/// | both sides, no overlap      | -1    |
/// | one side only               | -0.2  |
pub fn name_alignment(ctx: &EvidenceContext<'_>) -> MetricDraft {
    let metric = Metric::NameAlignment;
    let name = ctx.predicates.name.as_str();
    let names_a = ctx.store.by_subject_id(&ctx.target.subject_id, name);
    let names_b = ctx.store.by_subject_id(&ctx.target.object_id, name);

    let set_a = normalized_names(&names_a);
    let set_b = normalized_names(&names_b);

    let evidence = collect_unique_ids(
        names_a
            .iter()
            .chain(names_b.iter())
            .map(|s| s.id.as_str()),
    );

    if set_a.is_empty() && set_b.is_empty() {
        return metric.draft(
            0.0,
            evidence,
            "No comparable name statements found for either side.",
        );
    }

    if let Some(shared) = set_a.intersection(&set_b).next() {
        return metric.draft(
            1.0,
            evidence,
            format!("Overlapping name value found ({}).", shared),
        );
    }

    if !set_a.is_empty() && !set_b.is_empty() {
        return metric.draft(
            -1.0,
            evidence,
            "Both sides have name values but none overlap.",
        );
    }

    metric.draft(-0.2, evidence, "Only one side has name evidence.")
}

fn normalized_names(names: &[&Statement]) -> BTreeSet<String> {
    names
        .iter()
        .map(|s| normalize_text(&s.object_raw))
        .filter(|n| !n.is_empty())
        .collect()
}
