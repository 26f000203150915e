//! Citation-chain completeness

use super::{collect_unique_ids, Metric, MetricDraft};
use crate::resolve::EvidenceContext;

/// +1 when every validFrom has a primary source, -0.5 when some lack one,
/// -0.2 when there is no validFrom evidence at all.
pub fn citation_chain(ctx: &EvidenceContext<'_>) -> MetricDraft {
    let metric = Metric::CitationChain;
    // validFrom ids, then their citations, both in validFrom order
    let citations = ctx
        .valid_from
        .iter()
        .filter_map(|vf| ctx.citations_by_valid_from.get(&vf.id))
        .flatten();
    let evidence = collect_unique_ids(
        ctx.valid_from
            .iter()
            .chain(citations)
            .map(|s| s.id.as_str()),
    );

    if ctx.has_citation_for_every_valid_from {
        return metric.draft(1.0, evidence, "Every validFrom statement has at least one citation.");
    }

    if ctx.has_valid_from_evidence {
        return metric.draft(
            -0.5,
            evidence,
            "Some validFrom statements are missing citation support.",
        );
    }

    metric.draft(-0.2, evidence, "No validFrom/citation chain found for this statement.")
}
