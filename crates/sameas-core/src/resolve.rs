//! Evidence resolution
//!
//! Gathers the statements relevant to one equivalence claim. Upstream producers
//! may reference a statement either by its computed id or by the composite raw
//! identifier that id was hashed from; both are treated as the same anchor
//! without recomputing anything.

use std::collections::BTreeMap;

use crate::predicates::PredicateSet;
use crate::statement::Statement;
use crate::store::StatementStore;

/// Per-evaluation evidence bundle. Built once, read-only afterwards.
#[derive(Debug)]
pub struct EvidenceContext<'a> {
    pub target: &'a Statement,
    pub store: &'a StatementStore,
    pub predicates: &'a PredicateSet,
    pub valid_from: Vec<Statement>,
    pub valid_through: Vec<Statement>,
    /// validFrom statement id -> citations, ordered by id
    pub citations_by_valid_from: BTreeMap<String, Vec<Statement>>,
    /// validThrough statement id -> citations, ordered by id
    pub citations_by_valid_through: BTreeMap<String, Vec<Statement>>,
    pub has_valid_from_evidence: bool,
    pub has_valid_through_evidence: bool,
    /// False when there is no validFrom evidence at all
    pub has_citation_for_every_valid_from: bool,
    /// False when there is no validThrough evidence at all
    pub has_citation_for_every_valid_through: bool,
}

/// Resolves evidence for a target statement against one store.
pub struct EvidenceResolver<'a> {
    store: &'a StatementStore,
    predicates: &'a PredicateSet,
}

impl<'a> EvidenceResolver<'a> {
    pub fn new(store: &'a StatementStore, predicates: &'a PredicateSet) -> Self {
        Self { store, predicates }
    }

    /// Statements under `predicate_raw` whose subject id is `anchor.id`, or
    /// whose subject raw identifier is `anchor.id` or its composite.
    pub fn related_to(&self, anchor: &Statement, predicate_raw: &str) -> Vec<Statement> {
        let raw = anchor.raw_identifier();
        self.store
            .find_related(&[anchor.id.as_str()], &[anchor.id.as_str(), raw.as_str()], predicate_raw)
            .into_iter()
            .cloned()
            .collect()
    }

    /// Build the evidence context for `target`.
    pub fn resolve(&self, target: &'a Statement) -> EvidenceContext<'a> {
        let p = self.predicates;
        let target_raw = target.raw_identifier();

        let valid_from = self.related_to(target, &p.valid_from);
        let valid_through = self.related_to(target, &p.valid_through);

        // Citations on the claim itself support every validFrom; either
        // subject field may name the claim by id or composite
        let mut citations_by_valid_from = BTreeMap::new();
        for vf in &valid_from {
            let vf_raw = vf.raw_identifier();
            let ids = [vf.id.as_str(), target.id.as_str(), target_raw.as_str()];
            let raws = [
                vf.id.as_str(),
                vf_raw.as_str(),
                target.id.as_str(),
                target_raw.as_str(),
            ];
            let citations: Vec<Statement> = self
                .store
                .find_related(&ids, &raws, &p.primary_source)
                .into_iter()
                .cloned()
                .collect();
            citations_by_valid_from.insert(vf.id.clone(), citations);
        }

        let mut citations_by_valid_through = BTreeMap::new();
        for vt in &valid_through {
            citations_by_valid_through.insert(vt.id.clone(), self.related_to(vt, &p.primary_source));
        }

        let has_valid_from_evidence = !valid_from.is_empty();
        let has_valid_through_evidence = !valid_through.is_empty();
        let has_citation_for_every_valid_from =
            has_valid_from_evidence && every_cited(&valid_from, &citations_by_valid_from);
        let has_citation_for_every_valid_through =
            has_valid_through_evidence && every_cited(&valid_through, &citations_by_valid_through);

        tracing::trace!(
            target_id = %target.id,
            valid_from = valid_from.len(),
            valid_through = valid_through.len(),
            "resolved evidence"
        );

        EvidenceContext {
            target,
            store: self.store,
            predicates: self.predicates,
            valid_from,
            valid_through,
            citations_by_valid_from,
            citations_by_valid_through,
            has_valid_from_evidence,
            has_valid_through_evidence,
            has_citation_for_every_valid_from,
            has_citation_for_every_valid_through,
        }
    }
}

fn every_cited(statements: &[Statement], citations: &BTreeMap<String, Vec<Statement>>) -> bool {
    statements
        .iter()
        .all(|s| citations.get(&s.id).is_some_and(|c| !c.is_empty()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::predicates::{OWL_SAME_AS, PROV_HAD_PRIMARY_SOURCE, SCHEMA_VALID_FROM, SCHEMA_VALID_THROUGH};
    use crate::statement::StatementBuilder;

    fn same_as() -> Statement {
        StatementBuilder::new()
            .subject("person:a")
            .predicate("pred:sameas")
            .predicate_raw(OWL_SAME_AS)
            .object("person:b")
            .build()
    }

    fn about(subject: &str, subject_raw: &str, predicate_raw: &str, object: &str) -> Statement {
        StatementBuilder::new()
            .subject(subject)
            .subject_raw(subject_raw)
            .predicate(format!("pred:{}", predicate_raw.len()))
            .predicate_raw(predicate_raw)
            .object(object)
            .object_raw(object)
            .build()
    }

    #[test]
    fn resolves_valid_from_through_all_aliases() {
        let target = same_as();
        let by_id = about(&target.id, "", SCHEMA_VALID_FROM, "2020-01-01");
        let by_raw_id = about("stmt:x", &target.id, SCHEMA_VALID_FROM, "2021-01-01");
        let by_composite = about("stmt:y", &target.raw_identifier(), SCHEMA_VALID_FROM, "2022-01-01");
        let unrelated = about("stmt:z", "", SCHEMA_VALID_FROM, "2023-01-01");
        let through = about(&target.id, "", SCHEMA_VALID_THROUGH, "2030-01-01");

        let store = StatementStore::new(vec![
            target.clone(),
            by_id.clone(),
            by_raw_id.clone(),
            by_composite.clone(),
            unrelated,
            through.clone(),
        ]);
        let predicates = PredicateSet::default();
        let resolver = EvidenceResolver::new(&store, &predicates);
        let target_ref = store.get(&target.id).unwrap();
        let ctx = resolver.resolve(target_ref);

        assert_eq!(ctx.valid_from, vec![by_id, by_raw_id, by_composite]);
        assert_eq!(ctx.valid_through, vec![through]);
        assert!(ctx.has_valid_from_evidence);
        assert!(ctx.has_valid_through_evidence);
        assert!(!ctx.has_citation_for_every_valid_from);
        assert!(!ctx.has_citation_for_every_valid_through);
    }

    #[test]
    fn composite_subject_id_is_not_an_alias() {
        let target = same_as();
        let misfiled = about(&target.raw_identifier(), "zzz", SCHEMA_VALID_FROM, "2020-01-01");
        let misfiled_through = about(&target.raw_identifier(), "", SCHEMA_VALID_THROUGH, "2030-01-01");

        let store = StatementStore::new(vec![target.clone(), misfiled, misfiled_through]);
        let predicates = PredicateSet::default();
        let ctx = EvidenceResolver::new(&store, &predicates).resolve(store.get(&target.id).unwrap());

        assert!(ctx.valid_from.is_empty());
        assert!(ctx.valid_through.is_empty());
        assert!(!ctx.has_valid_from_evidence);
    }

    #[test]
    fn valid_from_citation_may_name_target_composite_as_subject_id() {
        let target = same_as();
        let vf = about(&target.id, "", SCHEMA_VALID_FROM, "2020-01-01");
        let cite = about(&target.raw_identifier(), "zzz", PROV_HAD_PRIMARY_SOURCE, "doc:1");
        let stray = about(&vf.raw_identifier(), "zzz", PROV_HAD_PRIMARY_SOURCE, "doc:2");

        let store = StatementStore::new(vec![target.clone(), vf.clone(), cite.clone(), stray]);
        let predicates = PredicateSet::default();
        let ctx = EvidenceResolver::new(&store, &predicates).resolve(store.get(&target.id).unwrap());

        assert_eq!(ctx.citations_by_valid_from[&vf.id], vec![cite]);
        assert!(ctx.has_citation_for_every_valid_from);
    }

    #[test]
    fn citations_attach_to_valid_from_or_target() {
        let target = same_as();
        let vf1 = about(&target.id, "", SCHEMA_VALID_FROM, "2020-01-01");
        let vf2 = about(&target.id, "", SCHEMA_VALID_FROM, "2021-01-01");
        let cite_vf1 = about(&vf1.id, "", PROV_HAD_PRIMARY_SOURCE, "doc:1");
        let cite_target = about("stmt:c", &target.raw_identifier(), PROV_HAD_PRIMARY_SOURCE, "doc:2");

        let store = StatementStore::new(vec![
            target.clone(),
            vf1.clone(),
            vf2.clone(),
            cite_vf1.clone(),
            cite_target.clone(),
        ]);
        let predicates = PredicateSet::default();
        let resolver = EvidenceResolver::new(&store, &predicates);
        let ctx = resolver.resolve(store.get(&target.id).unwrap());

        assert_eq!(
            ctx.citations_by_valid_from[&vf1.id],
            vec![cite_vf1, cite_target.clone()]
        );
        assert_eq!(ctx.citations_by_valid_from[&vf2.id], vec![cite_target]);
        assert!(ctx.has_citation_for_every_valid_from);
    }

    #[test]
    fn valid_through_citations_do_not_use_target() {
        let target = same_as();
        let vt = about(&target.id, "", SCHEMA_VALID_THROUGH, "2030-01-01");
        let cite_target = about(&target.id, "", PROV_HAD_PRIMARY_SOURCE, "doc:1");

        let store = StatementStore::new(vec![target.clone(), vt.clone(), cite_target]);
        let predicates = PredicateSet::default();
        let resolver = EvidenceResolver::new(&store, &predicates);
        let ctx = resolver.resolve(store.get(&target.id).unwrap());

        assert!(ctx.citations_by_valid_through[&vt.id].is_empty());
        assert!(!ctx.has_citation_for_every_valid_through);
    }

    #[test]
    fn empty_evidence() {
        let target = same_as();
        let store = StatementStore::new(vec![target.clone()]);
        let predicates = PredicateSet::default();
        let ctx = EvidenceResolver::new(&store, &predicates).resolve(store.get(&target.id).unwrap());

        assert!(!ctx.has_valid_from_evidence);
        assert!(!ctx.has_citation_for_every_valid_from);
        assert!(ctx.citations_by_valid_from.is_empty());
    }
}
