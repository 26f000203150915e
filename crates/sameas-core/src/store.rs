//! Immutable statement store
//!
//! An ordered collection of statements supplied wholesale per evaluation.
//! Lookups by statement id, subject id and subject raw identifier are indexed
//! once at construction; nothing is ever inserted or removed later.

use ahash::AHashMap;

use crate::statement::Statement;

/// Read-only statement collection with subject and id indexes.
#[derive(Debug, Default)]
pub struct StatementStore {
    statements: Vec<Statement>,
    by_id: AHashMap<String, usize>,
    /// Subject id -> positions, ascending
    by_subject_id: AHashMap<String, Vec<usize>>,
    /// Subject raw identifier -> positions, ascending
    by_subject_raw: AHashMap<String, Vec<usize>>,
}

impl StatementStore {
    /// Index a batch of statements, keeping their order.
    ///
    /// If two statements share an id, lookups by id return the later one.
    pub fn new(statements: Vec<Statement>) -> Self {
        let mut by_id = AHashMap::with_capacity(statements.len());
        let mut by_subject_id: AHashMap<String, Vec<usize>> = AHashMap::new();
        let mut by_subject_raw: AHashMap<String, Vec<usize>> = AHashMap::new();

        for (pos, statement) in statements.iter().enumerate() {
            by_id.insert(statement.id.clone(), pos);
            by_subject_id
                .entry(statement.subject_id.clone())
                .or_default()
                .push(pos);
            if !statement.subject_raw.is_empty() {
                by_subject_raw
                    .entry(statement.subject_raw.clone())
                    .or_default()
                    .push(pos);
            }
        }

        Self {
            statements,
            by_id,
            by_subject_id,
            by_subject_raw,
        }
    }

    pub fn get(&self, id: &str) -> Option<&Statement> {
        self.by_id.get(id).map(|&pos| &self.statements[pos])
    }

    pub fn all(&self) -> &[Statement] {
        &self.statements
    }

    pub fn len(&self) -> usize {
        self.statements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.statements.is_empty()
    }

    /// Statements whose subject id is one of `ids` or whose subject raw
    /// identifier is one of `raws`, with raw predicate `predicate_raw`, in
    /// store order.
    ///
    /// Same result as [`find_related`] over [`StatementStore::all`], without
    /// rescanning the whole collection.
    pub fn find_related(&self, ids: &[&str], raws: &[&str], predicate_raw: &str) -> Vec<&Statement> {
        let by_id = ids.iter().filter_map(|id| self.by_subject_id.get(*id));
        let by_raw = raws.iter().filter_map(|raw| self.by_subject_raw.get(*raw));

        let mut positions: Vec<usize> = by_id.chain(by_raw).flatten().copied().collect();
        positions.sort_unstable();
        positions.dedup();

        positions
            .into_iter()
            .map(|pos| &self.statements[pos])
            .filter(|s| s.predicate_raw == predicate_raw)
            .collect()
    }

    /// Statements with the given raw predicate whose opaque subject id is
    /// `subject_id`, in store order.
    pub fn by_subject_id(&self, subject_id: &str, predicate_raw: &str) -> Vec<&Statement> {
        self.by_subject_id
            .get(subject_id)
            .into_iter()
            .flatten()
            .map(|&pos| &self.statements[pos])
            .filter(|s| s.predicate_raw == predicate_raw)
            .collect()
    }
}

/// Reference filter: linear scan of `statements` under `predicate_raw` for
/// subject ids in `ids` or subject raw identifiers in `raws`.
pub fn find_related<'a>(
    statements: &'a [Statement],
    ids: &[&str],
    raws: &[&str],
    predicate_raw: &str,
) -> Vec<&'a Statement> {
    statements
        .iter()
        .filter(|s| s.predicate_raw == predicate_raw && s.subject_matches(ids, raws))
        .collect()
}
