//! Statement type definitions

use serde::{Deserialize, Serialize};

use super::id::{raw_identifier, statement_id};

/// A statement - one directed, labeled edge of the knowledge graph.
///
/// Opaque identifiers (`*_id`) are what producers mint; raw identifiers
/// (`*_raw`) are the human-readable forms. Predicates are always matched on
/// `predicate_raw`, never on `predicate_id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Statement {
    /// Derived from (subject_id, predicate_id, object_id), see [`statement_id`]
    pub id: String,

    pub subject_id: String,

    /// Raw subject identifier; may name another statement by id or composite
    #[serde(default)]
    pub subject_raw: String,

    pub predicate_id: String,

    /// Canonical URI-like predicate (e.g. `https://schema.org/validFrom`)
    #[serde(default)]
    pub predicate_raw: String,

    pub object_id: String,

    /// Literal value or raw identifier of the object
    #[serde(default)]
    pub object_raw: String,
}

impl Statement {
    /// The composite `subject|predicate|object` identifier this statement's
    /// id is hashed from. Other statements may reference this one by it.
    pub fn raw_identifier(&self) -> String {
        raw_identifier(&self.subject_id, &self.predicate_id, &self.object_id)
    }

    /// Whether the opaque subject id is one of `ids` or the subject raw
    /// identifier is one of `raws`. The two fields are never cross-matched.
    pub fn subject_matches(&self, ids: &[&str], raws: &[&str]) -> bool {
        ids.contains(&self.subject_id.as_str()) || raws.contains(&self.subject_raw.as_str())
    }
}

/// Builder for creating statements with a derived id
#[derive(Debug, Default)]
pub struct StatementBuilder {
    subject_id: String,
    subject_raw: String,
    predicate_id: String,
    predicate_raw: String,
    object_id: String,
    object_raw: String,
    id: Option<String>,
}

impl StatementBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the derived id (producers occasionally ship their own)
    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn subject(mut self, id: impl Into<String>) -> Self {
        self.subject_id = id.into();
        self
    }

    pub fn subject_raw(mut self, raw: impl Into<String>) -> Self {
        self.subject_raw = raw.into();
        self
    }

    pub fn predicate(mut self, id: impl Into<String>) -> Self {
        self.predicate_id = id.into();
        self
    }

    pub fn predicate_raw(mut self, raw: impl Into<String>) -> Self {
        self.predicate_raw = raw.into();
        self
    }

    pub fn object(mut self, id: impl Into<String>) -> Self {
        self.object_id = id.into();
        self
    }

    pub fn object_raw(mut self, raw: impl Into<String>) -> Self {
        self.object_raw = raw.into();
        self
    }

    pub fn build(self) -> Statement {
        let id = self
            .id
            .unwrap_or_else(|| statement_id(&self.subject_id, &self.predicate_id, &self.object_id));
        Statement {
            id,
            subject_id: self.subject_id,
            subject_raw: self.subject_raw,
            predicate_id: self.predicate_id,
            predicate_raw: self.predicate_raw,
            object_id: self.object_id,
            object_raw: self.object_raw,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_derives_id() {
        let s = StatementBuilder::new()
            .subject("person:alice")
            .predicate("pred:name")
            .predicate_raw("https://schema.org/name")
            .object("lit:alice")
            .object_raw("Alice")
            .build();

        assert_eq!(s.id, statement_id("person:alice", "pred:name", "lit:alice"));
        assert_eq!(s.raw_identifier(), "person:alice|pred:name|lit:alice");
        assert_eq!(s.object_raw, "Alice");
    }

    #[test]
    fn test_builder_explicit_id() {
        let s = StatementBuilder::new().id("st-1").subject("a").build();
        assert_eq!(s.id, "st-1");
    }

    #[test]
    fn test_subject_matches() {
        let s = StatementBuilder::new()
            .subject("stmt:abc")
            .subject_raw("a|p|b")
            .build();

        assert!(s.subject_matches(&["stmt:abc"], &[]));
        assert!(s.subject_matches(&[], &["x", "a|p|b"]));
        assert!(!s.subject_matches(&["a|p|b"], &["stmt:abc"]));
        assert!(!s.subject_matches(&["stmt:other"], &["stmt:other"]));
        assert!(!s.subject_matches(&[], &[]));
    }

    #[test]
    fn test_json_field_names() {
        let json = serde_json::json!({
            "id": "st-1",
            "subjectId": "s",
            "predicateId": "p",
            "predicateRaw": "https://schema.org/name",
            "objectId": "o"
        });
        let s: Statement = serde_json::from_value(json).unwrap();
        assert_eq!(s.subject_raw, "");
        assert_eq!(s.predicate_raw, "https://schema.org/name");

        let back = serde_json::to_value(&s).unwrap();
        assert_eq!(back["objectRaw"], "");
        assert_eq!(back["subjectId"], "s");
    }
}
