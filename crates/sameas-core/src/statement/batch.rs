//! Newline-delimited statement batches.
//!
//! Each non-blank line is an independent JSON record
//! `{"s": .., "p": .., "o": .., "sr"?: .., "pr"?: .., "or"?: ..}` carrying the
//! opaque subject/predicate/object ids and their optional raw forms.

use serde::Deserialize;

use super::id::{statement_id, validate_identifier};
use super::types::Statement;
use crate::error::{Error, Result};
use crate::predicates::PredicateSet;

#[derive(Debug, Deserialize)]
struct RawStatementLine {
    s: serde_json::Value,
    p: serde_json::Value,
    o: serde_json::Value,
    #[serde(default)]
    sr: Option<String>,
    #[serde(default)]
    pr: Option<String>,
    #[serde(default)]
    or: Option<String>,
}

/// Parse a batch into statements, in line order.
///
/// Fails on the first malformed line; the line number in the error is 1-based
/// and counts blank lines.
pub fn parse_batch(text: &str, predicates: &PredicateSet) -> Result<Vec<Statement>> {
    let known = predicates.known_predicate_ids();
    let mut statements = Vec::new();

    for (idx, line) in text.lines().enumerate() {
        let line_no = idx + 1;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let raw: RawStatementLine =
            serde_json::from_str(line).map_err(|e| Error::InvalidStatementLine {
                line: line_no,
                reason: e.to_string(),
            })?;

        let (s, p, o) = match (raw.s.as_str(), raw.p.as_str(), raw.o.as_str()) {
            (Some(s), Some(p), Some(o)) => (s, p, o),
            _ => {
                return Err(Error::InvalidStatementLine {
                    line: line_no,
                    reason: "expected keys s,p,o as strings (sr/pr/or optional)".to_string(),
                })
            }
        };

        for value in [s, p, o] {
            validate_identifier(value).map_err(|e| Error::InvalidStatementLine {
                line: line_no,
                reason: e.to_string(),
            })?;
        }

        let predicate_raw = match raw.pr {
            Some(pr) if !pr.is_empty() => pr,
            _ => known.get(p).cloned().unwrap_or_default(),
        };

        statements.push(Statement {
            id: statement_id(s, p, o),
            subject_id: s.to_string(),
            subject_raw: raw.sr.unwrap_or_default(),
            predicate_id: p.to_string(),
            predicate_raw,
            object_id: o.to_string(),
            object_raw: raw.or.unwrap_or_default(),
        });
    }

    Ok(statements)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::predicates::{SCHEMA_NAME, SCHEMA_VALID_FROM};
    use crate::statement::predicate_id;

    #[test]
    fn parses_lines_and_skips_blanks() {
        let text = format!(
            "{}\n\n  {}  \n",
            r#"{"s":"person:a","p":"pred:x","o":"lit:1","sr":"Alice","pr":"https://schema.org/name","or":"Alice"}"#,
            r#"{"s":"person:b","p":"pred:y","o":"lit:2"}"#
        );
        let statements = parse_batch(&text, &PredicateSet::default()).unwrap();

        assert_eq!(statements.len(), 2);
        assert_eq!(statements[0].predicate_raw, SCHEMA_NAME);
        assert_eq!(statements[0].subject_raw, "Alice");
        assert_eq!(statements[0].id, statement_id("person:a", "pred:x", "lit:1"));
        assert_eq!(statements[1].predicate_raw, "");
        assert_eq!(statements[1].object_raw, "");
    }

    #[test]
    fn falls_back_to_known_predicate_ids() {
        let line = format!(
            r#"{{"s":"stmt:1","p":"{}","o":"lit:2024"}}"#,
            predicate_id(SCHEMA_VALID_FROM)
        );
        let statements = parse_batch(&line, &PredicateSet::default()).unwrap();
        assert_eq!(statements[0].predicate_raw, SCHEMA_VALID_FROM);
    }

    #[test]
    fn rejects_invalid_json_with_line_number() {
        let text = "{\"s\":\"a\",\"p\":\"b\",\"o\":\"c\"}\nnot json";
        let err = parse_batch(text, &PredicateSet::default()).unwrap_err();
        assert!(matches!(err, Error::InvalidStatementLine { line: 2, .. }));
    }

    #[test]
    fn rejects_non_string_keys() {
        let err = parse_batch(r#"{"s":1,"p":"b","o":"c"}"#, &PredicateSet::default()).unwrap_err();
        assert!(err.to_string().contains("expected keys s,p,o"));
    }

    #[test]
    fn rejects_invalid_identifiers() {
        let err = parse_batch(r#"{"s":"a b","p":"b","o":"c"}"#, &PredicateSet::default())
            .unwrap_err();
        assert!(matches!(err, Error::InvalidStatementLine { line: 1, .. }));
    }
}
