//! Review prompt rendering.
//!
//! Fills a Markdown template with the identifiers of the evaluated claim and
//! the evidence sections a human (or model) reviewer needs. Slots are written
//! `{{name}}`; unknown slots are left untouched and substituted values are
//! never re-scanned.

use std::collections::BTreeMap;

use sameas_core::{EvaluateInput, EvaluationResult, PredicateSet, Statement};

/// Built-in template used when no template file is supplied
pub const DEFAULT_TEMPLATE: &str = r#"# Equivalence review

Decide whether the two identifiers below refer to the same real-world person.

## Claim

- Statement: `{{statementId}}`
- Subject: `{{subjectId}}` ({{subjectRawIdentifier}})
- Object: `{{objectId}}` ({{objectRawIdentifier}})

## Objective evidence

### validFrom

{{validFromSection}}

### validThrough

{{validThroughSection}}

### Citations by validFrom

{{citationsByValidFromSection}}

### Explicit contradictions

{{contradictionsSection}}

## Heuristic evidence

### Names

{{namesSection}}

### Affiliations

{{affiliationsSection}}

## Answer

Reply with `same`, `different` or `uncertain` and a short justification.
"#;

const UNKNOWN: &str = "unknown";
const NO_TARGET: &str = "No target equivalence statement found in input.";

/// Render `template` for one evaluated claim.
pub fn render_prompt(
    template: &str,
    input: &EvaluateInput,
    result: &EvaluationResult,
    predicates: &PredicateSet,
) -> String {
    let target = result.same_as_statement.as_ref().or_else(|| {
        input
            .statements
            .iter()
            .find(|s| s.id == input.target_statement_id)
    });

    let slots = match target {
        Some(target) => target_slots(target, input, result, predicates),
        None => missing_target_slots(&input.target_statement_id),
    };

    fill(template, &slots)
}

fn target_slots(
    target: &Statement,
    input: &EvaluateInput,
    result: &EvaluationResult,
    predicates: &PredicateSet,
) -> BTreeMap<&'static str, String> {
    let about_pair = |s: &&Statement| {
        s.subject_id == target.subject_id || s.subject_id == target.object_id
    };

    let contradictions: Vec<&Statement> = input
        .statements
        .iter()
        .filter(|s| {
            s.predicate_raw == predicates.different_from
                && ((s.subject_id == target.subject_id && s.object_id == target.object_id)
                    || (s.subject_id == target.object_id && s.object_id == target.subject_id))
        })
        .collect();
    let names: Vec<&Statement> = input
        .statements
        .iter()
        .filter(|s| s.predicate_raw == predicates.name)
        .filter(about_pair)
        .collect();
    let affiliations: Vec<&Statement> = input
        .statements
        .iter()
        .filter(|s| predicates.is_affiliation(&s.predicate_raw))
        .filter(about_pair)
        .collect();

    let valid_from: Vec<&Statement> = result.valid_from_statements.iter().collect();
    let valid_through: Vec<&Statement> = result.valid_through_statements.iter().collect();

    BTreeMap::from([
        ("statementId", target.id.clone()),
        ("subjectId", target.subject_id.clone()),
        ("subjectRawIdentifier", raw_or_unknown(&target.subject_raw)),
        ("objectId", target.object_id.clone()),
        ("objectRawIdentifier", raw_or_unknown(&target.object_raw)),
        (
            "validFromSection",
            statement_list(
                &valid_from,
                "No validFrom statements found for this equivalence statement.",
            ),
        ),
        (
            "validThroughSection",
            statement_list(
                &valid_through,
                "No validThrough statements found for this equivalence statement.",
            ),
        ),
        (
            "citationsByValidFromSection",
            grouped_citations(
                &result.citation_statements_by_valid_from,
                "No citation mappings found for validFrom statements.",
            ),
        ),
        (
            "contradictionsSection",
            statement_list(
                &contradictions,
                "No explicit differentFrom contradictions found for this pair.",
            ),
        ),
        (
            "namesSection",
            statement_list(&names, "No name evidence found for either side of the pair."),
        ),
        (
            "affiliationsSection",
            statement_list(
                &affiliations,
                "No affiliation evidence found for either side of the pair.",
            ),
        ),
    ])
}

fn missing_target_slots(target_statement_id: &str) -> BTreeMap<&'static str, String> {
    let mut slots = BTreeMap::from([("statementId", target_statement_id.to_string())]);
    for key in [
        "subjectId",
        "subjectRawIdentifier",
        "objectId",
        "objectRawIdentifier",
    ] {
        slots.insert(key, UNKNOWN.to_string());
    }
    for key in [
        "validFromSection",
        "validThroughSection",
        "citationsByValidFromSection",
        "contradictionsSection",
        "namesSection",
        "affiliationsSection",
    ] {
        slots.insert(key, NO_TARGET.to_string());
    }
    slots
}

fn raw_or_unknown(raw: &str) -> String {
    if raw.is_empty() {
        UNKNOWN.to_string()
    } else {
        raw.to_string()
    }
}

fn statement_line(s: &Statement) -> String {
    let subject = if s.subject_raw.is_empty() { &s.subject_id } else { &s.subject_raw };
    let object = if s.object_raw.is_empty() { &s.object_id } else { &s.object_raw };
    format!("- `{}`: {} <{}> {}", s.id, subject, s.predicate_raw, object)
}

/// Markdown bullet list, or `empty` when there is nothing to list.
pub fn statement_list(statements: &[&Statement], empty: &str) -> String {
    if statements.is_empty() {
        return empty.to_string();
    }
    statements
        .iter()
        .map(|s| statement_line(s))
        .collect::<Vec<_>>()
        .join("\n")
}

/// One bullet group per validFrom id.
pub fn grouped_citations(groups: &BTreeMap<String, Vec<Statement>>, empty: &str) -> String {
    if groups.is_empty() {
        return empty.to_string();
    }
    groups
        .iter()
        .map(|(id, citations)| {
            let body = if citations.is_empty() {
                "- (no citations)".to_string()
            } else {
                citations
                    .iter()
                    .map(statement_line)
                    .collect::<Vec<_>>()
                    .join("\n")
            };
            format!("#### `{}`\n\n{}", id, body)
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Single-pass `{{slot}}` substitution.
fn fill(template: &str, slots: &BTreeMap<&'static str, String>) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find("{{") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        match after.find("}}") {
            Some(end) => {
                let key = after[..end].trim();
                match slots.get(key) {
                    Some(value) => out.push_str(value),
                    None => out.push_str(&rest[start..start + 2 + end + 2]),
                }
                rest = &after[end + 2..];
            }
            None => {
                out.push_str(&rest[start..]);
                rest = "";
            }
        }
    }
    out.push_str(rest);
    out
}
