//! Batch discovery and batch runs against local files

use std::fs;
use std::path::Path;

use pretty_assertions::assert_eq;
use sameas::batch::{
    list_batches, parse_dispatch_payload, resolve_local_batch, run_batch, BatchLocator,
};
use sameas::Error;
use sameas_core::predicates::{OWL_SAME_AS, PROV_HAD_PRIMARY_SOURCE, SCHEMA_NAME, SCHEMA_VALID_FROM};
use sameas_core::statement::{predicate_id, statement_id};
use sameas_core::{Decision, Evaluator};
use tempfile::TempDir;

fn touch(path: &Path, contents: &str) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, contents).unwrap();
}

fn line(s: &str, p: &str, o: &str, or: Option<&str>) -> String {
    let mut record = serde_json::json!({ "s": s, "p": p, "o": o });
    if let Some(or) = or {
        record["or"] = serde_json::Value::from(or);
    }
    record.to_string()
}

/// Two claims: one fully supported, one bare.
fn sample_batch() -> (String, String) {
    let same_as = predicate_id(OWL_SAME_AS);
    let claim_id = statement_id("person:ada", &same_as, "person:lovelace");
    let valid_from_id = statement_id(&claim_id, &predicate_id(SCHEMA_VALID_FROM), "lit:1835");

    let lines = [
        line("person:ada", &same_as, "person:lovelace", None),
        line(&claim_id, &predicate_id(SCHEMA_VALID_FROM), "lit:1835", Some("1835-07-08")),
        line(&valid_from_id, &predicate_id(PROV_HAD_PRIMARY_SOURCE), "doc:register", None),
        String::new(),
        line("person:ada", &predicate_id(SCHEMA_NAME), "lit:ada", Some("Ada King")),
        line("person:lovelace", &predicate_id(SCHEMA_NAME), "lit:ada2", Some("ada king")),
        line("person:grace", &same_as, "person:hopper", None),
    ];
    (lines.join("\n"), claim_id)
}

#[test]
fn test_list_batches_sorted_and_filtered() {
    let dir = TempDir::new().unwrap();
    let root = dir.path().join("statements");
    touch(&root.join("2024/02/b.jsonl"), "");
    touch(&root.join("2024/01/a.jsonl"), "");
    touch(&root.join("2024/01/notes.txt"), "");

    let files = list_batches(&root).unwrap();
    assert_eq!(
        files,
        vec![root.join("2024/01/a.jsonl"), root.join("2024/02/b.jsonl")]
    );
}

#[test]
fn test_latest_batch_is_relative_to_base() {
    let dir = TempDir::new().unwrap();
    let root = dir.path().join(".sameas/statements");
    touch(&root.join("2024-01-01.jsonl"), "");
    touch(&root.join("2024-03-01.jsonl"), "");

    let batch = resolve_local_batch(&root, dir.path(), None, None).unwrap();
    assert_eq!(batch.root, "2024-03-01");
    assert_eq!(batch.url_path, ".sameas/statements/2024-03-01.jsonl");
}

#[test]
fn test_batch_by_root() {
    let dir = TempDir::new().unwrap();
    let root = dir.path().join("statements");
    touch(&root.join("x/alpha.jsonl"), "");
    touch(&root.join("y/beta.jsonl"), "");

    let batch = resolve_local_batch(&root, dir.path(), Some("alpha"), None).unwrap();
    assert_eq!(batch.url_path, "statements/x/alpha.jsonl");

    let err = resolve_local_batch(&root, dir.path(), Some("gamma"), None).unwrap_err();
    assert!(matches!(err, Error::Batch(_)));
}

#[test]
fn test_empty_statements_root() {
    let dir = TempDir::new().unwrap();
    let err = resolve_local_batch(dir.path(), dir.path(), None, None).unwrap_err();
    assert!(err.to_string().contains("no statement batch files"));
}

#[test]
fn test_run_batch_from_local_file() {
    let dir = TempDir::new().unwrap();
    let (text, claim_id) = sample_batch();
    touch(&dir.path().join("stmts/2024-06.jsonl"), &text);

    let payload = parse_dispatch_payload(
        &serde_json::json!({
            "input": {
                "urlBase": format!("file://{}/", dir.path().display()),
                "urlPath": "/stmts/2024-06.jsonl",
                "root": "2024-06"
            }
        })
        .to_string(),
    )
    .unwrap();

    let evaluator = Evaluator::new().at(1_717_200_000_000);
    let report = run_batch(&payload, &evaluator).unwrap();

    assert_eq!(report.method_id, "temporal-validity/owl-sameAs/Person");
    assert_eq!(report.method_version, "v1");
    assert_eq!(report.statement_count, 6);
    assert_eq!(report.evaluation_count, 2);

    let supported = &report.results[0];
    assert_eq!(supported.target_statement_id, claim_id);
    assert_eq!(supported.decision, Decision::Same);
    assert!(supported.has_citation_for_every_valid_from);

    assert_eq!(report.results[1].decision, Decision::Uncertain);

    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["input"]["root"], "2024-06");
    assert_eq!(json["evaluationCount"], 2);
}

#[test]
fn test_run_batch_single_target() {
    let dir = TempDir::new().unwrap();
    let (text, claim_id) = sample_batch();
    touch(&dir.path().join("b.jsonl"), &text);

    let payload = parse_dispatch_payload(
        &serde_json::json!({
            "methodVersion": "v1-rc",
            "targetStatementId": claim_id,
            "input": {
                "urlBase": dir.path().display().to_string(),
                "urlPath": "b.jsonl",
                "root": "b"
            }
        })
        .to_string(),
    )
    .unwrap();

    let report = run_batch(&payload, &Evaluator::new().at(0)).unwrap();
    assert_eq!(report.method_version, "v1-rc");
    assert_eq!(report.evaluation_count, 1);
    assert_eq!(report.results[0].target_statement_id, claim_id);
}

#[test]
fn test_malformed_line_reports_line_number() {
    let dir = TempDir::new().unwrap();
    touch(&dir.path().join("bad.jsonl"), "\n{\"s\":\"a\",\"p\":\"b\"}\n");

    let locator = BatchLocator {
        url_base: dir.path().display().to_string(),
        url_path: "bad.jsonl".to_string(),
        root: "bad".to_string(),
    };
    let payload = sameas::DispatchPayload {
        method_id: None,
        method_version: None,
        target_statement_id: None,
        input: locator,
    };

    let err = run_batch(&payload, &Evaluator::new()).unwrap_err();
    assert!(matches!(err, Error::Core(_)));
    assert!(err.to_string().contains("line 2"), "got: {}", err);
}

#[test]
fn test_missing_batch_file_is_io_error() {
    let dir = TempDir::new().unwrap();
    let payload = parse_dispatch_payload(
        &serde_json::json!({
            "input": {
                "urlBase": dir.path().display().to_string(),
                "urlPath": "missing.jsonl",
                "root": "missing"
            }
        })
        .to_string(),
    )
    .unwrap();

    let err = run_batch(&payload, &Evaluator::new()).unwrap_err();
    assert!(matches!(err, Error::Io(_)));
}
