//! Statement batch runs.
//!
//! A batch is one newline-delimited statement file addressed by a
//! [`BatchLocator`]. A run fetches it, evaluates every equivalence claim (or
//! one named target) and wraps the results in a [`BatchReport`].

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use walkdir::WalkDir;

use sameas_core::{parse_batch, EvaluationResult, Evaluator, MethodMeta, Statement};

use crate::error::{Error, Result};

pub const BATCH_EXTENSION: &str = "jsonl";

/// Where a batch lives: `<url_base>/<url_path>`, named by `root`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchLocator {
    pub url_base: String,
    pub url_path: String,
    pub root: String,
}

impl BatchLocator {
    pub fn url(&self) -> String {
        join_url(&self.url_base, &self.url_path)
    }

    /// `url_path` must name the `<root>.jsonl` file.
    pub fn validate(&self) -> Result<()> {
        let suffix = format!("{}.{}", self.root, BATCH_EXTENSION);
        if self.url_path.ends_with(&suffix) {
            Ok(())
        } else {
            Err(Error::Batch(format!("input.urlPath must end with {}", suffix)))
        }
    }
}

/// Batch run request, as delivered by a repository dispatch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DispatchPayload {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub method_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub method_version: Option<String>,
    /// Evaluate only this claim instead of every candidate
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_statement_id: Option<String>,
    pub input: BatchLocator,
}

/// Parse and validate a dispatch payload.
pub fn parse_dispatch_payload(raw: &str) -> Result<DispatchPayload> {
    let value: serde_json::Value = serde_json::from_str(raw)
        .map_err(|e| Error::Batch(format!("invalid dispatch payload: {}", e)))?;

    if !value.is_object() {
        return Err(Error::Batch(
            "invalid dispatch payload: expected JSON object".to_string(),
        ));
    }

    let input = &value["input"];
    let has_strings = ["urlBase", "urlPath", "root"]
        .iter()
        .all(|key| input[*key].is_string());
    if !has_strings {
        return Err(Error::Batch(
            "invalid dispatch payload: input must include string urlBase, urlPath, and root"
                .to_string(),
        ));
    }

    let payload: DispatchPayload = serde_json::from_value(value)?;
    payload.input.validate()?;
    Ok(payload)
}

/// Join with exactly one `/` between base and path.
pub fn join_url(url_base: &str, url_path: &str) -> String {
    let base = url_base.strip_suffix('/').unwrap_or(url_base);
    let path = url_path.strip_prefix('/').unwrap_or(url_path);
    format!("{}/{}", base, path)
}

/// Fetch the raw batch text. `http(s)://` goes over the network,
/// `file://` and plain paths are read from disk.
pub fn fetch_batch_text(locator: &BatchLocator) -> Result<String> {
    let url = locator.url();

    if url.starts_with("http://") || url.starts_with("https://") {
        return http_get_text(&url);
    }

    let path = url.strip_prefix("file://").unwrap_or(&url);
    debug!(path, "reading local batch");
    Ok(std::fs::read_to_string(path)?)
}

fn http_get_text(url: &str) -> Result<String> {
    let client = reqwest::blocking::Client::builder()
        .user_agent(format!("sameas/{}", env!("CARGO_PKG_VERSION")))
        .timeout(Duration::from_secs(60))
        .build()
        .map_err(|e| Error::Network(e.to_string()))?;

    debug!(url, "fetching batch");
    let response = client
        .get(url)
        .send()
        .map_err(|e| Error::Network(format!("failed to fetch {}: {}", url, e)))?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().unwrap_or_default();
        return Err(Error::Http {
            status: status.as_u16(),
            body,
        });
    }

    response.text().map_err(|e| Error::Network(e.to_string()))
}

/// Fetch and parse the statements of one batch.
pub fn load_statements(locator: &BatchLocator, evaluator: &Evaluator) -> Result<Vec<Statement>> {
    let text = fetch_batch_text(locator)?;
    Ok(parse_batch(&text, evaluator.predicates())?)
}

/// Output of one batch run
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchReport {
    pub method_id: String,
    pub method_version: String,
    pub input: BatchLocator,
    pub statement_count: usize,
    pub evaluation_count: usize,
    pub results: Vec<EvaluationResult>,
}

/// Evaluate already loaded statements for a dispatch payload.
pub fn evaluate_batch(
    payload: &DispatchPayload,
    statements: Vec<Statement>,
    evaluator: &Evaluator,
) -> BatchReport {
    let meta = MethodMeta::current();
    let statement_count = statements.len();
    let results = evaluator.evaluate_all(statements, payload.target_statement_id.as_deref());

    info!(
        root = %payload.input.root,
        statements = statement_count,
        evaluations = results.len(),
        "batch evaluated"
    );

    BatchReport {
        method_id: payload
            .method_id
            .clone()
            .unwrap_or_else(|| meta.method_id.to_string()),
        method_version: payload
            .method_version
            .clone()
            .unwrap_or_else(|| meta.method_version.to_string()),
        input: payload.input.clone(),
        statement_count,
        evaluation_count: results.len(),
        results,
    }
}

/// Fetch, parse and evaluate the batch a payload points at.
pub fn run_batch(payload: &DispatchPayload, evaluator: &Evaluator) -> Result<BatchReport> {
    let statements = load_statements(&payload.input, evaluator)?;
    Ok(evaluate_batch(payload, statements, evaluator))
}

/// A batch file found on disk, addressed relative to a base directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalBatch {
    pub root: String,
    pub url_path: String,
}

/// Every `*.jsonl` file under `statements_root`, sorted by path.
pub fn list_batches(statements_root: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in WalkDir::new(statements_root) {
        let entry = entry.map_err(|e| {
            Error::Batch(format!("cannot read {}: {}", statements_root.display(), e))
        })?;
        let is_batch = entry.file_type().is_file()
            && entry
                .path()
                .extension()
                .is_some_and(|ext| ext == BATCH_EXTENSION);
        if is_batch {
            files.push(entry.into_path());
        }
    }
    files.sort();
    Ok(files)
}

/// `/`-separated path of `path` relative to `base_dir`, or the path itself
/// when it lies outside `base_dir`.
fn url_path_of(path: &Path, base_dir: &Path) -> String {
    match path.strip_prefix(base_dir) {
        Ok(relative) => relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/"),
        Err(_) => path.to_string_lossy().into_owned(),
    }
}

fn root_of(file_name: &str) -> Option<&str> {
    file_name
        .strip_suffix(BATCH_EXTENSION)
        .and_then(|stem| stem.strip_suffix('.'))
        .filter(|stem| !stem.is_empty())
}

/// Resolve which batch to point at.
///
/// Both `root` and `url_path` given: taken as is. Only `root`: the local
/// batch whose path ends in `<root>.jsonl`. Only `url_path`: root derived from
/// its file name. Neither: the lexicographically last local batch.
pub fn resolve_local_batch(
    statements_root: &Path,
    base_dir: &Path,
    root: Option<&str>,
    url_path: Option<&str>,
) -> Result<LocalBatch> {
    match (root, url_path) {
        (Some(root), Some(url_path)) => Ok(LocalBatch {
            root: root.to_string(),
            url_path: url_path.to_string(),
        }),
        (Some(root), None) => {
            let suffix = format!("{}.{}", root, BATCH_EXTENSION);
            list_batches(statements_root)?
                .iter()
                .map(|p| url_path_of(p, base_dir))
                .find(|p| p.ends_with(&suffix))
                .map(|url_path| LocalBatch {
                    root: root.to_string(),
                    url_path,
                })
                .ok_or_else(|| Error::Batch(format!("could not find local batch for --root {}", root)))
        }
        (None, Some(url_path)) => {
            let file_name = url_path.rsplit('/').next().unwrap_or(url_path);
            let root = root_of(file_name).ok_or_else(|| {
                Error::Batch("invalid --url-path: expected path ending in <root>.jsonl".to_string())
            })?;
            Ok(LocalBatch {
                root: root.to_string(),
                url_path: url_path.to_string(),
            })
        }
        (None, None) => {
            let files = list_batches(statements_root)?;
            let latest = files.last().ok_or_else(|| {
                Error::Batch(format!(
                    "no statement batch files found under {}",
                    statements_root.display()
                ))
            })?;
            let file_name = latest
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            let root = root_of(&file_name).unwrap_or(&file_name).to_string();
            Ok(LocalBatch {
                root,
                url_path: url_path_of(latest, base_dir),
            })
        }
    }
}
