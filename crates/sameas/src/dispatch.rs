//! Remote evaluation trigger.
//!
//! Posts a `repository_dispatch` event pointing the remote evaluation
//! workflow at one statement batch.

use std::time::Duration;

use serde::Serialize;
use tracing::info;

use crate::batch::{join_url, BatchLocator, LocalBatch};
use crate::error::{Error, Result};

pub const DEFAULT_API_BASE: &str = "https://api.github.com";
pub const DEFAULT_RAW_BASE: &str = "https://raw.githubusercontent.com";

/// Repository hosting the statement batches
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceRepo {
    pub owner: String,
    pub repo: String,
    pub git_ref: String,
}

impl SourceRepo {
    /// `<raw_base>/<owner>/<repo>/<ref>`
    pub fn url_base(&self, raw_base: &str) -> String {
        join_url(raw_base, &format!("{}/{}/{}", self.owner, self.repo, self.git_ref))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientPayload {
    pub method_id: String,
    pub method_version: String,
    pub input: BatchLocator,
}

/// Body of a repository dispatch request
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DispatchRequest {
    pub event_type: String,
    pub client_payload: ClientPayload,
}

impl DispatchRequest {
    pub fn new(
        event_type: impl Into<String>,
        method_id: impl Into<String>,
        method_version: impl Into<String>,
        source: &SourceRepo,
        raw_base: &str,
        batch: LocalBatch,
    ) -> Self {
        Self {
            event_type: event_type.into(),
            client_payload: ClientPayload {
                method_id: method_id.into(),
                method_version: method_version.into(),
                input: BatchLocator {
                    url_base: source.url_base(raw_base),
                    url_path: batch.url_path,
                    root: batch.root,
                },
            },
        }
    }

    pub fn pointer(&self) -> String {
        self.client_payload.input.url()
    }
}

/// Client for the dispatch endpoint (blocking).
pub struct Dispatcher {
    http: reqwest::blocking::Client,
    api_base: String,
    token: String,
}

impl Dispatcher {
    pub fn new(api_base: impl Into<String>, token: impl Into<String>) -> Result<Self> {
        let http = reqwest::blocking::Client::builder()
            .user_agent(format!("sameas-trigger/{}", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| Error::Network(e.to_string()))?;

        Ok(Self {
            http,
            api_base: api_base.into(),
            token: token.into(),
        })
    }

    pub fn endpoint(&self, owner: &str, repo: &str) -> String {
        join_url(&self.api_base, &format!("repos/{}/{}/dispatches", owner, repo))
    }

    /// POST the event to `<api_base>/repos/<owner>/<repo>/dispatches`.
    pub fn send(&self, owner: &str, repo: &str, request: &DispatchRequest) -> Result<()> {
        let url = self.endpoint(owner, repo);
        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.token)
            .header("Accept", "application/vnd.github+json")
            .json(request)
            .send()
            .map_err(|e| Error::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(Error::Http {
                status: status.as_u16(),
                body,
            });
        }

        info!(
            owner,
            repo,
            event_type = %request.event_type,
            root = %request.client_payload.input.root,
            "repository dispatch sent"
        );
        Ok(())
    }
}
