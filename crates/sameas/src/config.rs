//! Environment configuration for the outer surfaces.
//!
//! Values are read through a lookup function so tests never touch the
//! process environment. Empty values count as unset.

use std::path::PathBuf;

use crate::error::{Error, Result};

pub const INPUT_JSON_VAR: &str = "SAMEAS_INPUT_JSON";
pub const DISPATCH_JSON_VAR: &str = "SAMEAS_DISPATCH_JSON";
pub const OUTPUT_PATH_VAR: &str = "SAMEAS_OUTPUT_PATH";
pub const STATEMENTS_PATH_VAR: &str = "SAMEAS_STATEMENTS_PATH";
pub const PUSH_TOKEN_VAR: &str = "SAMEAS_PUSH_TOKEN";

/// Default root of local `*.jsonl` statement batches
pub const DEFAULT_STATEMENTS_PATH: &str = ".sameas/statements";

#[derive(Debug, Clone, Default)]
pub struct Config {
    pub input_json: Option<String>,
    pub dispatch_json: Option<String>,
    pub output_path: Option<PathBuf>,
    pub statements_path: PathBuf,
    pub push_token: Option<String>,
}

impl Config {
    /// Load `.env` from the working directory, then read the process environment.
    pub fn from_env() -> Self {
        dotenv::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.is_empty());

        Self {
            input_json: get(INPUT_JSON_VAR),
            dispatch_json: get(DISPATCH_JSON_VAR),
            output_path: get(OUTPUT_PATH_VAR).map(PathBuf::from),
            statements_path: get(STATEMENTS_PATH_VAR)
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_STATEMENTS_PATH)),
            push_token: get(PUSH_TOKEN_VAR),
        }
    }

    pub fn require_input_json(&self) -> Result<&str> {
        required(self.input_json.as_deref(), INPUT_JSON_VAR)
    }

    pub fn require_dispatch_json(&self) -> Result<&str> {
        required(self.dispatch_json.as_deref(), DISPATCH_JSON_VAR)
    }

    pub fn require_push_token(&self) -> Result<&str> {
        required(self.push_token.as_deref(), PUSH_TOKEN_VAR)
    }
}

fn required<'a>(value: Option<&'a str>, var: &str) -> Result<&'a str> {
    value.ok_or_else(|| Error::Config(format!("missing required {} environment variable", var)))
}
