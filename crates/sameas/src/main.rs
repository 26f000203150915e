//! sameas - identity-equivalence evaluation CLI
//!
//! Usage:
//!     sameas evaluate --input claim.json
//!     sameas run-batch --payload dispatch.json --output report.json
//!     sameas prompt --input claim.json --template review.md
//!     sameas trigger --eval-owner acme --eval-repo evals --event-type evaluate-sameas \
//!         --source-owner acme --source-repo graph-data --source-ref main
//!
//! Inputs fall back to `SAMEAS_*` environment variables (and `.env`).

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use sameas::batch::{parse_dispatch_payload, resolve_local_batch, run_batch};
use sameas::dispatch::{DispatchRequest, Dispatcher, SourceRepo, DEFAULT_API_BASE, DEFAULT_RAW_BASE};
use sameas::prompt::{render_prompt, DEFAULT_TEMPLATE};
use sameas::{Config, Error, Result};
use sameas_core::interval::parse_timestamp_ms;
use sameas_core::method::{METHOD_ID, METHOD_VERSION};
use sameas_core::{EvaluateInput, Evaluator};
use tracing::{debug, error};

#[derive(Parser, Debug)]
#[command(name = "sameas")]
#[command(about = "Evaluate owl:sameAs identity claims against statement evidence")]
#[command(version)]
struct Args {
    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Evaluate one claim and print the result as JSON
    Evaluate {
        /// Evaluation input file (defaults to SAMEAS_INPUT_JSON)
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Evaluate as of this timestamp instead of now
        #[arg(long)]
        at: Option<String>,
    },

    /// Fetch a statement batch and evaluate every claim in it
    RunBatch {
        /// Dispatch payload file (defaults to SAMEAS_DISPATCH_JSON)
        #[arg(short, long)]
        payload: Option<PathBuf>,

        /// Also write the report here (defaults to SAMEAS_OUTPUT_PATH)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Evaluate as of this timestamp instead of now
        #[arg(long)]
        at: Option<String>,
    },

    /// Render a review prompt for one claim
    Prompt {
        /// Evaluation input file (defaults to SAMEAS_INPUT_JSON)
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Markdown template with {{slot}} placeholders
        #[arg(short, long)]
        template: Option<PathBuf>,
    },

    /// Ask a remote repository to evaluate a statement batch
    Trigger {
        #[arg(long)]
        eval_owner: String,

        #[arg(long)]
        eval_repo: String,

        #[arg(long)]
        event_type: String,

        #[arg(long, default_value = METHOD_ID)]
        method_id: String,

        #[arg(long, default_value = METHOD_VERSION)]
        method_version: String,

        #[arg(long)]
        source_owner: String,

        #[arg(long)]
        source_repo: String,

        #[arg(long)]
        source_ref: String,

        /// Batch root name (file stem of `<root>.jsonl`)
        #[arg(long)]
        root: Option<String>,

        /// Batch path relative to the source repository
        #[arg(long)]
        url_path: Option<String>,

        #[arg(long, env = "SAMEAS_API_BASE", default_value = DEFAULT_API_BASE)]
        api_base: String,

        #[arg(long, env = "SAMEAS_RAW_BASE", default_value = DEFAULT_RAW_BASE)]
        raw_base: String,
    },
}

fn main() -> ExitCode {
    let args = Args::parse();
    let config = Config::from_env();

    sameas::tracing::init_with_filter(&args.log_level);
    debug!(command = ?args.command, "starting sameas v{}", env!("CARGO_PKG_VERSION"));

    match run(args.command, &config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "command failed");
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(command: Command, config: &Config) -> Result<()> {
    match command {
        Command::Evaluate { input, at } => {
            let input = read_input(input.as_deref(), config)?;
            let result = evaluator(at.as_deref())?.evaluate(&input);
            println!("{}", serde_json::to_string_pretty(&result)?);
        }

        Command::RunBatch { payload, output, at } => {
            let raw = match payload {
                Some(path) => std::fs::read_to_string(path)?,
                None => config.require_dispatch_json()?.to_string(),
            };
            let payload = parse_dispatch_payload(&raw)?;
            let report = run_batch(&payload, &evaluator(at.as_deref())?)?;
            let json = serde_json::to_string_pretty(&report)?;

            if let Some(path) = output.or_else(|| config.output_path.clone()) {
                std::fs::write(&path, &json)?;
                debug!(path = %path.display(), "report written");
            }
            println!("{}", json);
        }

        Command::Prompt { input, template } => {
            let input = read_input(input.as_deref(), config)?;
            let template = match template {
                Some(path) => std::fs::read_to_string(path)?,
                None => DEFAULT_TEMPLATE.to_string(),
            };
            let evaluator = Evaluator::new();
            let result = evaluator.evaluate(&input);
            println!(
                "{}",
                render_prompt(&template, &input, &result, evaluator.predicates())
            );
        }

        Command::Trigger {
            eval_owner,
            eval_repo,
            event_type,
            method_id,
            method_version,
            source_owner,
            source_repo,
            source_ref,
            root,
            url_path,
            api_base,
            raw_base,
        } => {
            let token = config.require_push_token()?;
            let base_dir = std::env::current_dir()?;
            let batch = resolve_local_batch(
                &config.statements_path,
                &base_dir,
                root.as_deref(),
                url_path.as_deref(),
            )?;
            let source = SourceRepo {
                owner: source_owner,
                repo: source_repo,
                git_ref: source_ref,
            };
            let request =
                DispatchRequest::new(event_type, method_id, method_version, &source, &raw_base, batch);

            Dispatcher::new(api_base, token)?.send(&eval_owner, &eval_repo, &request)?;

            println!(
                "Triggered {}/{} repository_dispatch ({}).",
                eval_owner, eval_repo, request.event_type
            );
            println!("Input root: {}", request.client_payload.input.root);
            println!("Input pointer: {}", request.pointer());
        }
    }

    Ok(())
}

fn read_input(path: Option<&Path>, config: &Config) -> Result<EvaluateInput> {
    let raw = match path {
        Some(path) => std::fs::read_to_string(path)?,
        None => config.require_input_json()?.to_string(),
    };
    serde_json::from_str(&raw)
        .map_err(|e| Error::Core(sameas_core::Error::InvalidInput(e.to_string())))
}

fn evaluator(at: Option<&str>) -> Result<Evaluator> {
    let evaluator = Evaluator::new();
    match at {
        None => Ok(evaluator),
        Some(value) => parse_timestamp_ms(value)
            .map(|ms| evaluator.at(ms))
            .ok_or_else(|| Error::Config(format!("unparseable --at timestamp: {}", value))),
    }
}
