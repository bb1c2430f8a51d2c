use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use chrono::Utc;
use comfy_table::Table;
use dqad_cli::config::{ThresholdOverrides, resolve_thresholds};
use dqad_cli::pipeline::{RunOptions, RunResult, run_batch};
use dqad_fixtures::ClaimGenerator;
use dqad_ingest::write_claims_file;
use dqad_model::IssueCode;
use tracing::{info, info_span};

use crate::cli::{GenerateArgs, RunArgs};
use crate::summary::apply_table_style;

const DEFAULT_OUTPUT_DIR: &str = "dq-output";

pub fn run_rules() -> Result<()> {
    let mut table = Table::new();
    table.set_header(vec!["Code", "Description"]);
    apply_table_style(&mut table);
    for code in IssueCode::ALL {
        table.add_row(vec![code.as_str(), code.description()]);
    }
    println!("{table}");
    Ok(())
}

pub fn run_claims(args: &RunArgs) -> Result<RunResult> {
    let overrides = ThresholdOverrides {
        z_score_threshold: args.z_threshold,
        max_claim_amount: args.max_amount,
        min_claim_amount: args.min_amount,
    };
    let thresholds = resolve_thresholds(args.config.as_deref(), overrides)?;
    let output_dir = if args.dry_run {
        None
    } else {
        Some(
            args.output_dir
                .clone()
                .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_DIR)),
        )
    };
    let options = RunOptions {
        input: args.input.clone(),
        output_dir,
        thresholds,
        evaluated_at: Utc::now(),
        as_of: args.as_of,
    };
    run_batch(&options)
}

pub fn run_generate(args: &GenerateArgs) -> Result<PathBuf> {
    let span = info_span!("generate", seed = args.seed, count = args.count);
    let _guard = span.enter();
    let start = Instant::now();
    let as_of = args.as_of.unwrap_or_else(|| Utc::now().date_naive());
    let claims = ClaimGenerator::new(args.seed, as_of)
        .with_anomaly_rate(args.anomaly_rate)
        .generate_batch(args.count);
    if let Some(parent) = args.output.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create directory {}", parent.display()))?;
    }
    write_claims_file(&args.output, &claims)
        .with_context(|| format!("write {}", args.output.display()))?;
    info!(
        path = %args.output.display(),
        records = claims.len(),
        duration_ms = start.elapsed().as_millis(),
        "synthetic claims written"
    );
    Ok(args.output.clone())
}
