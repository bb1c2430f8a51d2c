//! One batch run: ingest, evaluate, write, report.

use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDate, Utc};
use dqad_core::{BatchContext, BatchOutcome, DqEngine, IssueFrequency, issue_breakdown};
use dqad_ingest::{IngestWarnings, read_claims};
use dqad_model::DqThresholds;
use tracing::{info, info_span, trace};

use crate::logging::redact_field;
use crate::output::{OutputPaths, write_outcome};

#[derive(Debug, Clone)]
pub struct RunOptions {
    pub input: PathBuf,
    /// Where tier files go; `None` evaluates without writing anything.
    pub output_dir: Option<PathBuf>,
    pub thresholds: DqThresholds,
    pub evaluated_at: DateTime<Utc>,
    /// Reference date for the date rules. Defaults to the UTC date of `evaluated_at`.
    pub as_of: Option<NaiveDate>,
}

#[derive(Debug)]
pub struct RunResult {
    pub outcome: BatchOutcome,
    pub ingest_warnings: IngestWarnings,
    pub issues: Vec<IssueFrequency>,
    pub outputs: Option<OutputPaths>,
}

/// Exit status when `--fail-on-anomalies` is set and the batch is not all GOLD.
pub const EXIT_ANOMALIES: u8 = 2;

impl RunResult {
    pub fn has_anomalies(&self) -> bool {
        self.outcome.metrics.total_anomalies > 0
    }

    /// Process exit status for a completed run.
    pub fn exit_status(&self, fail_on_anomalies: bool) -> u8 {
        if fail_on_anomalies && self.has_anomalies() {
            EXIT_ANOMALIES
        } else {
            0
        }
    }
}

pub fn run_batch(options: &RunOptions) -> Result<RunResult> {
    let source = options.input.display().to_string();
    let run_span = info_span!("run", source = %source);
    let _run_guard = run_span.enter();

    let ingest_start = Instant::now();
    let batch = read_claims(&options.input).context("load claims")?;
    info!(
        records = batch.claims.len(),
        duration_ms = ingest_start.elapsed().as_millis(),
        "ingest complete"
    );

    let mut context = BatchContext::new(batch.source_identifier.clone(), options.evaluated_at);
    if let Some(as_of) = options.as_of {
        context = context.with_as_of(as_of);
    }
    let engine = DqEngine::new(options.thresholds.clone()).context("configure engine")?;
    let outcome = engine
        .process(batch.claims, &context)
        .context("evaluate batch")?;

    for record in &outcome.tiers.quarantine {
        trace!(
            claim_id = %record.claim.claim_id,
            member_id = redact_field(record.claim.member_id.as_deref()),
            provider_npi = redact_field(record.claim.provider_npi.as_deref()),
            z_score = record.score.z_score,
            "claim quarantined"
        );
    }

    let metrics_json = serde_json::to_string(&outcome.metrics).context("serialize metrics")?;
    info!(metrics_json = %metrics_json, "data quality metrics");

    let outputs = match &options.output_dir {
        Some(dir) => {
            let write_start = Instant::now();
            let paths = write_outcome(dir, &outcome)
                .with_context(|| format!("write outputs to {}", dir.display()))?;
            info!(
                output_dir = %dir.display(),
                files = paths.file_count(),
                duration_ms = write_start.elapsed().as_millis(),
                "output complete"
            );
            Some(paths)
        }
        None => None,
    };

    let issues = issue_breakdown(&outcome.tiers.silver);
    Ok(RunResult {
        outcome,
        ingest_warnings: batch.warnings,
        issues,
        outputs,
    })
}
