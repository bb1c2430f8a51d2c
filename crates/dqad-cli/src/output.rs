//! Tier and metrics writers.
//!
//! Layout under the output directory:
//!
//! ```text
//! gold/year=YYYY/month=MM/<run>.csv
//! silver/<run>.csv
//! quarantine/<run>.csv
//! metrics.json
//! ```
//!
//! A tier file is written only when the tier has records.

use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use chrono::{DateTime, SecondsFormat, Utc};
use dqad_core::{BatchOutcome, GoldRecord};
use dqad_ingest::{ClaimCsvWriter, IngestError};
use dqad_model::{Claim, MetricsSnapshot, Tier};
use tracing::debug;

const GOLD_EXTRA_COLUMNS: &[&str] = &["ingestion_timestamp", "source_file"];
const SILVER_EXTRA_COLUMNS: &[&str] = &["dq_issues", "ingestion_timestamp", "source_file"];
const QUARANTINE_EXTRA_COLUMNS: &[&str] = &[
    "z_score",
    "avg_amount",
    "stddev_amount",
    "anomaly_type",
    "anomaly_details",
    "ingestion_timestamp",
    "source_file",
];

pub const METRICS_FILE: &str = "metrics.json";

#[derive(Debug, thiserror::Error)]
pub enum OutputError {
    #[error("failed to create directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: IngestError,
    },

    #[error("failed to serialize metrics: {0}")]
    Metrics(#[from] serde_json::Error),
}

/// Files produced by one run.
#[derive(Debug, Clone, Default)]
pub struct OutputPaths {
    pub output_dir: PathBuf,
    pub gold: Vec<PathBuf>,
    pub silver: Option<PathBuf>,
    pub quarantine: Option<PathBuf>,
    pub metrics: PathBuf,
}

impl OutputPaths {
    pub fn file_count(&self) -> usize {
        self.gold.len()
            + usize::from(self.silver.is_some())
            + usize::from(self.quarantine.is_some())
            + 1
    }
}

/// Name shared by every tier file of one run, e.g. `claims-20240601T120000.000000Z.csv`.
///
/// Microsecond precision keeps runs started within the same second apart.
pub fn run_file_name(evaluated_at: DateTime<Utc>) -> String {
    format!("claims-{}.csv", evaluated_at.format("%Y%m%dT%H%M%S%.6fZ"))
}

/// Write all non-empty tiers and the metrics snapshot.
pub fn write_outcome(output_dir: &Path, outcome: &BatchOutcome) -> Result<OutputPaths, OutputError> {
    let metrics = &outcome.metrics;
    let stamp = Stamp::new(metrics);
    let file_name = run_file_name(metrics.timestamp);

    let mut paths = OutputPaths {
        output_dir: output_dir.to_path_buf(),
        ..OutputPaths::default()
    };

    for ((year, month), records) in gold_partitions(&outcome.tiers.gold) {
        let dir = output_dir
            .join(Tier::Gold.dir_name())
            .join(format!("year={year:04}"))
            .join(format!("month={month:02}"));
        let path = dir.join(&file_name);
        write_tier(&dir, &path, GOLD_EXTRA_COLUMNS, records, |record| {
            (&record.claim, stamp.cells())
        })?;
        paths.gold.push(path);
    }

    if !outcome.tiers.silver.is_empty() {
        let dir = output_dir.join(Tier::Silver.dir_name());
        let path = dir.join(&file_name);
        write_tier(
            &dir,
            &path,
            SILVER_EXTRA_COLUMNS,
            outcome.tiers.silver.iter(),
            |record| {
                let mut extras = vec![record.issues.joined()];
                extras.extend(stamp.cells());
                (&record.claim, extras)
            },
        )?;
        paths.silver = Some(path);
    }

    if !outcome.tiers.quarantine.is_empty() {
        let dir = output_dir.join(Tier::Quarantine.dir_name());
        let path = dir.join(&file_name);
        write_tier(
            &dir,
            &path,
            QUARANTINE_EXTRA_COLUMNS,
            outcome.tiers.quarantine.iter(),
            |record| {
                let mut extras = vec![
                    record.score.z_score.to_string(),
                    record.score.mean_amount.to_string(),
                    record.score.stddev_amount.to_string(),
                    record.anomaly_type().to_string(),
                    record.anomaly_details(),
                ];
                extras.extend(stamp.cells());
                (&record.claim, extras)
            },
        )?;
        paths.quarantine = Some(path);
    }

    create_dir(output_dir)?;
    paths.metrics = output_dir.join(METRICS_FILE);
    write_metrics(&paths.metrics, metrics)?;

    debug!(
        output_dir = %output_dir.display(),
        files = paths.file_count(),
        "outputs written"
    );
    Ok(paths)
}

/// Pretty-printed snapshot, replacing any previous file.
pub fn write_metrics(path: &Path, metrics: &MetricsSnapshot) -> Result<(), OutputError> {
    let json = serde_json::to_string_pretty(metrics)?;
    fs::write(path, json + "\n").map_err(|source| OutputError::Io {
        path: path.to_path_buf(),
        source,
    })
}

struct Stamp {
    ingestion_timestamp: String,
    source_file: String,
}

impl Stamp {
    fn new(metrics: &MetricsSnapshot) -> Self {
        Self {
            ingestion_timestamp: metrics.timestamp.to_rfc3339_opts(SecondsFormat::Secs, true),
            source_file: metrics.source_identifier.clone(),
        }
    }

    fn cells(&self) -> Vec<String> {
        vec![self.ingestion_timestamp.clone(), self.source_file.clone()]
    }
}

/// Gold records grouped by service year and month, input order kept within each group.
fn gold_partitions(gold: &[GoldRecord]) -> BTreeMap<(i32, u32), Vec<&GoldRecord>> {
    let mut partitions: BTreeMap<(i32, u32), Vec<&GoldRecord>> = BTreeMap::new();
    for record in gold {
        partitions
            .entry((record.year, record.month))
            .or_default()
            .push(record);
    }
    partitions
}

fn create_dir(dir: &Path) -> Result<(), OutputError> {
    fs::create_dir_all(dir).map_err(|source| OutputError::CreateDir {
        path: dir.to_path_buf(),
        source,
    })
}

fn write_tier<'a, R, I, F>(
    dir: &Path,
    path: &Path,
    extra_columns: &[&str],
    records: I,
    row: F,
) -> Result<(), OutputError>
where
    R: 'a,
    I: IntoIterator<Item = &'a R>,
    F: Fn(&'a R) -> (&'a Claim, Vec<String>),
{
    create_dir(dir)?;
    let csv_error = |source| OutputError::Csv {
        path: path.to_path_buf(),
        source,
    };
    let file = File::create(path).map_err(|source| OutputError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let mut writer = ClaimCsvWriter::new(
        BufWriter::new(file),
        &path.display().to_string(),
        extra_columns,
    )
    .map_err(csv_error)?;
    for record in records {
        let (claim, extras) = row(record);
        writer.write(claim, &extras).map_err(csv_error)?;
    }
    writer.finish().map_err(csv_error)
}
