//! Threshold configuration: optional TOML file plus command-line overrides.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use dqad_model::DqThresholds;
use tracing::debug;

/// Values given on the command line; each one beats the file.
#[derive(Debug, Clone, Copy, Default)]
pub struct ThresholdOverrides {
    pub z_score_threshold: Option<f64>,
    pub max_claim_amount: Option<f64>,
    pub min_claim_amount: Option<f64>,
}

/// Parse a thresholds file. Keys that are not present keep their defaults.
pub fn load_thresholds_file(path: &Path) -> Result<DqThresholds> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("read thresholds file {}", path.display()))?;
    toml::from_str(&text).with_context(|| format!("parse thresholds file {}", path.display()))
}

/// Defaults, then the file, then overrides. The result is validated.
pub fn resolve_thresholds(
    path: Option<&Path>,
    overrides: ThresholdOverrides,
) -> Result<DqThresholds> {
    let mut thresholds = match path {
        Some(path) => load_thresholds_file(path)?,
        None => DqThresholds::default(),
    };
    if let Some(z) = overrides.z_score_threshold {
        thresholds = thresholds.with_z_score_threshold(z);
    }
    if let Some(max) = overrides.max_claim_amount {
        thresholds = thresholds.with_max_claim_amount(max);
    }
    if let Some(min) = overrides.min_claim_amount {
        thresholds = thresholds.with_min_claim_amount(min);
    }
    thresholds.validate().context("invalid thresholds")?;
    debug!(
        z_score_threshold = thresholds.z_score_threshold,
        max_claim_amount = thresholds.max_claim_amount,
        npi_length = thresholds.npi_length,
        "thresholds resolved"
    );
    Ok(thresholds)
}
