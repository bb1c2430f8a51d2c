//! Threshold configuration for validation and outlier scoring.
//!
//! Every field has a default, so a partial config file only overrides the
//! values it names:
//!
//! ```toml
//! max_claim_amount = 250000.0
//! z_score_threshold = 3.5
//! ```

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Result};

pub const DEFAULT_MIN_CLAIM_AMOUNT: f64 = 0.0;
pub const DEFAULT_MAX_CLAIM_AMOUNT: f64 = 100_000.0;
pub const DEFAULT_NPI_LENGTH: usize = 10;
pub const DEFAULT_MAX_DAYS_TO_SUBMISSION: i64 = 365;
pub const DEFAULT_Z_SCORE_THRESHOLD: f64 = 3.0;
pub const DEFAULT_VALID_STATUSES: &[&str] = &["PAID", "DENIED", "PENDING"];
pub const DEFAULT_VALID_GENDERS: &[&str] = &["M", "F", "U"];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DqThresholds {
    pub min_claim_amount: f64,
    pub max_claim_amount: f64,
    pub npi_length: usize,
    pub max_days_to_submission: i64,
    /// Days past the evaluation date a service date may fall before it is
    /// considered in the future.
    pub future_date_tolerance_days: i64,
    pub z_score_threshold: f64,
    pub valid_statuses: BTreeSet<String>,
    pub valid_genders: BTreeSet<String>,
}

impl Default for DqThresholds {
    fn default() -> Self {
        Self {
            min_claim_amount: DEFAULT_MIN_CLAIM_AMOUNT,
            max_claim_amount: DEFAULT_MAX_CLAIM_AMOUNT,
            npi_length: DEFAULT_NPI_LENGTH,
            max_days_to_submission: DEFAULT_MAX_DAYS_TO_SUBMISSION,
            future_date_tolerance_days: 0,
            z_score_threshold: DEFAULT_Z_SCORE_THRESHOLD,
            valid_statuses: to_set(DEFAULT_VALID_STATUSES),
            valid_genders: to_set(DEFAULT_VALID_GENDERS),
        }
    }
}

impl DqThresholds {
    /// Check that these thresholds can drive a batch.
    ///
    /// # Errors
    ///
    /// Returns the first problem found; a batch must not be processed with
    /// thresholds that fail here.
    pub fn validate(&self) -> Result<()> {
        check_finite("min_claim_amount", self.min_claim_amount)?;
        check_finite("max_claim_amount", self.max_claim_amount)?;
        if self.min_claim_amount > self.max_claim_amount {
            return Err(ConfigError::InvertedAmountBounds {
                min: self.min_claim_amount,
                max: self.max_claim_amount,
            });
        }
        if self.npi_length == 0 {
            return Err(ConfigError::ZeroNpiLength);
        }
        check_days("max_days_to_submission", self.max_days_to_submission)?;
        check_days("future_date_tolerance_days", self.future_date_tolerance_days)?;
        check_finite("z_score_threshold", self.z_score_threshold)?;
        if self.z_score_threshold <= 0.0 {
            return Err(ConfigError::NonPositiveZThreshold(self.z_score_threshold));
        }
        check_value_set("valid_statuses", &self.valid_statuses)?;
        check_value_set("valid_genders", &self.valid_genders)?;
        Ok(())
    }

    #[must_use]
    pub fn with_z_score_threshold(mut self, threshold: f64) -> Self {
        self.z_score_threshold = threshold;
        self
    }

    #[must_use]
    pub fn with_max_claim_amount(mut self, max: f64) -> Self {
        self.max_claim_amount = max;
        self
    }

    #[must_use]
    pub fn with_min_claim_amount(mut self, min: f64) -> Self {
        self.min_claim_amount = min;
        self
    }
}

fn to_set(values: &[&str]) -> BTreeSet<String> {
    values.iter().map(|value| (*value).to_string()).collect()
}

fn check_finite(field: &'static str, value: f64) -> Result<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::NonFinite { field, value })
    }
}

fn check_days(field: &'static str, value: i64) -> Result<()> {
    if value < 0 {
        Err(ConfigError::NegativeDays { field, value })
    } else {
        Ok(())
    }
}

fn check_value_set(field: &'static str, values: &BTreeSet<String>) -> Result<()> {
    if values.is_empty() {
        return Err(ConfigError::EmptyValueSet { field });
    }
    if values.iter().any(|value| value.trim().is_empty()) {
        return Err(ConfigError::BlankValue { field });
    }
    // claim values are trimmed before lookup, so a padded entry never matches
    if let Some(value) = values.iter().find(|value| value.trim() != value.as_str()) {
        return Err(ConfigError::PaddedValue {
            field,
            value: value.clone(),
        });
    }
    Ok(())
}
