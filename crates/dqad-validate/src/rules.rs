//! Compiled rule parameters for one batch.

use chrono::{Days, NaiveDate};
use dqad_model::{ConfigError, DqThresholds};

/// Thresholds plus the evaluation date, validated once and shared read-only
/// by every per-claim check.
#[derive(Debug, Clone)]
pub struct RuleSet {
    thresholds: DqThresholds,
    as_of: NaiveDate,
    future_cutoff: NaiveDate,
}

impl RuleSet {
    /// Build a rule set evaluated relative to `as_of`.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] when the thresholds are unusable.
    pub fn new(thresholds: DqThresholds, as_of: NaiveDate) -> Result<Self, ConfigError> {
        thresholds.validate()?;
        // validate() guarantees a non-negative tolerance
        let tolerance = Days::new(thresholds.future_date_tolerance_days.unsigned_abs());
        let future_cutoff = as_of.checked_add_days(tolerance).unwrap_or(NaiveDate::MAX);
        Ok(Self {
            thresholds,
            as_of,
            future_cutoff,
        })
    }

    pub fn thresholds(&self) -> &DqThresholds {
        &self.thresholds
    }

    /// The "current date" future-date checks compare against.
    pub fn as_of(&self) -> NaiveDate {
        self.as_of
    }

    /// Latest service date that is not considered in the future.
    pub fn future_cutoff(&self) -> NaiveDate {
        self.future_cutoff
    }
}
