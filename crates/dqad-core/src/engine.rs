//! Batch composition: Validator → Detector → Classifier → Aggregator.

use std::time::Instant;

use chrono::{DateTime, NaiveDate, Utc};
use dqad_model::{Claim, ConfigError, DqThresholds, MetricsSnapshot, OutlierScore};
use dqad_validate::{RuleSet, validate_batch};
use tracing::{info, info_span};

use crate::metrics::aggregate;
use crate::outliers::{GroupStatsTable, detect_outliers};
use crate::tiering::TieredBatch;

/// Identity and clock for one batch run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchContext {
    pub source_identifier: String,
    /// Timestamp stamped on the metrics snapshot.
    pub evaluated_at: DateTime<Utc>,
    /// Date future-date rules compare against.
    pub as_of: NaiveDate,
}

impl BatchContext {
    /// Context evaluated at `evaluated_at`, with the rule date taken from it.
    pub fn new(source_identifier: impl Into<String>, evaluated_at: DateTime<Utc>) -> Self {
        Self {
            source_identifier: source_identifier.into(),
            evaluated_at,
            as_of: evaluated_at.date_naive(),
        }
    }

    /// Context for a batch evaluated right now.
    pub fn now(source_identifier: impl Into<String>) -> Self {
        Self::new(source_identifier, Utc::now())
    }

    #[must_use]
    pub fn with_as_of(mut self, as_of: NaiveDate) -> Self {
        self.as_of = as_of;
        self
    }
}

/// Everything produced for one batch.
#[derive(Debug, Clone)]
pub struct BatchOutcome {
    pub tiers: TieredBatch,
    pub metrics: MetricsSnapshot,
    /// Peer-group statistics used for scoring.
    pub group_stats: GroupStatsTable,
}

/// Data-quality engine holding validated thresholds.
#[derive(Debug, Clone)]
pub struct DqEngine {
    thresholds: DqThresholds,
}

impl DqEngine {
    /// # Errors
    ///
    /// Refuses thresholds that fail [`DqThresholds::validate`].
    pub fn new(thresholds: DqThresholds) -> Result<Self, ConfigError> {
        thresholds.validate()?;
        Ok(Self { thresholds })
    }

    pub fn thresholds(&self) -> &DqThresholds {
        &self.thresholds
    }

    /// Classify a batch. Every input claim lands in exactly one tier.
    ///
    /// # Errors
    ///
    /// Only configuration problems surface here; data defects never do.
    pub fn process(
        &self,
        claims: Vec<Claim>,
        context: &BatchContext,
    ) -> Result<BatchOutcome, ConfigError> {
        let span = info_span!("batch", source = %context.source_identifier);
        let _guard = span.enter();
        let start = Instant::now();
        let rules = RuleSet::new(self.thresholds.clone(), context.as_of)?;

        let issues = validate_batch(&claims, &rules);

        let clean_indices: Vec<usize> = issues
            .iter()
            .enumerate()
            .filter(|(_, issues)| issues.is_empty())
            .map(|(idx, _)| idx)
            .collect();
        let clean: Vec<&Claim> = clean_indices.iter().map(|&idx| &claims[idx]).collect();
        let (group_stats, clean_scores) =
            detect_outliers(&clean, self.thresholds.z_score_threshold);

        let mut scores: Vec<Option<OutlierScore>> = vec![None; claims.len()];
        for (idx, score) in clean_indices.into_iter().zip(clean_scores) {
            scores[idx] = Some(score);
        }

        let mut tiers = TieredBatch::default();
        for ((claim, claim_issues), score) in claims.into_iter().zip(issues).zip(scores) {
            tiers.push(claim, claim_issues, score);
        }

        let metrics = aggregate(
            tiers.counts(),
            &context.source_identifier,
            context.evaluated_at,
        );
        info!(
            total = metrics.total_records,
            gold = metrics.gold_records,
            silver = metrics.silver_records,
            quarantine = metrics.quarantine_records,
            groups = group_stats.len(),
            data_quality_score = metrics.data_quality_score,
            duration_ms = start.elapsed().as_millis(),
            "batch classified"
        );

        Ok(BatchOutcome {
            tiers,
            metrics,
            group_stats,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn context_derives_rule_date() {
        let at = Utc.with_ymd_and_hms(2024, 6, 1, 23, 30, 0).unwrap();
        let context = BatchContext::new("claims/a.csv", at);
        assert_eq!(context.as_of, NaiveDate::from_ymd_opt(2024, 6, 1).unwrap());
        let context = context.with_as_of(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
        assert_eq!(context.as_of.to_string(), "2024-01-01");
    }

    #[test]
    fn engine_refuses_bad_thresholds() {
        let thresholds = DqThresholds::default().with_min_claim_amount(f64::INFINITY);
        assert!(DqEngine::new(thresholds).is_err());
    }
}
