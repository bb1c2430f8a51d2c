//! Metrics Aggregator: reduces a tiered batch into a snapshot.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use dqad_model::{IssueCode, MetricsSnapshot, TierCounts};
use serde::Serialize;

use crate::tiering::SilverRecord;

/// Build the batch snapshot from tier counts.
///
/// An empty batch yields a score and rate of zero.
pub fn aggregate(
    counts: TierCounts,
    source_identifier: &str,
    timestamp: DateTime<Utc>,
) -> MetricsSnapshot {
    let total = counts.total();
    let anomalies = counts.anomalies();
    MetricsSnapshot {
        total_records: total,
        gold_records: counts.gold,
        silver_records: counts.silver,
        quarantine_records: counts.quarantine,
        total_anomalies: anomalies,
        data_quality_score: percent(counts.gold, total),
        anomaly_rate: percent(anomalies, total),
        timestamp,
        source_identifier: source_identifier.to_string(),
    }
}

fn percent(part: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        100.0 * part as f64 / total as f64
    }
}

/// How often one issue code occurred across the silver tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct IssueFrequency {
    pub code: IssueCode,
    pub occurrences: usize,
}

/// Issue occurrence counts, most frequent first, ties in catalogue order.
pub fn issue_breakdown(silver: &[SilverRecord]) -> Vec<IssueFrequency> {
    let mut counts: BTreeMap<IssueCode, usize> = BTreeMap::new();
    for record in silver {
        for code in record.issues.iter() {
            *counts.entry(code).or_default() += 1;
        }
    }
    let mut frequencies: Vec<IssueFrequency> = counts
        .into_iter()
        .map(|(code, occurrences)| IssueFrequency { code, occurrences })
        .collect();
    // stable sort keeps catalogue order within equal counts
    frequencies.sort_by(|a, b| b.occurrences.cmp(&a.occurrences));
    frequencies
}
