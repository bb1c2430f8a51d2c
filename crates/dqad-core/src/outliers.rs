//! Statistical outlier detection within procedure-code peer groups.
//!
//! Scoring is two-phase. Phase 1 reduces the rule-clean claims into a
//! read-only [`GroupStatsTable`]; phase 2 scores each claim against it.
//! Statistics are computed from the same claims being scored, so a few
//! extreme amounts widen their own group's spread.

use std::collections::BTreeMap;

use dqad_model::{Claim, GroupStatistics, OutlierScore};
use rayon::prelude::{IntoParallelIterator, IntoParallelRefIterator, ParallelIterator};
use tracing::debug;

/// Per-group statistics for one batch, keyed by procedure code.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GroupStatsTable {
    groups: BTreeMap<String, GroupStatistics>,
}

impl GroupStatsTable {
    pub fn get(&self, cpt_code: &str) -> Option<&GroupStatistics> {
        self.groups.get(cpt_code)
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &GroupStatistics)> {
        self.groups.iter().map(|(key, stats)| (key.as_str(), stats))
    }
}

/// Phase 1: group claim amounts by procedure code and summarise each group.
///
/// Claims without a procedure code or amount do not contribute.
pub fn group_statistics(claims: &[&Claim]) -> GroupStatsTable {
    let mut amounts: BTreeMap<&str, Vec<f64>> = BTreeMap::new();
    for claim in claims {
        if let (Some(key), Some(amount)) = (claim.cpt_key(), claim.amount()) {
            amounts.entry(key).or_default().push(amount);
        }
    }

    let groups: BTreeMap<String, GroupStatistics> = amounts
        .into_par_iter()
        .map(|(key, values)| (key.to_string(), summarize(&values)))
        .collect();

    for (key, stats) in &groups {
        debug!(
            cpt_code = %key,
            count = stats.count,
            mean = stats.mean_amount,
            stddev = stats.stddev_amount,
            "group statistics"
        );
    }

    GroupStatsTable { groups }
}

/// Mean and sample standard deviation of a non-empty slice.
///
/// Groups of fewer than two values, or whose values are all identical, get a
/// standard deviation of exactly zero.
pub fn summarize(values: &[f64]) -> GroupStatistics {
    let count = values.len();
    if count == 0 {
        return GroupStatistics {
            mean_amount: 0.0,
            stddev_amount: 0.0,
            count,
        };
    }

    let (min, max) = values
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &value| {
            (lo.min(value), hi.max(value))
        });
    if min == max {
        // Division can drift the mean off the shared value; pin it.
        return GroupStatistics {
            mean_amount: min,
            stddev_amount: 0.0,
            count,
        };
    }

    let n = count as f64;
    let mean = values.iter().sum::<f64>() / n;
    let squared: f64 = values.iter().map(|value| (value - mean).powi(2)).sum();
    GroupStatistics {
        mean_amount: mean,
        stddev_amount: (squared / (n - 1.0)).sqrt(),
        count,
    }
}

/// Phase 2: score each claim against its group. `result[i]` belongs to `claims[i]`.
pub fn score_claims(claims: &[&Claim], table: &GroupStatsTable, threshold: f64) -> Vec<OutlierScore> {
    claims
        .par_iter()
        .map(|claim| score_claim(claim, table, threshold))
        .collect()
}

/// Score one claim. Claims in a group without spread always score zero.
pub fn score_claim(claim: &Claim, table: &GroupStatsTable, threshold: f64) -> OutlierScore {
    let stats = claim.cpt_key().and_then(|key| table.get(key));
    let (mean_amount, stddev_amount) =
        stats.map_or((0.0, 0.0), |stats| (stats.mean_amount, stats.stddev_amount));

    let z_score = match (stats, claim.amount()) {
        (Some(stats), Some(amount)) if stats.has_spread() => {
            (amount - stats.mean_amount) / stats.stddev_amount
        }
        _ => 0.0,
    };

    OutlierScore {
        z_score,
        is_outlier: z_score.abs() > threshold,
        mean_amount,
        stddev_amount,
    }
}

/// Run both phases over the rule-clean claims.
pub fn detect_outliers(claims: &[&Claim], threshold: f64) -> (GroupStatsTable, Vec<OutlierScore>) {
    let table = group_statistics(claims);
    let scores = score_claims(claims, &table, threshold);
    (table, scores)
}
