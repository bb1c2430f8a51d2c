//! Tiering Classifier: combines rule issues and outlier scores into tiers.

use chrono::Datelike;
use dqad_model::{Claim, IssueList, OutlierScore, Tier, TierCounts};
use serde::Serialize;

/// Label written with every quarantined record.
pub const STATISTICAL_OUTLIER: &str = "STATISTICAL_OUTLIER";

/// Decide the tier for one claim.
///
/// Rule issues always win; only rule-clean claims can be quarantined.
pub fn classify(issues: &IssueList, score: Option<&OutlierScore>) -> Tier {
    if !issues.is_empty() {
        Tier::Silver
    } else if score.is_some_and(|score| score.is_outlier) {
        Tier::Quarantine
    } else {
        Tier::Gold
    }
}

/// Clean claim with its storage partition.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GoldRecord {
    pub claim: Claim,
    pub year: i32,
    pub month: u32,
}

/// Defective claim with the rules it failed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SilverRecord {
    pub claim: Claim,
    pub issues: IssueList,
}

/// Rule-clean claim held for review because of its amount.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuarantineRecord {
    pub claim: Claim,
    pub score: OutlierScore,
}

impl QuarantineRecord {
    pub fn anomaly_type(&self) -> &'static str {
        STATISTICAL_OUTLIER
    }

    pub fn anomaly_details(&self) -> String {
        format!(
            "Z-score: {} | Avg: {} | StdDev: {}",
            self.score.z_score, self.score.mean_amount, self.score.stddev_amount
        )
    }
}

/// A batch partitioned into the three tiers. Each tier keeps input order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TieredBatch {
    pub gold: Vec<GoldRecord>,
    pub silver: Vec<SilverRecord>,
    pub quarantine: Vec<QuarantineRecord>,
}

impl TieredBatch {
    pub fn counts(&self) -> TierCounts {
        TierCounts {
            gold: self.gold.len(),
            silver: self.silver.len(),
            quarantine: self.quarantine.len(),
        }
    }

    pub fn len(&self) -> usize {
        self.counts().total()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Place one claim into its tier.
    pub fn push(&mut self, claim: Claim, issues: IssueList, score: Option<OutlierScore>) {
        match (classify(&issues, score.as_ref()), score) {
            (Tier::Silver, _) => self.silver.push(SilverRecord { claim, issues }),
            (Tier::Quarantine, Some(score)) => {
                self.quarantine.push(QuarantineRecord { claim, score });
            }
            _ => {
                // rule-clean claims always carry a parsed service date
                let (year, month) = claim
                    .service_date
                    .map_or((0, 0), |date| (date.year(), date.month()));
                self.gold.push(GoldRecord { claim, year, month });
            }
        }
    }

    /// Tier of a claim by id, for callers inspecting a finished batch.
    pub fn tier_of(&self, claim_id: &str) -> Option<Tier> {
        if self.gold.iter().any(|r| r.claim.claim_id == claim_id) {
            Some(Tier::Gold)
        } else if self.silver.iter().any(|r| r.claim.claim_id == claim_id) {
            Some(Tier::Silver)
        } else if self.quarantine.iter().any(|r| r.claim.claim_id == claim_id) {
            Some(Tier::Quarantine)
        } else {
            None
        }
    }
}
