use serde::{Deserialize, Serialize};

/// Distribution of claim amounts within one procedure-code group.
///
/// `stddev_amount` is the sample standard deviation (n - 1 denominator).
/// Singleton groups and groups of identical amounts report exactly `0.0`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GroupStatistics {
    pub mean_amount: f64,
    pub stddev_amount: f64,
    pub count: usize,
}

impl GroupStatistics {
    /// Whether members of this group can be scored at all.
    pub fn has_spread(&self) -> bool {
        self.stddev_amount > 0.0
    }
}

/// Outlier score for a single rule-clean claim.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OutlierScore {
    pub z_score: f64,
    pub is_outlier: bool,
    pub mean_amount: f64,
    pub stddev_amount: f64,
}
