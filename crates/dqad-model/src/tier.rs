use std::fmt;

use serde::{Deserialize, Serialize};

/// Outcome of tiering a single claim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Tier {
    /// Passed every rule and is not a statistical outlier.
    Gold,
    /// Failed one or more rules.
    Silver,
    /// Passed every rule but scored as an outlier within its procedure group.
    Quarantine,
}

impl Tier {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Gold => "GOLD",
            Self::Silver => "SILVER",
            Self::Quarantine => "QUARANTINE",
        }
    }

    /// Directory name used by tier writers.
    pub const fn dir_name(&self) -> &'static str {
        match self {
            Self::Gold => "gold",
            Self::Silver => "silver",
            Self::Quarantine => "quarantine",
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-tier record counts for one batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierCounts {
    pub gold: usize,
    pub silver: usize,
    pub quarantine: usize,
}

impl TierCounts {
    pub fn total(&self) -> usize {
        self.gold + self.silver + self.quarantine
    }

    pub fn anomalies(&self) -> usize {
        self.silver + self.quarantine
    }

    pub fn record(&mut self, tier: Tier) {
        match tier {
            Tier::Gold => self.gold += 1,
            Tier::Silver => self.silver += 1,
            Tier::Quarantine => self.quarantine += 1,
        }
    }
}
