//! Data model for claims data-quality tiering.

pub mod claim;
pub mod error;
pub mod issue;
pub mod metrics;
pub mod stats;
pub mod thresholds;
pub mod tier;

pub use claim::{Claim, non_blank};
pub use error::{ConfigError, Result};
pub use issue::{ISSUE_DELIMITER, IssueCode, IssueList};
pub use metrics::MetricsSnapshot;
pub use stats::{GroupStatistics, OutlierScore};
pub use thresholds::DqThresholds;
pub use tier::{Tier, TierCounts};
