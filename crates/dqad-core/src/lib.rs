//! Claims data-quality engine.
//!
//! [`DqEngine::process`] runs a batch through rule validation, peer-group
//! outlier scoring, tiering and metrics aggregation. The engine owns no I/O;
//! callers supply parsed claims and receive tiered records plus a snapshot.

pub mod engine;
pub mod metrics;
pub mod outliers;
pub mod tiering;

pub use engine::{BatchContext, BatchOutcome, DqEngine};
pub use metrics::{IssueFrequency, aggregate, issue_breakdown};
pub use outliers::{GroupStatsTable, detect_outliers, group_statistics, score_claims};
pub use tiering::{
    GoldRecord, QuarantineRecord, STATISTICAL_OUTLIER, SilverRecord, TieredBatch, classify,
};
