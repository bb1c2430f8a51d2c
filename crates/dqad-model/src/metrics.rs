use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Summary of one classified batch, handed to telemetry collaborators.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricsSnapshot {
    pub total_records: usize,
    pub gold_records: usize,
    pub silver_records: usize,
    pub quarantine_records: usize,
    /// Silver plus quarantine.
    pub total_anomalies: usize,
    /// Percentage of the batch classified gold, in `[0, 100]`.
    pub data_quality_score: f64,
    /// Percentage of the batch classified silver or quarantine, in `[0, 100]`.
    pub anomaly_rate: f64,
    pub timestamp: DateTime<Utc>,
    /// Name of the batch or file the snapshot describes.
    pub source_identifier: String,
}
