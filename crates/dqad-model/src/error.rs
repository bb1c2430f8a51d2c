use thiserror::Error;

/// Threshold configuration that cannot produce meaningful tiers.
#[derive(Debug, Clone, PartialEq, Error)]
#[non_exhaustive]
pub enum ConfigError {
    #[error("{field} must be a finite number, got {value}")]
    NonFinite { field: &'static str, value: f64 },

    #[error("min_claim_amount ({min}) must not exceed max_claim_amount ({max})")]
    InvertedAmountBounds { min: f64, max: f64 },

    #[error("npi_length must be at least 1")]
    ZeroNpiLength,

    #[error("{field} must not be negative, got {value}")]
    NegativeDays { field: &'static str, value: i64 },

    #[error("z_score_threshold must be positive, got {0}")]
    NonPositiveZThreshold(f64),

    #[error("{field} must list at least one accepted value")]
    EmptyValueSet { field: &'static str },

    #[error("{field} contains a blank value")]
    BlankValue { field: &'static str },

    #[error("{field} value {value:?} has leading or trailing whitespace")]
    PaddedValue { field: &'static str, value: String },
}

pub type Result<T> = std::result::Result<T, ConfigError>;
