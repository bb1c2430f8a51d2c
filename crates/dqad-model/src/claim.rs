//! Claim record as received from ingestion.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One billed healthcare service event.
///
/// Every field other than `claim_id` may be absent. Dates that could not be
/// parsed at ingestion are stored as `None`; validation treats absent and
/// unparsable dates the same way.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Claim {
    pub claim_id: String,
    pub member_id: Option<String>,
    pub provider_id: Option<String>,
    /// National Provider Identifier, expected to be 10 digits.
    pub provider_npi: Option<String>,
    /// Procedure code; the peer-group key for outlier scoring.
    pub cpt_code: Option<String>,
    /// Diagnosis code.
    pub icd10_code: Option<String>,
    pub claim_amount: Option<f64>,
    pub service_date: Option<NaiveDate>,
    pub submission_date: Option<NaiveDate>,
    pub claim_status: Option<String>,
    pub denial_reason: Option<String>,
    pub patient_dob: Option<NaiveDate>,
    pub patient_zip: Option<String>,
    pub patient_gender: Option<String>,
}

impl Claim {
    pub fn new(claim_id: impl Into<String>) -> Self {
        Self {
            claim_id: claim_id.into(),
            ..Self::default()
        }
    }

    /// Claim amount, treating NaN as absent.
    pub fn amount(&self) -> Option<f64> {
        self.claim_amount.filter(|value| !value.is_nan())
    }

    /// Procedure code with surrounding whitespace removed, `None` when blank.
    pub fn cpt_key(&self) -> Option<&str> {
        non_blank(self.cpt_code.as_deref())
    }
}

/// Trimmed view of an optional text field; blank strings count as absent.
pub fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|text| !text.is_empty())
}
