//! Data-quality issue catalogue.
//!
//! Issue codes are declared in catalogue order. That order drives both rule
//! evaluation and the ordering of serialized issue lists, so a record's
//! `dq_issues` string is identical across runs.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Delimiter used when an issue list is rendered as text at the output boundary.
pub const ISSUE_DELIMITER: char = ';';

/// A structural or business-rule defect found on a single claim.
///
/// The derived `Ord` follows declaration order, which is the catalogue order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IssueCode {
    MissingMemberId,
    MissingNpi,
    MissingCpt,
    MissingDiagnosis,
    MissingAmount,
    InvalidNpi,
    NegativeAmount,
    ExcessiveAmount,
    FutureServiceDate,
    LateSubmission,
    SubmissionBeforeService,
    InvalidStatus,
    InvalidGender,
    InvalidZip,
}

impl IssueCode {
    /// Every issue code in catalogue order.
    pub const ALL: [IssueCode; 14] = [
        IssueCode::MissingMemberId,
        IssueCode::MissingNpi,
        IssueCode::MissingCpt,
        IssueCode::MissingDiagnosis,
        IssueCode::MissingAmount,
        IssueCode::InvalidNpi,
        IssueCode::NegativeAmount,
        IssueCode::ExcessiveAmount,
        IssueCode::FutureServiceDate,
        IssueCode::LateSubmission,
        IssueCode::SubmissionBeforeService,
        IssueCode::InvalidStatus,
        IssueCode::InvalidGender,
        IssueCode::InvalidZip,
    ];

    /// Canonical code as written to output files.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::MissingMemberId => "MISSING_MEMBER_ID",
            Self::MissingNpi => "MISSING_NPI",
            Self::MissingCpt => "MISSING_CPT",
            Self::MissingDiagnosis => "MISSING_DIAGNOSIS",
            Self::MissingAmount => "MISSING_AMOUNT",
            Self::InvalidNpi => "INVALID_NPI",
            Self::NegativeAmount => "NEGATIVE_AMOUNT",
            Self::ExcessiveAmount => "EXCESSIVE_AMOUNT",
            Self::FutureServiceDate => "FUTURE_SERVICE_DATE",
            Self::LateSubmission => "LATE_SUBMISSION",
            Self::SubmissionBeforeService => "SUBMISSION_BEFORE_SERVICE",
            Self::InvalidStatus => "INVALID_STATUS",
            Self::InvalidGender => "INVALID_GENDER",
            Self::InvalidZip => "INVALID_ZIP",
        }
    }

    /// Short human-readable description of the rule.
    pub const fn description(&self) -> &'static str {
        match self {
            Self::MissingMemberId => "Member identifier is absent",
            Self::MissingNpi => "Provider NPI is absent",
            Self::MissingCpt => "Procedure (CPT) code is absent",
            Self::MissingDiagnosis => "Diagnosis (ICD-10) code is absent",
            Self::MissingAmount => "Claim amount is absent",
            Self::InvalidNpi => "Provider NPI is not a fixed-length digit string",
            Self::NegativeAmount => "Claim amount is below the minimum",
            Self::ExcessiveAmount => "Claim amount is above the maximum",
            Self::FutureServiceDate => "Service date is in the future or unparsable",
            Self::LateSubmission => "Submitted too long after the service date",
            Self::SubmissionBeforeService => "Submitted before the service date",
            Self::InvalidStatus => "Claim status is not a recognised value",
            Self::InvalidGender => "Patient gender is not a recognised value",
            Self::InvalidZip => "Patient ZIP is not a 5 or 5+4 digit code",
        }
    }
}

impl fmt::Display for IssueCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for IssueCode {
    type Err = String;

    /// Only the canonical upper-case code is accepted.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        IssueCode::ALL
            .into_iter()
            .find(|code| code.as_str() == s)
            .ok_or_else(|| format!("unknown issue code: {s:?}"))
    }
}

/// The issues raised against one claim, always iterated in catalogue order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IssueList(BTreeSet<IssueCode>);

impl IssueList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an issue. Recording the same code twice has no effect.
    pub fn insert(&mut self, code: IssueCode) {
        self.0.insert(code);
    }

    pub fn contains(&self, code: IssueCode) -> bool {
        self.0.contains(&code)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = IssueCode> + '_ {
        self.0.iter().copied()
    }

    /// Render as `CODE_A;CODE_B` in catalogue order.
    pub fn joined(&self) -> String {
        let mut out = String::new();
        for (idx, code) in self.0.iter().enumerate() {
            if idx > 0 {
                out.push(ISSUE_DELIMITER);
            }
            out.push_str(code.as_str());
        }
        out
    }

    /// Parse a delimited issue string. Empty segments are skipped, so the
    /// trailing-delimiter form `A;B;` is accepted.
    pub fn parse_joined(text: &str) -> Result<Self, String> {
        text.split(ISSUE_DELIMITER)
            .filter(|part| !part.trim().is_empty())
            .map(str::parse)
            .collect()
    }
}

impl FromIterator<IssueCode> for IssueList {
    fn from_iter<I: IntoIterator<Item = IssueCode>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl fmt::Display for IssueList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.joined())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_is_sorted_in_declaration_order() {
        let mut sorted = IssueCode::ALL;
        sorted.sort();
        assert_eq!(sorted, IssueCode::ALL);
    }

    #[test]
    fn joined_follows_catalogue_order_regardless_of_insertion() {
        let mut list = IssueList::new();
        list.insert(IssueCode::InvalidZip);
        list.insert(IssueCode::MissingNpi);
        list.insert(IssueCode::InvalidNpi);
        list.insert(IssueCode::MissingNpi);
        assert_eq!(list.joined(), "MISSING_NPI;INVALID_NPI;INVALID_ZIP");
        assert_eq!(list.len(), 3);
    }

    #[test]
    fn parse_joined_accepts_trailing_delimiter() {
        let list = IssueList::parse_joined("INVALID_NPI;NEGATIVE_AMOUNT;").unwrap();
        assert!(list.contains(IssueCode::InvalidNpi));
        assert!(list.contains(IssueCode::NegativeAmount));
        assert_eq!(list.len(), 2);
        assert!(IssueList::parse_joined("NOT_A_CODE").is_err());
    }

    #[test]
    fn codes_parse_only_in_canonical_form() {
        assert_eq!("INVALID_ZIP".parse::<IssueCode>(), Ok(IssueCode::InvalidZip));
        assert!("invalid_zip".parse::<IssueCode>().is_err());
        assert!("Invalid_Zip".parse::<IssueCode>().is_err());
        assert!(" INVALID_ZIP".parse::<IssueCode>().is_err());
        assert!(IssueList::parse_joined("MISSING_NPI;invalid_npi").is_err());
        for code in IssueCode::ALL {
            assert_eq!(code.as_str().parse::<IssueCode>(), Ok(code));
        }
    }

    #[test]
    fn serde_uses_canonical_codes() {
        let json = serde_json::to_string(&IssueCode::SubmissionBeforeService).unwrap();
        assert_eq!(json, "\"SUBMISSION_BEFORE_SERVICE\"");
        for code in IssueCode::ALL {
            let json = serde_json::to_string(&code).unwrap();
            assert_eq!(json.trim_matches('"'), code.as_str());
        }
    }
}
