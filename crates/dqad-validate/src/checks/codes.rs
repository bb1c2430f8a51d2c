//! Closed value sets and ZIP shape.

use std::collections::BTreeSet;
use std::sync::LazyLock;

use dqad_model::{Claim, IssueCode};
use regex::Regex;

use crate::rules::RuleSet;

/// US ZIP: five digits, optionally followed by a four-digit extension.
pub static ZIP_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]{5}(-[0-9]{4})?$").expect("Invalid ZIP regex"));

pub fn check(claim: &Claim, rules: &RuleSet) -> Vec<IssueCode> {
    let mut issues = Vec::new();
    let thresholds = rules.thresholds();

    if !in_set(claim.claim_status.as_deref(), &thresholds.valid_statuses) {
        issues.push(IssueCode::InvalidStatus);
    }
    if !in_set(claim.patient_gender.as_deref(), &thresholds.valid_genders) {
        issues.push(IssueCode::InvalidGender);
    }
    let zip_ok = claim
        .patient_zip
        .as_deref()
        .is_some_and(|zip| ZIP_REGEX.is_match(zip.trim()));
    if !zip_ok {
        issues.push(IssueCode::InvalidZip);
    }

    issues
}

/// Exact, case-sensitive membership after trimming.
fn in_set(value: Option<&str>, accepted: &BTreeSet<String>) -> bool {
    value.is_some_and(|text| accepted.contains(text.trim()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zip_shapes() {
        assert!(ZIP_REGEX.is_match("98101"));
        assert!(ZIP_REGEX.is_match("98101-1234"));
        assert!(!ZIP_REGEX.is_match("9810"));
        assert!(!ZIP_REGEX.is_match("98101-12"));
        assert!(!ZIP_REGEX.is_match("981011234"));
        assert!(!ZIP_REGEX.is_match("ABCDE"));
    }

    #[test]
    fn membership_is_case_sensitive() {
        let accepted: BTreeSet<String> = ["PAID".to_string()].into_iter().collect();
        assert!(in_set(Some("PAID"), &accepted));
        assert!(in_set(Some(" PAID "), &accepted));
        assert!(!in_set(Some("paid"), &accepted));
        assert!(!in_set(None, &accepted));
    }
}
