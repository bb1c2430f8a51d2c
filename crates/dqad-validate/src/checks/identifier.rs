//! Provider NPI format.

use dqad_model::{Claim, IssueCode};

use crate::rules::RuleSet;

pub fn check(claim: &Claim, rules: &RuleSet) -> Vec<IssueCode> {
    let expected_len = rules.thresholds().npi_length;
    // An absent NPI does not match the pattern either.
    let valid = claim
        .provider_npi
        .as_deref()
        .is_some_and(|npi| is_digit_string(npi, expected_len));
    if valid {
        Vec::new()
    } else {
        vec![IssueCode::InvalidNpi]
    }
}

/// Exactly `len` ASCII digits, nothing else.
pub(crate) fn is_digit_string(value: &str, len: usize) -> bool {
    value.len() == len && value.bytes().all(|byte| byte.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn digit_string_rules() {
        assert!(is_digit_string("1234567890", 10));
        assert!(!is_digit_string("123", 10));
        assert!(!is_digit_string("12345678901", 10));
        assert!(!is_digit_string("12345 7890", 10));
        assert!(!is_digit_string(" 1234567890", 10));
        assert!(!is_digit_string("١٢٣٤٥٦٧٨٩٠", 10));
    }
}
