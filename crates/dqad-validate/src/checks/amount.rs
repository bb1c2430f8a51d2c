//! Claim amount bounds.

use dqad_model::{Claim, IssueCode};

use crate::rules::RuleSet;

pub fn check(claim: &Claim, rules: &RuleSet) -> Vec<IssueCode> {
    let mut issues = Vec::new();
    let Some(amount) = claim.amount() else {
        return issues;
    };
    let thresholds = rules.thresholds();

    if amount < thresholds.min_claim_amount {
        issues.push(IssueCode::NegativeAmount);
    }
    if amount > thresholds.max_claim_amount {
        issues.push(IssueCode::ExcessiveAmount);
    }

    issues
}
