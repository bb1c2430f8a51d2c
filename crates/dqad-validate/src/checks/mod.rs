//! Per-claim rule checks.
//!
//! Each module covers a contiguous slice of the issue catalogue. `run_all`
//! calls them in catalogue order and every check runs regardless of what
//! earlier checks found.

mod amount;
mod codes;
pub mod dates;
mod identifier;
mod presence;

use dqad_model::{Claim, IssueList};

use crate::rules::RuleSet;

/// Run every rule against one claim.
pub fn run_all(claim: &Claim, rules: &RuleSet) -> IssueList {
    let mut issues = IssueList::new();

    // 1. Required field presence
    for code in presence::check(claim) {
        issues.insert(code);
    }

    // 2. Provider NPI format
    for code in identifier::check(claim, rules) {
        issues.insert(code);
    }

    // 3. Amount bounds
    for code in amount::check(claim, rules) {
        issues.insert(code);
    }

    // 4. Service and submission dates
    for code in dates::check(claim, rules) {
        issues.insert(code);
    }

    // 5. Closed value sets and ZIP shape
    for code in codes::check(claim, rules) {
        issues.insert(code);
    }

    issues
}
