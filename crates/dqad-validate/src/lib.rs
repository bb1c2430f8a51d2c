//! Rule Validator: applies the fixed issue catalogue to each claim.
//!
//! Validation is a pure per-claim function. Batches are validated in parallel
//! and results come back in input order.

mod checks;
mod rules;

use std::time::Instant;

use dqad_model::{Claim, IssueList};
use rayon::prelude::{IntoParallelRefIterator, ParallelIterator};
use tracing::debug;

pub use checks::dates::{days_to_submission, is_future};
pub use rules::RuleSet;

/// Validate one claim. Never fails; defects come back as issue codes.
pub fn validate_claim(claim: &Claim, rules: &RuleSet) -> IssueList {
    checks::run_all(claim, rules)
}

/// Validate every claim of a batch. `result[i]` belongs to `claims[i]`.
pub fn validate_batch(claims: &[Claim], rules: &RuleSet) -> Vec<IssueList> {
    let start = Instant::now();
    let results: Vec<IssueList> = claims
        .par_iter()
        .map(|claim| validate_claim(claim, rules))
        .collect();
    let rejected = results.iter().filter(|issues| !issues.is_empty()).count();
    debug!(
        claims = claims.len(),
        rejected,
        duration_ms = start.elapsed().as_millis(),
        "rule validation complete"
    );
    results
}
