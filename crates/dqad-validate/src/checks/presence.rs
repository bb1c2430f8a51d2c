//! Required field presence.

use dqad_model::{Claim, IssueCode, non_blank};

pub fn check(claim: &Claim) -> Vec<IssueCode> {
    let mut issues = Vec::new();

    if non_blank(claim.member_id.as_deref()).is_none() {
        issues.push(IssueCode::MissingMemberId);
    }
    if non_blank(claim.provider_npi.as_deref()).is_none() {
        issues.push(IssueCode::MissingNpi);
    }
    if claim.cpt_key().is_none() {
        issues.push(IssueCode::MissingCpt);
    }
    if non_blank(claim.icd10_code.as_deref()).is_none() {
        issues.push(IssueCode::MissingDiagnosis);
    }
    if claim.amount().is_none() {
        issues.push(IssueCode::MissingAmount);
    }

    issues
}
