//! Service and submission date rules.
//!
//! A date that is absent (or was unparsable at ingestion) fails every rule
//! that depends on it.

use chrono::NaiveDate;
use dqad_model::{Claim, IssueCode};

use crate::rules::RuleSet;

pub fn check(claim: &Claim, rules: &RuleSet) -> Vec<IssueCode> {
    let mut issues = Vec::new();
    let service = claim.service_date;
    let submission = claim.submission_date;

    if is_future(service, rules.future_cutoff()) {
        issues.push(IssueCode::FutureServiceDate);
    }

    match days_to_submission(service, submission) {
        Some(days) => {
            if days > rules.thresholds().max_days_to_submission {
                issues.push(IssueCode::LateSubmission);
            }
            if days < 0 {
                issues.push(IssueCode::SubmissionBeforeService);
            }
        }
        None => {
            issues.push(IssueCode::LateSubmission);
            issues.push(IssueCode::SubmissionBeforeService);
        }
    }

    issues
}

/// Whether a service date falls after `cutoff`. Absent dates count as failing.
pub fn is_future(service: Option<NaiveDate>, cutoff: NaiveDate) -> bool {
    service.is_none_or(|date| date > cutoff)
}

/// Signed days from service to submission, when both dates are known.
pub fn days_to_submission(
    service: Option<NaiveDate>,
    submission: Option<NaiveDate>,
) -> Option<i64> {
    let (service, submission) = (service?, submission?);
    Some(submission.signed_duration_since(service).num_days())
}

#[cfg(test)]
mod tests {
    use super::*;
    use dqad_model::DqThresholds;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn rules() -> RuleSet {
        RuleSet::new(DqThresholds::default(), date(2024, 6, 1)).unwrap()
    }

    fn dated(service: Option<NaiveDate>, submission: Option<NaiveDate>) -> Claim {
        let mut claim = Claim::new("C1");
        claim.service_date = service;
        claim.submission_date = submission;
        claim
    }

    #[test]
    fn on_time_claim_passes() {
        let claim = dated(Some(date(2024, 5, 1)), Some(date(2024, 5, 10)));
        assert!(check(&claim, &rules()).is_empty());
    }

    #[test]
    fn service_on_evaluation_date_is_not_future() {
        let claim = dated(Some(date(2024, 6, 1)), Some(date(2024, 6, 1)));
        assert!(check(&claim, &rules()).is_empty());
    }

    #[test]
    fn tomorrow_is_future() {
        let claim = dated(Some(date(2024, 6, 2)), Some(date(2024, 6, 3)));
        assert_eq!(check(&claim, &rules()), vec![IssueCode::FutureServiceDate]);
    }

    #[test]
    fn exactly_max_days_is_not_late() {
        let claim = dated(Some(date(2023, 1, 1)), Some(date(2024, 1, 1)));
        assert!(check(&claim, &rules()).is_empty());
        let claim = dated(Some(date(2023, 1, 1)), Some(date(2024, 1, 2)));
        assert_eq!(check(&claim, &rules()), vec![IssueCode::LateSubmission]);
    }

    #[test]
    fn submission_before_service() {
        let claim = dated(Some(date(2024, 5, 10)), Some(date(2024, 5, 9)));
        assert_eq!(
            check(&claim, &rules()),
            vec![IssueCode::SubmissionBeforeService]
        );
    }

    #[test]
    fn missing_dates_fail_every_dependent_rule() {
        let claim = dated(None, Some(date(2024, 5, 9)));
        assert_eq!(
            check(&claim, &rules()),
            vec![
                IssueCode::FutureServiceDate,
                IssueCode::LateSubmission,
                IssueCode::SubmissionBeforeService,
            ]
        );

        let claim = dated(Some(date(2024, 5, 9)), None);
        assert_eq!(
            check(&claim, &rules()),
            vec![IssueCode::LateSubmission, IssueCode::SubmissionBeforeService]
        );
    }
}
