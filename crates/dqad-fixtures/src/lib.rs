//! Synthetic payer claims for tests and demos.
//!
//! Generation is fully determined by the seed and the reference date, so the
//! same `(seed, as_of)` pair always yields the same batch.

use chrono::{Days, NaiveDate};
use dqad_model::Claim;
use rand::distributions::WeightedIndex;
use rand::prelude::{Distribution, SeedableRng, SliceRandom, StdRng};
use rand::Rng;

pub const CPT_CODES: &[&str] = &[
    "99213", "99214", "99215", "99203", "99204", "99205", // office visits
    "99284", "99285", "99283", "99282", // emergency
    "45378", "45380", "45385", // colonoscopy
    "93000", "93005", "93010", // ECG
    "80053", "80061", "85025", // labs
    "71045", "71046", "71047", "71048", // chest x-ray
    "70450", "70460", "70470", // CT
    "77067", "77063", // mammography
    "36415", "36416", // venipuncture
    "90471", "90472", // immunization admin
    "J3301", "J1100", "J2001", // drugs
];

pub const ICD10_CODES: &[&str] = &[
    "E11.9", "I10", "E78.5", "J44.9", "M54.5", "F41.9", "E66.9", "K21.9", "R05", "R51", "N39.0",
    "J06.9", "I25.10", "E03.9", "F32.9", "K76.0", "M19.90", "H35.30", "N18.3", "C50.919",
];

pub const DENIAL_REASONS: &[&str] = &[
    "Prior authorization required",
    "Service not covered",
    "Duplicate claim",
    "Invalid CPT code",
    "Medical necessity not established",
    "Out of network provider",
    "Patient not eligible",
    "Missing documentation",
    "Timely filing limit exceeded",
    "Incorrect billing code",
];

const STATUSES: &[&str] = &["PAID", "DENIED", "PENDING"];
const STATUS_WEIGHTS: &[u32] = &[75, 15, 10];
const GENDERS: &[&str] = &["M", "F", "U"];

/// Defect injected into an otherwise valid claim.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnomalyKind {
    InvalidNpi,
    NegativeAmount,
    FutureDate,
    InvalidCpt,
    MissingDiagnosis,
    ExcessiveAmount,
}

impl AnomalyKind {
    pub const ALL: [AnomalyKind; 6] = [
        AnomalyKind::InvalidNpi,
        AnomalyKind::NegativeAmount,
        AnomalyKind::FutureDate,
        AnomalyKind::InvalidCpt,
        AnomalyKind::MissingDiagnosis,
        AnomalyKind::ExcessiveAmount,
    ];
}

/// A claim that passes every rule when evaluated on `as_of`.
pub fn valid_claim(claim_id: &str, as_of: NaiveDate) -> Claim {
    let service = as_of - Days::new(30);
    Claim {
        claim_id: claim_id.to_string(),
        member_id: Some("MBR100001".to_string()),
        provider_id: Some("PRV10001".to_string()),
        provider_npi: Some("1234567890".to_string()),
        cpt_code: Some("99213".to_string()),
        icd10_code: Some("I10".to_string()),
        claim_amount: Some(250.0),
        service_date: Some(service),
        submission_date: Some(service + Days::new(10)),
        claim_status: Some("PAID".to_string()),
        denial_reason: None,
        patient_dob: NaiveDate::from_ymd_opt(1970, 1, 1),
        patient_zip: Some("98101".to_string()),
        patient_gender: Some("F".to_string()),
    }
}

/// Seeded generator of realistic claims with an optional anomaly rate.
#[derive(Debug)]
pub struct ClaimGenerator {
    rng: StdRng,
    seed: u64,
    as_of: NaiveDate,
    anomaly_rate: f64,
    next_id: u64,
}

impl ClaimGenerator {
    pub fn new(seed: u64, as_of: NaiveDate) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            seed,
            as_of,
            anomaly_rate: 0.0,
            next_id: 0,
        }
    }

    /// Fraction of generated claims that receive an injected anomaly,
    /// clamped to `[0, 1]`.
    #[must_use]
    pub fn with_anomaly_rate(mut self, rate: f64) -> Self {
        self.anomaly_rate = if rate.is_nan() { 0.0 } else { rate.clamp(0.0, 1.0) };
        self
    }

    /// Generate a batch where roughly 60% of members are distinct.
    pub fn generate_batch(&mut self, count: usize) -> Vec<Claim> {
        let member_count = (count * 6 / 10).max(1);
        let members: Vec<String> = (0..member_count)
            .map(|_| format!("MBR{}", self.rng.gen_range(100_000..=999_999)))
            .collect();
        (0..count)
            .map(|idx| {
                let member = match members.get(idx) {
                    Some(member) => member.clone(),
                    None => members
                        .choose(&mut self.rng)
                        .cloned()
                        .unwrap_or_else(|| "MBR100000".to_string()),
                };
                self.generate_claim(member)
            })
            .collect()
    }

    /// Generate one claim for `member_id`, possibly with an injected anomaly.
    pub fn generate_claim(&mut self, member_id: String) -> Claim {
        let cpt = CPT_CODES.choose(&mut self.rng).copied().unwrap_or("99213");
        let mut claim = self.clean_claim(member_id, cpt);
        claim.claim_amount = Some(amount_for_cpt(&mut self.rng, cpt));
        if self.anomaly_rate > 0.0 && self.rng.gen_bool(self.anomaly_rate) {
            let kind = AnomalyKind::ALL
                .choose(&mut self.rng)
                .copied()
                .unwrap_or(AnomalyKind::InvalidNpi);
            self.inject(&mut claim, kind);
        }
        claim
    }

    /// `count` clean claims sharing one procedure code, with amounts spread
    /// uniformly within `center ± spread`.
    pub fn peer_group(&mut self, cpt: &str, count: usize, center: f64, spread: f64) -> Vec<Claim> {
        (0..count)
            .map(|idx| {
                let mut claim = self.clean_claim(format!("MBR{:06}", 200_000 + idx), cpt);
                let offset = if spread > 0.0 {
                    self.rng.gen_range(-spread..=spread)
                } else {
                    0.0
                };
                claim.claim_amount = Some(round_cents(center + offset));
                claim
            })
            .collect()
    }

    /// Apply one anomaly to an existing claim.
    pub fn inject(&mut self, claim: &mut Claim, kind: AnomalyKind) {
        match kind {
            AnomalyKind::InvalidNpi => claim.provider_npi = Some("000000000".to_string()),
            AnomalyKind::NegativeAmount => {
                claim.claim_amount = claim.claim_amount.map(|amount| -amount.abs());
            }
            AnomalyKind::FutureDate => {
                let ahead = Days::new(self.rng.gen_range(1..=30));
                claim.service_date = Some(self.as_of + ahead);
            }
            AnomalyKind::InvalidCpt => claim.cpt_code = Some("INVALID".to_string()),
            AnomalyKind::MissingDiagnosis => claim.icd10_code = Some(String::new()),
            AnomalyKind::ExcessiveAmount => {
                let factor = self.rng.gen_range(10.0..100.0);
                claim.claim_amount = claim.claim_amount.map(|amount| round_cents(amount * factor));
            }
        }
    }

    fn clean_claim(&mut self, member_id: String, cpt: &str) -> Claim {
        self.next_id += 1;
        let service = self.as_of - Days::new(self.rng.gen_range(0..=90));
        let submission = service + Days::new(self.rng.gen_range(1..=30));
        let status = self.pick_status();
        let denial_reason = if status == "DENIED" {
            DENIAL_REASONS.choose(&mut self.rng).map(|r| (*r).to_string())
        } else {
            None
        };
        let dob = self.as_of - Days::new(self.rng.gen_range(18 * 365..=90 * 365));
        Claim {
            claim_id: format!("CLM-{:x}-{:06}", self.seed, self.next_id),
            member_id: Some(member_id),
            provider_id: Some(format!("PRV{}", self.rng.gen_range(10_000..=99_999))),
            provider_npi: Some(self.rng.gen_range(1_000_000_000u64..=9_999_999_999).to_string()),
            cpt_code: Some(cpt.to_string()),
            icd10_code: ICD10_CODES.choose(&mut self.rng).map(|c| (*c).to_string()),
            claim_amount: None,
            service_date: Some(service),
            submission_date: Some(submission),
            claim_status: Some(status.to_string()),
            denial_reason,
            patient_dob: Some(dob),
            patient_zip: Some(self.zip()),
            patient_gender: GENDERS.choose(&mut self.rng).map(|g| (*g).to_string()),
        }
    }

    fn pick_status(&mut self) -> &'static str {
        match WeightedIndex::new(STATUS_WEIGHTS) {
            Ok(dist) => STATUSES[dist.sample(&mut self.rng)],
            Err(_) => STATUSES[0],
        }
    }

    fn zip(&mut self) -> String {
        let base = self.rng.gen_range(10_000..=99_999);
        if self.rng.gen_bool(0.2) {
            format!("{base}-{:04}", self.rng.gen_range(0..=9_999))
        } else {
            base.to_string()
        }
    }
}

/// Amount range by procedure family.
fn amount_for_cpt(rng: &mut StdRng, cpt: &str) -> f64 {
    let (low, high) = match cpt {
        c if c.starts_with("99") => (100.0, 500.0),
        c if c.starts_with("45") => (1_000.0, 5_000.0),
        c if c.starts_with("93") => (200.0, 1_500.0),
        c if c.starts_with("80") || c.starts_with("85") => (50.0, 300.0),
        c if c.starts_with("70") || c.starts_with("71") => (500.0, 3_000.0),
        c if c.starts_with("77") => (200.0, 800.0),
        c if c.starts_with("36") => (25.0, 100.0),
        c if c.starts_with("90") => (30.0, 150.0),
        c if c.starts_with('J') => (100.0, 5_000.0),
        _ => (100.0, 1_000.0),
    };
    round_cents(rng.gen_range(low..=high))
}

fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
