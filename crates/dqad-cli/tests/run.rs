//! End-to-end batch runs against files on disk.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Days, NaiveDate, TimeZone, Utc};
use dqad_cli::output::{METRICS_FILE, run_file_name};
use dqad_cli::pipeline::{EXIT_ANOMALIES, RunOptions, run_batch};
use dqad_fixtures::valid_claim;
use dqad_ingest::write_claims_file;
use dqad_model::{Claim, DqThresholds, IssueCode};
use tempfile::TempDir;

fn evaluated_at() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
}

fn as_of() -> NaiveDate {
    evaluated_at().date_naive()
}

/// Twenty ordinary office visits, one extreme bill for the same code, one
/// negative amount. One clean claim falls in April.
fn batch() -> Vec<Claim> {
    let mut claims: Vec<Claim> = (1..=20)
        .map(|n| {
            let mut claim = valid_claim(&format!("G{n:02}"), as_of());
            claim.claim_amount = Some(100.0);
            claim
        })
        .collect();
    let april = NaiveDate::from_ymd_opt(2024, 4, 15).unwrap();
    claims[19].service_date = Some(april);
    claims[19].submission_date = Some(april + Days::new(5));

    let mut outlier = valid_claim("Q1", as_of());
    outlier.claim_amount = Some(10_000.0);
    claims.push(outlier);

    let mut negative = valid_claim("S1", as_of());
    negative.claim_amount = Some(-250.0);
    claims.push(negative);
    claims
}

fn write_input(dir: &Path) -> PathBuf {
    let input = dir.join("claims.csv");
    write_claims_file(&input, &batch()).unwrap();
    input
}

fn options(input: PathBuf, output_dir: Option<PathBuf>) -> RunOptions {
    RunOptions {
        input,
        output_dir,
        thresholds: DqThresholds::default(),
        evaluated_at: evaluated_at(),
        as_of: None,
    }
}

fn data_rows(path: &Path) -> usize {
    fs::read_to_string(path).unwrap().lines().count() - 1
}

#[test]
fn run_writes_every_tier_and_metrics() {
    let dir = TempDir::new().unwrap();
    let input = write_input(dir.path());
    let out = dir.path().join("out");

    let result = run_batch(&options(input.clone(), Some(out.clone()))).unwrap();

    let metrics = &result.outcome.metrics;
    assert_eq!(metrics.total_records, 22);
    assert_eq!(metrics.gold_records, 20);
    assert_eq!(metrics.silver_records, 1);
    assert_eq!(metrics.quarantine_records, 1);
    assert!(result.has_anomalies());
    assert_eq!(result.issues.len(), 1);
    assert_eq!(result.issues[0].code, IssueCode::NegativeAmount);

    let file_name = run_file_name(evaluated_at());
    assert_eq!(file_name, "claims-20240601T120000.000000Z.csv");
    let may = out.join("gold/year=2024/month=05").join(&file_name);
    let april = out.join("gold/year=2024/month=04").join(&file_name);
    assert_eq!(data_rows(&may), 19);
    assert_eq!(data_rows(&april), 1);

    let paths = result.outputs.unwrap();
    assert_eq!(paths.gold, vec![april, may]);
    assert_eq!(paths.file_count(), 5);

    let quarantine = fs::read_to_string(out.join("quarantine").join(&file_name)).unwrap();
    let mut lines = quarantine.lines();
    let header: Vec<&str> = lines.next().unwrap().split(',').collect();
    let row: Vec<&str> = lines.next().unwrap().split(',').collect();
    let column = |name: &str| header.iter().position(|h| *h == name).unwrap();
    assert_eq!(row[column("claim_id")], "Q1");
    assert_eq!(row[column("anomaly_type")], "STATISTICAL_OUTLIER");
    assert!(row[column("anomaly_details")].starts_with("Z-score: "));
    let z: f64 = row[column("z_score")].parse().unwrap();
    assert!(z > 3.0);

    let json: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(out.join(METRICS_FILE)).unwrap()).unwrap();
    assert_eq!(json["total_records"], 22);
    assert_eq!(json["total_anomalies"], 2);
    assert_eq!(json["source_identifier"], input.display().to_string());
    assert!(json["timestamp"].as_str().unwrap().starts_with("2024-06-01T12:00:00"));
}

#[test]
fn silver_file_carries_issues_and_lineage() {
    let dir = TempDir::new().unwrap();
    let input = write_input(dir.path());
    let out = dir.path().join("out");
    run_batch(&options(input.clone(), Some(out.clone()))).unwrap();

    let silver = fs::read_to_string(out.join("silver").join(run_file_name(evaluated_at())))
        .unwrap()
        .replace(&input.display().to_string(), "[SOURCE]");

    insta::assert_snapshot!(silver, @r"
    claim_id,member_id,provider_id,provider_npi,cpt_code,icd10_code,claim_amount,service_date,submission_date,claim_status,denial_reason,patient_dob,patient_zip,patient_gender,dq_issues,ingestion_timestamp,source_file
    S1,MBR100001,PRV10001,1234567890,99213,I10,-250,2024-05-02,2024-05-12,PAID,,1970-01-01,98101,F,NEGATIVE_AMOUNT,2024-06-01T12:00:00Z,[SOURCE]
    ");
}

#[test]
fn dry_run_writes_nothing() {
    let dir = TempDir::new().unwrap();
    let input = write_input(dir.path());

    let result = run_batch(&options(input, None)).unwrap();

    assert!(result.outputs.is_none());
    assert_eq!(result.outcome.metrics.total_records, 22);
    let entries: Vec<_> = fs::read_dir(dir.path()).unwrap().collect();
    assert_eq!(entries.len(), 1);
}

#[test]
fn all_gold_batch_writes_no_anomaly_tiers() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("clean.csv");
    let claims: Vec<Claim> = (0..5).map(|n| valid_claim(&format!("C{n}"), as_of())).collect();
    write_claims_file(&input, &claims).unwrap();
    let out = dir.path().join("out");

    let result = run_batch(&options(input, Some(out.clone()))).unwrap();

    assert!(!result.has_anomalies());
    assert!(result.issues.is_empty());
    assert!(!out.join("silver").exists());
    assert!(!out.join("quarantine").exists());
    assert_eq!(result.outputs.unwrap().file_count(), 2);
}

#[test]
fn fail_on_anomalies_sets_the_exit_status() {
    let dir = TempDir::new().unwrap();
    let anomalous = run_batch(&options(write_input(dir.path()), None)).unwrap();
    assert_eq!(anomalous.exit_status(true), EXIT_ANOMALIES);
    assert_eq!(anomalous.exit_status(false), 0);

    let clean_input = dir.path().join("clean.csv");
    let claims: Vec<Claim> = (0..5).map(|n| valid_claim(&format!("C{n}"), as_of())).collect();
    write_claims_file(&clean_input, &claims).unwrap();
    let clean = run_batch(&options(clean_input, None)).unwrap();
    assert_eq!(clean.exit_status(true), 0);
    assert_eq!(clean.exit_status(false), 0);
}

#[test]
fn as_of_moves_the_date_rules() {
    let dir = TempDir::new().unwrap();
    let input = write_input(dir.path());
    let mut run = options(input, None);
    run.as_of = NaiveDate::from_ymd_opt(2024, 5, 1);

    let result = run_batch(&run).unwrap();

    // every May service date is now in the future
    assert_eq!(result.outcome.metrics.gold_records, 1);
    assert_eq!(result.issues[0].code, IssueCode::FutureServiceDate);
}

#[test]
fn missing_claim_id_column_fails_the_run() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("bad.csv");
    fs::write(&input, "member_id,claim_amount\nM1,10\n").unwrap();

    let err = run_batch(&options(input, None)).unwrap_err();

    assert!(format!("{err:#}").contains("claim_id"));
}
