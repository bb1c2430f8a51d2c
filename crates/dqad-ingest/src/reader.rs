//! Header-driven claim CSV reader.
//!
//! Only `claim_id` is required. Missing columns leave the field absent so
//! validation can flag it; extra columns are ignored.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::{ByteRecord, ReaderBuilder};
use dqad_model::Claim;
use tracing::{debug, warn};

use crate::error::IngestError;
use crate::parse::{normalize_cell, normalize_header, parse_amount, parse_date};

/// Column order used when writing claim files.
pub const CLAIM_COLUMNS: &[&str] = &[
    "claim_id",
    "member_id",
    "provider_id",
    "provider_npi",
    "cpt_code",
    "icd10_code",
    "claim_amount",
    "service_date",
    "submission_date",
    "claim_status",
    "denial_reason",
    "patient_dob",
    "patient_zip",
    "patient_gender",
];

/// Cells that were present but could not be parsed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IngestWarnings {
    pub unparsable_amounts: usize,
    pub unparsable_dates: usize,
    /// Rows with fewer cells than the header.
    pub short_rows: usize,
    /// Rows with no non-blank cell; these produce no claim.
    pub blank_rows: usize,
    /// Cells that were not valid UTF-8. They are decoded lossily.
    pub invalid_utf8_cells: usize,
}

impl IngestWarnings {
    pub fn total(&self) -> usize {
        self.unparsable_amounts
            + self.unparsable_dates
            + self.short_rows
            + self.blank_rows
            + self.invalid_utf8_cells
    }
}

/// Claims read from one source, in file order.
#[derive(Debug, Clone, Default)]
pub struct IngestedBatch {
    pub source_identifier: String,
    pub claims: Vec<Claim>,
    pub warnings: IngestWarnings,
}

#[derive(Debug, Default)]
struct ColumnMap {
    claim_id: usize,
    member_id: Option<usize>,
    provider_id: Option<usize>,
    provider_npi: Option<usize>,
    cpt_code: Option<usize>,
    icd10_code: Option<usize>,
    claim_amount: Option<usize>,
    service_date: Option<usize>,
    submission_date: Option<usize>,
    claim_status: Option<usize>,
    denial_reason: Option<usize>,
    patient_dob: Option<usize>,
    patient_zip: Option<usize>,
    patient_gender: Option<usize>,
    width: usize,
}

impl ColumnMap {
    fn from_headers(headers: &ByteRecord, source_name: &str) -> Result<Self, IngestError> {
        let names: Vec<String> = headers
            .iter()
            .map(|raw| normalize_header(&String::from_utf8_lossy(raw)))
            .collect();
        let find = |column: &str| names.iter().position(|name| name == column);
        let claim_id = find("claim_id").ok_or_else(|| IngestError::MissingColumn {
            source_name: source_name.to_string(),
            column: "claim_id",
        })?;
        Ok(Self {
            claim_id,
            member_id: find("member_id"),
            provider_id: find("provider_id"),
            provider_npi: find("provider_npi"),
            cpt_code: find("cpt_code"),
            icd10_code: find("icd10_code"),
            claim_amount: find("claim_amount"),
            service_date: find("service_date"),
            submission_date: find("submission_date"),
            claim_status: find("claim_status"),
            denial_reason: find("denial_reason"),
            patient_dob: find("patient_dob"),
            patient_zip: find("patient_zip"),
            patient_gender: find("patient_gender"),
            width: names.len(),
        })
    }
}

/// Read a claim CSV from disk. The path (as given) becomes the source identifier.
pub fn read_claims(path: &Path) -> Result<IngestedBatch, IngestError> {
    let file = File::open(path).map_err(|e| IngestError::io(path, e))?;
    read_claims_from(file, &path.display().to_string())
}

/// Read claims from any CSV source.
pub fn read_claims_from<R: Read>(reader: R, source_name: &str) -> Result<IngestedBatch, IngestError> {
    let mut csv_reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::None)
        .from_reader(reader);
    let headers = csv_reader
        .byte_headers()
        .map_err(|e| IngestError::csv(source_name, e))?
        .clone();
    let columns = ColumnMap::from_headers(&headers, source_name)?;

    let mut batch = IngestedBatch {
        source_identifier: source_name.to_string(),
        ..IngestedBatch::default()
    };
    for record in csv_reader.byte_records() {
        let record = record.map_err(|e| IngestError::csv(source_name, e))?;
        let cells = decode_cells(&record, &mut batch.warnings);
        if cells.iter().all(|cell| cell.trim().is_empty()) {
            batch.warnings.blank_rows += 1;
            continue;
        }
        if cells.len() < columns.width {
            batch.warnings.short_rows += 1;
        }
        let claim = claim_from_cells(&cells, &columns, &mut batch.warnings);
        batch.claims.push(claim);
    }

    if batch.warnings.total() > 0 {
        warn!(
            source = %source_name,
            unparsable_amounts = batch.warnings.unparsable_amounts,
            unparsable_dates = batch.warnings.unparsable_dates,
            short_rows = batch.warnings.short_rows,
            blank_rows = batch.warnings.blank_rows,
            invalid_utf8_cells = batch.warnings.invalid_utf8_cells,
            "some cells could not be parsed and were treated as absent"
        );
    }
    debug!(source = %source_name, rows = batch.claims.len(), "claims loaded");
    Ok(batch)
}

/// Decode every cell, replacing invalid UTF-8 sequences rather than failing the row.
fn decode_cells(record: &ByteRecord, warnings: &mut IngestWarnings) -> Vec<String> {
    record
        .iter()
        .map(|raw| match std::str::from_utf8(raw) {
            Ok(text) => text.to_string(),
            Err(_) => {
                warnings.invalid_utf8_cells += 1;
                String::from_utf8_lossy(raw).into_owned()
            }
        })
        .collect()
}

fn claim_from_cells(cells: &[String], columns: &ColumnMap, warnings: &mut IngestWarnings) -> Claim {
    let text = |idx: Option<usize>| {
        idx.and_then(|i| cells.get(i))
            .and_then(|cell| normalize_cell(cell))
    };
    let mut date = |idx: Option<usize>| {
        let raw = text(idx)?;
        let parsed = parse_date(&raw);
        if parsed.is_none() {
            warnings.unparsable_dates += 1;
        }
        parsed
    };

    let service_date = date(columns.service_date);
    let submission_date = date(columns.submission_date);
    let patient_dob = date(columns.patient_dob);

    let claim_amount = text(columns.claim_amount).and_then(|raw| {
        let parsed = parse_amount(&raw);
        if parsed.is_none() {
            warnings.unparsable_amounts += 1;
        }
        parsed
    });

    Claim {
        claim_id: text(Some(columns.claim_id)).unwrap_or_default(),
        member_id: text(columns.member_id),
        provider_id: text(columns.provider_id),
        provider_npi: text(columns.provider_npi),
        cpt_code: text(columns.cpt_code),
        icd10_code: text(columns.icd10_code),
        claim_amount,
        service_date,
        submission_date,
        claim_status: text(columns.claim_status),
        denial_reason: text(columns.denial_reason),
        patient_dob,
        patient_zip: text(columns.patient_zip),
        patient_gender: text(columns.patient_gender),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_claims_with_reordered_and_missing_columns() {
        let csv = "\u{feff}Claim_ID,claim_amount,service_date,extra\n\
                   C1,250.00,2024-03-15,x\n\
                   C2,oops,2024-13-01,y\n";
        let batch = read_claims_from(csv.as_bytes(), "inline.csv").unwrap();

        assert_eq!(batch.claims.len(), 2);
        assert_eq!(batch.claims[0].claim_id, "C1");
        assert_eq!(batch.claims[0].claim_amount, Some(250.0));
        assert_eq!(batch.claims[0].member_id, None);
        assert_eq!(batch.claims[1].claim_amount, None);
        assert_eq!(batch.claims[1].service_date, None);
        assert_eq!(batch.warnings.unparsable_amounts, 1);
        assert_eq!(batch.warnings.unparsable_dates, 1);
    }

    #[test]
    fn missing_claim_id_column_is_an_error() {
        let csv = "member_id,claim_amount\nM1,10\n";
        let err = read_claims_from(csv.as_bytes(), "bad.csv").unwrap_err();
        assert!(matches!(
            err,
            IngestError::MissingColumn {
                column: "claim_id",
                ..
            }
        ));
    }

    #[test]
    fn short_rows_and_blank_lines() {
        let csv = "claim_id,member_id,patient_zip\nC1,M1\n,,\nC2,M2,98101\n";
        let batch = read_claims_from(csv.as_bytes(), "short.csv").unwrap();
        assert_eq!(batch.claims.len(), 2);
        assert_eq!(batch.claims[0].patient_zip, None);
        assert_eq!(batch.claims[1].patient_zip.as_deref(), Some("98101"));
        assert_eq!(batch.warnings.short_rows, 1);
        assert_eq!(batch.warnings.blank_rows, 1);
    }

    #[test]
    fn invalid_utf8_cell_does_not_fail_the_batch() {
        let mut csv = b"claim_id,member_id,denial_reason\nC1,M1,ok\nC2,M2,".to_vec();
        csv.extend_from_slice(&[0xFF, 0xFE]);
        csv.extend_from_slice(b"\nC3,M3,ok\n");

        let batch = read_claims_from(csv.as_slice(), "latin1.csv").unwrap();

        let ids: Vec<&str> = batch.claims.iter().map(|c| c.claim_id.as_str()).collect();
        assert_eq!(ids, ["C1", "C2", "C3"]);
        assert_eq!(batch.claims[1].member_id.as_deref(), Some("M2"));
        assert_eq!(
            batch.claims[1].denial_reason.as_deref(),
            Some("\u{fffd}\u{fffd}")
        );
        assert_eq!(batch.warnings.invalid_utf8_cells, 1);
        assert_eq!(batch.warnings.total(), 1);
    }
}
