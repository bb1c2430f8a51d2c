//! Claim CSV writer. Column order follows [`CLAIM_COLUMNS`].

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use chrono::NaiveDate;
use csv::{Writer, WriterBuilder};
use dqad_model::Claim;

use crate::error::IngestError;
use crate::reader::CLAIM_COLUMNS;

/// Cells for one claim, aligned with [`CLAIM_COLUMNS`]. Absent values are empty.
pub fn claim_cells(claim: &Claim) -> Vec<String> {
    let text = |value: &Option<String>| value.clone().unwrap_or_default();
    let date = |value: Option<NaiveDate>| {
        value
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_default()
    };
    vec![
        claim.claim_id.clone(),
        text(&claim.member_id),
        text(&claim.provider_id),
        text(&claim.provider_npi),
        text(&claim.cpt_code),
        text(&claim.icd10_code),
        claim.amount().map(|a| a.to_string()).unwrap_or_default(),
        date(claim.service_date),
        date(claim.submission_date),
        text(&claim.claim_status),
        text(&claim.denial_reason),
        date(claim.patient_dob),
        text(&claim.patient_zip),
        text(&claim.patient_gender),
    ]
}

/// CSV writer that emits the claim columns followed by caller-defined extras.
pub struct ClaimCsvWriter<W: Write> {
    inner: Writer<W>,
    sink_name: String,
    extra_width: usize,
}

impl<W: Write> ClaimCsvWriter<W> {
    /// Write the header row immediately.
    pub fn new(sink: W, sink_name: &str, extra_columns: &[&str]) -> Result<Self, IngestError> {
        let mut inner = WriterBuilder::new().has_headers(false).from_writer(sink);
        let header = CLAIM_COLUMNS.iter().chain(extra_columns.iter());
        inner
            .write_record(header)
            .map_err(|e| IngestError::csv(sink_name, e))?;
        Ok(Self {
            inner,
            sink_name: sink_name.to_string(),
            extra_width: extra_columns.len(),
        })
    }

    /// Append one claim. `extras` must match the extra header columns.
    pub fn write(&mut self, claim: &Claim, extras: &[String]) -> Result<(), IngestError> {
        debug_assert_eq!(extras.len(), self.extra_width);
        let mut row = claim_cells(claim);
        row.extend(extras.iter().cloned());
        self.inner
            .write_record(&row)
            .map_err(|e| IngestError::csv(&self.sink_name, e))
    }

    pub fn finish(mut self) -> Result<(), IngestError> {
        self.inner.flush().map_err(|e| IngestError::Io {
            path: self.sink_name.clone().into(),
            source: e,
        })
    }
}

/// Write plain claims (no extra columns) to any sink.
pub fn write_claims<W: Write>(sink: W, sink_name: &str, claims: &[Claim]) -> Result<(), IngestError> {
    let mut writer = ClaimCsvWriter::new(sink, sink_name, &[])?;
    for claim in claims {
        writer.write(claim, &[])?;
    }
    writer.finish()
}

/// Write plain claims to a file, replacing it if it exists.
pub fn write_claims_file(path: &Path, claims: &[Claim]) -> Result<(), IngestError> {
    let file = File::create(path).map_err(|e| IngestError::io(path, e))?;
    write_claims(BufWriter::new(file), &path.display().to_string(), claims)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_fields_are_empty_cells() {
        let mut claim = Claim::new("C1");
        claim.claim_amount = Some(-12.5);
        claim.service_date = NaiveDate::from_ymd_opt(2024, 1, 2);

        let mut out = Vec::new();
        write_claims(&mut out, "memory", &[claim]).unwrap();
        let text = String::from_utf8(out).unwrap();
        let mut lines = text.lines();

        assert_eq!(lines.next(), Some(CLAIM_COLUMNS.join(",").as_str()));
        assert_eq!(lines.next(), Some("C1,,,,,,-12.5,2024-01-02,,,,,,"));
        assert_eq!(lines.next(), None);
    }

    #[test]
    fn extra_columns_follow_claim_columns() {
        let mut out = Vec::new();
        let mut writer = ClaimCsvWriter::new(&mut out, "memory", &["dq_issues"]).unwrap();
        writer
            .write(&Claim::new("C9"), &["INVALID_ZIP;MISSING_NPI".to_string()])
            .unwrap();
        writer.finish().unwrap();

        let text = String::from_utf8(out).unwrap();
        assert!(text.lines().next().unwrap().ends_with(",patient_gender,dq_issues"));
        assert!(text.lines().nth(1).unwrap().ends_with(",INVALID_ZIP;MISSING_NPI"));
    }
}
