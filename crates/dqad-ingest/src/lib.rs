//! Claim batch loading and writing.
//!
//! Reading is header-driven and lenient: cells that do not parse become absent
//! values and are counted in [`IngestWarnings`], so every row still reaches
//! validation.

mod error;
pub mod parse;
mod reader;
mod writer;

pub use error::IngestError;
pub use reader::{CLAIM_COLUMNS, IngestWarnings, IngestedBatch, read_claims, read_claims_from};
pub use writer::{ClaimCsvWriter, claim_cells, write_claims, write_claims_file};
