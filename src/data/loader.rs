// ============================================================
// Layer 4: Names Loader
// ============================================================
// Reads a gzip-compressed CSV file of surnames.
//
// File format (no header row):
//   Abl,Czech
//   Adsit,Czech
//   Ajdrna,Czech
//   ...
//
// Column 0 is the name, column 1 the country. Any further
// columns are ignored. The stream is decompressed with
// flate2's GzDecoder and parsed with the csv crate.
//
// Every failure here is fatal for the run: a missing file,
// a corrupt gzip stream, or a single malformed row stops
// loading with a DatasetError. Nothing is skipped.
//
// Reference: Rust Book §9 (Error Handling)
//            flate2 / csv crate documentation

use anyhow::Result;
use flate2::read::GzDecoder;
use std::{
    fs::File,
    io::Read,
    path::{Path, PathBuf},
};
use thiserror::Error;

use crate::domain::record::NameRecord;
use crate::domain::traits::RecordSource;

// ─── DatasetError ─────────────────────────────────────────────────────────────
/// Everything that can go wrong while turning a file into records.
#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("cannot open dataset '{}'", .path.display())]
    Open {
        path:   PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Raised for unreadable CSV and for corrupt gzip data,
    /// which surfaces as an I/O error inside the CSV reader.
    #[error("cannot read CSV data from '{}'", .path.display())]
    Read {
        path:   PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("dataset '{}' contains no records", .path.display())]
    Empty { path: PathBuf },

    #[error("malformed record at line {line}: {reason}")]
    MalformedRecord { line: u64, reason: String },

    #[error("record {index} has country '{country}', which is not in the training vocabulary")]
    UnknownCountry { index: usize, country: String },
}

// ─── CsvGzLoader ──────────────────────────────────────────────────────────────
/// Loads one split (train or test) from a `.csv.gz` file.
pub struct CsvGzLoader {
    path: PathBuf,
}

impl CsvGzLoader {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Same as `load_records`, but keeps the typed error.
    pub fn read(&self) -> Result<Vec<NameRecord>, DatasetError> {
        let file = File::open(&self.path).map_err(|source| DatasetError::Open {
            path: self.path.clone(),
            source,
        })?;

        let records = parse_records(GzDecoder::new(file), &self.path)?;
        if records.is_empty() {
            return Err(DatasetError::Empty { path: self.path.clone() });
        }

        tracing::debug!("Read {} records from '{}'", records.len(), self.path.display());
        Ok(records)
    }
}

impl RecordSource for CsvGzLoader {
    fn load_records(&self) -> Result<Vec<NameRecord>> {
        Ok(self.read()?)
    }
}

/// Parse decompressed CSV rows into records.
///
/// `source` is only used to label errors.
pub fn parse_records<R: Read>(reader: R, source: &Path) -> Result<Vec<NameRecord>, DatasetError> {
    // flexible(true): rows may carry trailing columns we ignore
    let mut csv = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(reader);

    let mut records = Vec::new();

    for row in csv.records() {
        let row = row.map_err(|source_err| DatasetError::Read {
            path:   source.to_path_buf(),
            source: source_err,
        })?;
        let line = row.position().map(|p| p.line()).unwrap_or(0);

        let (name, country) = match (row.get(0), row.get(1)) {
            (Some(name), Some(country)) => (name, country),
            _ => {
                return Err(DatasetError::MalformedRecord {
                    line,
                    reason: format!("expected at least 2 columns, found {}", row.len()),
                })
            }
        };

        if name.is_empty() {
            return Err(DatasetError::MalformedRecord {
                line,
                reason: "empty name".to_string(),
            });
        }
        if country.is_empty() {
            return Err(DatasetError::MalformedRecord {
                line,
                reason: format!("empty country for name '{name}'"),
            });
        }
        // Character codes feed a 128-entry embedding table,
        // so anything outside ASCII cannot be encoded.
        if !name.is_ascii() {
            return Err(DatasetError::MalformedRecord {
                line,
                reason: format!("name '{name}' contains non-ASCII characters"),
            });
        }

        records.push(NameRecord::new(name, country));
    }

    Ok(records)
}
