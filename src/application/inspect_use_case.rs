// ============================================================
// Layer 2: InspectUseCase
// ============================================================
// Loads one split and summarises it without training:
// record count, number of countries and records per country.

use anyhow::Result;

use crate::data::{dataset::NameDataset, loader::CsvGzLoader};
use crate::domain::traits::RecordSource;

/// Summary of one dataset file.
#[derive(Debug, Clone, PartialEq)]
pub struct DatasetSummary {
    pub records:   usize,
    /// (country, records) in vocabulary order
    pub countries: Vec<(String, usize)>,
    pub longest_name: usize,
}

impl DatasetSummary {
    pub fn country_count(&self) -> usize {
        self.countries.len()
    }
}

pub struct InspectUseCase {
    file: String,
}

impl InspectUseCase {
    pub fn new(file: impl Into<String>) -> Self {
        Self { file: file.into() }
    }

    pub fn execute(&self) -> Result<DatasetSummary> {
        tracing::info!("Inspecting '{}'", self.file);
        let dataset = NameDataset::training(CsvGzLoader::new(&self.file).load_records()?);

        let countries = dataset
            .country_counts()
            .into_iter()
            .map(|(country, n)| (country.to_string(), n))
            .collect();
        let longest_name = dataset
            .records()
            .iter()
            .map(|r| r.name_len())
            .max()
            .unwrap_or(0);

        Ok(DatasetSummary {
            records: dataset.record_count(),
            countries,
            longest_name,
        })
    }
}
