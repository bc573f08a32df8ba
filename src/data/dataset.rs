use std::{collections::BTreeMap, path::Path, sync::Arc};

use burn::data::dataset::Dataset;
use serde::{Deserialize, Serialize};

use crate::data::loader::{CsvGzLoader, DatasetError};
use crate::domain::{record::NameRecord, vocabulary::CountryVocabulary};

/// One dataset item as the DataLoader sees it: the raw name and
/// the class index of its country.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NameItem {
    pub name:    String,
    pub country: usize,
}

/// A loaded split plus the vocabulary its labels are indexed by.
///
/// The training split owns the vocabulary it was built from; the
/// test split borrows the same `Arc` so both agree on indices.
#[derive(Debug, Clone)]
pub struct NameDataset {
    records:    Vec<NameRecord>,
    vocabulary: Arc<CountryVocabulary>,
}

impl NameDataset {
    /// Build a training split: the vocabulary comes from its own labels.
    pub fn training(records: Vec<NameRecord>) -> Self {
        let vocabulary =
            CountryVocabulary::from_countries(records.iter().map(|r| r.country.as_str()));
        Self { records, vocabulary: Arc::new(vocabulary) }
    }

    /// Build an evaluation split against an existing vocabulary.
    /// Fails on the first country the vocabulary does not know.
    pub fn with_vocabulary(
        records:    Vec<NameRecord>,
        vocabulary: Arc<CountryVocabulary>,
    ) -> Result<Self, DatasetError> {
        if let Some((index, record)) = records
            .iter()
            .enumerate()
            .find(|(_, r)| vocabulary.country_to_index(&r.country).is_none())
        {
            return Err(DatasetError::UnknownCountry {
                index,
                country: record.country.clone(),
            });
        }
        Ok(Self { records, vocabulary })
    }

    pub fn load_training(path: impl AsRef<Path>) -> Result<Self, DatasetError> {
        let records = CsvGzLoader::new(path.as_ref()).read()?;
        Ok(Self::training(records))
    }

    pub fn load_evaluation(
        path:       impl AsRef<Path>,
        vocabulary: Arc<CountryVocabulary>,
    ) -> Result<Self, DatasetError> {
        let records = CsvGzLoader::new(path.as_ref()).read()?;
        Self::with_vocabulary(records, vocabulary)
    }

    pub fn record_count(&self) -> usize { self.records.len() }

    pub fn records(&self) -> &[NameRecord] { &self.records }

    pub fn vocabulary(&self) -> Arc<CountryVocabulary> { Arc::clone(&self.vocabulary) }

    pub fn countries_num(&self) -> usize { self.vocabulary.len() }

    /// Records per country, in vocabulary order.
    pub fn country_counts(&self) -> BTreeMap<&str, usize> {
        let mut counts = BTreeMap::new();
        for record in &self.records {
            *counts.entry(record.country.as_str()).or_insert(0) += 1;
        }
        counts
    }
}

impl Dataset<NameItem> for NameDataset {
    fn get(&self, index: usize) -> Option<NameItem> {
        let record  = self.records.get(index)?;
        let country = self.vocabulary.country_to_index(&record.country)?;
        Some(NameItem { name: record.name.clone(), country })
    }

    fn len(&self) -> usize {
        self.records.len()
    }
}
