// ============================================================
// Layer 3: Country Vocabulary
// ============================================================
// Maps each distinct country label to a class index.
//
// The labels are sorted before numbering so the mapping is
// stable for a given training file:
//
//   ["Irish", "Czech", "Irish", "Arabic"]
//       → ["Arabic", "Czech", "Irish"]
//       → Arabic=0, Czech=1, Irish=2
//
// Indices are contiguous from 0, so the classifier output
// layer has exactly `len()` logits.
//
// Reference: Rust Book §8 (Hash Maps)

use std::collections::{BTreeSet, HashMap};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CountryVocabulary {
    /// index → country, sorted ascending
    countries: Vec<String>,
    /// country → index
    index: HashMap<String, usize>,
}

impl CountryVocabulary {
    /// Build the vocabulary from every label in a split.
    /// Duplicates collapse; order of appearance does not matter.
    pub fn from_countries<'a, I>(labels: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        // BTreeSet gives us dedup and sorting in one pass
        let countries: Vec<String> = labels
            .into_iter()
            .collect::<BTreeSet<_>>()
            .into_iter()
            .map(str::to_string)
            .collect();

        let index = countries
            .iter()
            .enumerate()
            .map(|(i, c)| (c.clone(), i))
            .collect();

        Self { countries, index }
    }

    pub fn index_to_country(&self, index: usize) -> Option<&str> {
        self.countries.get(index).map(String::as_str)
    }

    pub fn country_to_index(&self, country: &str) -> Option<usize> {
        self.index.get(country).copied()
    }

    /// Number of distinct countries (= number of classes).
    pub fn len(&self) -> usize {
        self.countries.len()
    }

    /// All countries in index order.
    pub fn countries(&self) -> &[String] {
        &self.countries
    }
}
