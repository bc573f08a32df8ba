use serde::{Deserialize, Serialize};

/// One row of a names dataset: a surname and its country of origin.
/// Immutable once loaded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NameRecord {
    pub name:    String,
    pub country: String,
}

impl NameRecord {
    pub fn new(name: impl Into<String>, country: impl Into<String>) -> Self {
        Self {
            name:    name.into(),
            country: country.into(),
        }
    }

    /// Length of the name in characters, which is also its encoded length.
    pub fn name_len(&self) -> usize {
        self.name.chars().count()
    }
}
