// ============================================================
// Layer 3: Core Traits (Abstractions)
// ============================================================
// The application layer programs against these traits, not
// against the gzip/CSV loader or the Burn model directly.
//
// Reference: Rust Book §10 (Traits: Defining Shared Behaviour)

use anyhow::Result;

use crate::domain::record::NameRecord;

// ─── RecordSource ─────────────────────────────────────────────────────────────
/// Any component that can produce the ordered records of one split.
///
/// Implementations:
///   - CsvGzLoader → reads a gzip-compressed `name,country` CSV file
pub trait RecordSource {
    /// Load every record, in file order.
    /// Fails on the first unreadable or malformed row.
    fn load_records(&self) -> Result<Vec<NameRecord>>;
}

// ─── CountryClassifier ────────────────────────────────────────────────────────
/// A predicted country for one name.
#[derive(Debug, Clone, PartialEq)]
pub struct Prediction {
    pub name:       String,
    pub country:    String,
    /// Softmax probability of the predicted class, in [0, 1]
    pub confidence: f32,
}

/// Any component that can assign countries to surnames.
///
/// Implementations:
///   - Predictor → runs the trained GRU classifier
pub trait CountryClassifier {
    fn classify(&self, names: &[String]) -> Result<Vec<Prediction>>;
}
