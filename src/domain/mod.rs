// ============================================================
// Layer 3: Domain Layer
// ============================================================
// Plain Rust structs and traits describing what the system
// works with: surname records, the country vocabulary, and
// the abstractions other layers implement.
//
// Rules for this layer:
//   - NO Burn framework types allowed here
//   - NO file I/O or network calls
//   - Only plain Rust structs, enums, and traits
//
// Reference: Rust Book §5 (Structs), §10 (Traits)

// One (name, country) row of the dataset
pub mod record;

// Sorted country labels <-> contiguous class indices
pub mod vocabulary;

// Core abstractions (traits) that other layers implement
pub mod traits;
