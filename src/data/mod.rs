// ============================================================
// Layer 4: Data Pipeline
// ============================================================
// Everything from the compressed CSV files on disk to
// tensor batches on the device.
//
//   names_train.csv.gz / names_test.csv.gz
//       │
//       ▼
//   CsvGzLoader    → gunzips and parses rows into NameRecords
//       │
//       ▼
//   NameDataset    → labels as class indices, Burn's Dataset trait
//       │
//       ▼
//   NameBatcher    → encoder: codes, batch-local padding, transpose
//       │
//       ▼
//   DataLoader     → feeds NameBatches to the training loop
//
// Reference: Burn Book §4 (Datasets and Dataloaders)

/// Reads gzip-compressed `name,country` CSV files
pub mod loader;

/// Implements Burn's Dataset trait over loaded records
pub mod dataset;

/// Character codes, padding and time-major layout
pub mod encoder;

/// Implements Burn's Batcher trait to create tensor batches
pub mod batcher;
