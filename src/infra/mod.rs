// ============================================================
// Layer 6: Infrastructure Layer
// ============================================================
// Files a training run writes, kept apart from the model and
// data code:
//
//   run_store.rs  ── output directory and saved TrainConfig
//   metrics.rs    ── per-epoch CSV log
//   chart.rs      ── SVG accuracy-per-epoch chart
//
// Reference: Rust Book §7 (Modules)
//            Rust Book §9 (Error Handling with anyhow)

/// Output directory and run configuration
pub mod run_store;

/// Training metrics CSV logger
pub mod metrics;

/// Accuracy chart rendering
pub mod chart;
