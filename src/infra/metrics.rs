// ============================================================
// Layer 6: Metrics Logger
// ============================================================
// Appends one CSV row per epoch so a run can be plotted or
// compared after the fact.
//
// Columns:
//   epoch       1-based epoch number
//   train_loss  mean cross-entropy over the shuffled training pass
//   test_loss   mean cross-entropy over the evaluation pass
//   accuracy    correct / total on the evaluation split, in [0, 1]
//
// Example:
//   epoch,train_loss,test_loss,accuracy
//   1,1.912304,1.487710,0.551200
//   2,1.301872,1.190348,0.637400
//
// Reference: Rust Book §12 (I/O and File Handling)

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{
    fs::{self, OpenOptions},
    io::Write,
    path::PathBuf,
};

pub const METRICS_HEADER: &str = "epoch,train_loss,test_loss,accuracy";

/// One row of metrics for a single epoch
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EpochMetrics {
    pub epoch:      usize,
    pub train_loss: f64,
    pub test_loss:  f64,
    pub accuracy:   f64,
}

impl EpochMetrics {
    pub fn new(epoch: usize, train_loss: f64, test_loss: f64, accuracy: f64) -> Self {
        Self { epoch, train_loss, test_loss, accuracy }
    }

    /// True if this epoch beats the best accuracy seen so far
    pub fn is_improvement(&self, best_accuracy: f64) -> bool {
        self.accuracy > best_accuracy
    }

    pub fn to_csv_row(&self) -> String {
        format!(
            "{},{:.6},{:.6},{:.6}",
            self.epoch, self.train_loss, self.test_loss, self.accuracy
        )
    }
}

/// Earliest epoch with the highest accuracy.
pub fn best_epoch(history: &[EpochMetrics]) -> Option<&EpochMetrics> {
    history.iter().fold(None, |best, m| match best {
        Some(b) if !m.is_improvement(b.accuracy) => Some(b),
        _ => Some(m),
    })
}

/// Writes epoch metrics to `<dir>/metrics.csv`.
pub struct MetricsLogger {
    csv_path: PathBuf,
}

impl MetricsLogger {
    /// Create the directory if needed and start a fresh CSV with its header.
    ///
    /// An existing file is truncated: a run's CSV only ever holds that run.
    pub fn new(dir: impl Into<String>) -> Result<Self> {
        let dir = PathBuf::from(dir.into());
        fs::create_dir_all(&dir)
            .with_context(|| format!("Cannot create directory '{}'", dir.display()))?;

        let csv_path = dir.join("metrics.csv");
        let mut f = fs::File::create(&csv_path)
            .with_context(|| format!("Cannot create '{}'", csv_path.display()))?;
        writeln!(f, "{METRICS_HEADER}")?;
        tracing::debug!("Created metrics CSV: '{}'", csv_path.display());

        Ok(Self { csv_path })
    }

    /// Append one epoch's metrics as a new row.
    pub fn log(&self, m: &EpochMetrics) -> Result<()> {
        let mut f = OpenOptions::new()
            .append(true)
            .open(&self.csv_path)
            .with_context(|| format!("Cannot open '{}'", self.csv_path.display()))?;

        writeln!(f, "{}", m.to_csv_row())?;

        tracing::debug!(
            "Logged epoch {} metrics: train_loss={:.4}, accuracy={:.4}",
            m.epoch,
            m.train_loss,
            m.accuracy,
        );
        Ok(())
    }

    pub fn csv_path(&self) -> &PathBuf {
        &self.csv_path
    }
}
