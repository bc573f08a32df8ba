// ============================================================
// Layer 6: Run Directory
// ============================================================
// Every artefact a training run leaves behind goes into one
// output directory:
//
//   runs/
//     train_config.json   ← settings the run was started with
//     metrics.csv         ← one row per epoch
//     accuracy.svg        ← test accuracy per epoch
//
// Weights are not persisted: a run trains, reports and exits.
//
// Reference: Rust Book §9 (Error Handling)
//            Rust Book §12 (I/O and File Handling)

use anyhow::{Context, Result};
use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::application::train_use_case::TrainConfig;
use crate::infra::metrics::MetricsLogger;

pub const CONFIG_FILE: &str = "train_config.json";
pub const CHART_FILE:  &str = "accuracy.svg";

pub struct RunDirectory {
    dir: PathBuf,
}

impl RunDirectory {
    /// Create the directory (and parents) if it doesn't exist yet.
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)
            .with_context(|| format!("Cannot create output directory '{}'", dir.display()))?;
        Ok(Self { dir })
    }

    pub fn path(&self) -> &Path {
        &self.dir
    }

    /// Write the run's settings as pretty-printed JSON.
    pub fn save_config(&self, cfg: &TrainConfig) -> Result<()> {
        let path = self.dir.join(CONFIG_FILE);
        let json = serde_json::to_string_pretty(cfg)?;

        fs::write(&path, json)
            .with_context(|| format!("Cannot write config to '{}'", path.display()))?;

        tracing::debug!("Saved training config to '{}'", path.display());
        Ok(())
    }

    pub fn metrics_logger(&self) -> Result<MetricsLogger> {
        MetricsLogger::new(self.dir.to_string_lossy().to_string())
    }

    pub fn chart_path(&self) -> PathBuf {
        self.dir.join(CHART_FILE)
    }
}
