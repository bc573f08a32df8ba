// ============================================================
// Layer 2: TrainUseCase
// ============================================================
// Orchestrates one training run end to end:
//
//   Step 1: Load the training split     (Layer 4 - data)
//   Step 2: Load the test split against
//           the training vocabulary     (Layer 4 - data)
//   Step 3: Prepare the output dir      (Layer 6 - infra)
//   Step 4: Build the TrainingContext   (Layer 5 - ml)
//   Step 5: Train / evaluate N epochs   (Layer 5 - ml)
//   Step 6: Accuracy chart              (Layer 6 - infra)
//   Step 7: Classify requested names    (Layer 5 - ml)
//
// Reference: Rust Book §13 (Iterators and Closures)
//            Burn Book §5 (Training)

use anyhow::{ensure, Context, Result};
use burn::module::AutodiffModule;
use serde::{Deserialize, Serialize};

use crate::data::dataset::NameDataset;
use crate::domain::traits::{CountryClassifier, Prediction};
use crate::infra::{
    chart::write_accuracy_chart,
    metrics::EpochMetrics,
    run_store::RunDirectory,
};
use crate::ml::{
    model::{HiddenPolicy, NameClassifierConfig},
    predictor::Predictor,
    trainer::{build_context, run_epochs, LoopSettings, TrainBackend},
};

// ─── Defaults ────────────────────────────────────────────────────────────────
pub const EMBEDDING_SIZE: usize = 100;
pub const HIDDEN_SIZE:    usize = 100;
pub const BATCH_SIZE:     usize = 256;
pub const N_LAYER:        usize = 2;
/// ASCII
pub const N_CHARS:        usize = 128;
pub const EPOCHS:         usize = 30;
pub const LEARNING_RATE:  f64   = 0.001;
pub const SEED:           u64   = 42;

pub const TRAIN_FILE: &str = "names_train.csv.gz";
pub const TEST_FILE:  &str = "names_test.csv.gz";
pub const OUTPUT_DIR: &str = "runs";

// ─── Training Configuration ──────────────────────────────────────────────────
// Everything a run was started with. Saved as JSON next to the
// metrics so a run can be reproduced.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainConfig {
    pub train_file:     String,
    pub test_file:      String,
    pub output_dir:     String,
    pub epochs:         usize,
    pub batch_size:     usize,
    pub lr:             f64,
    pub embedding_size: usize,
    pub hidden_size:    usize,
    pub num_layers:     usize,
    pub n_chars:        usize,
    pub bidirectional:  bool,
    pub hidden_policy:  HiddenPolicy,
    pub seed:           u64,
    /// Names to classify once training finishes
    pub classify:       Vec<String>,
}

impl Default for TrainConfig {
    fn default() -> Self {
        Self {
            train_file:     TRAIN_FILE.to_string(),
            test_file:      TEST_FILE.to_string(),
            output_dir:     OUTPUT_DIR.to_string(),
            epochs:         EPOCHS,
            batch_size:     BATCH_SIZE,
            lr:             LEARNING_RATE,
            embedding_size: EMBEDDING_SIZE,
            hidden_size:    HIDDEN_SIZE,
            num_layers:     N_LAYER,
            n_chars:        N_CHARS,
            bidirectional:  true,
            hidden_policy:  HiddenPolicy::Concatenate,
            seed:           SEED,
            classify:       Vec::new(),
        }
    }
}

impl TrainConfig {
    /// Reject settings that cannot build a model or a data loader.
    pub fn validate(&self) -> Result<()> {
        ensure!(self.num_layers > 0, "num_layers must be at least 1");
        ensure!(self.batch_size > 0, "batch_size must be at least 1");
        ensure!(self.hidden_size > 0, "hidden_size must be at least 1");
        ensure!(self.embedding_size > 0, "embedding_size must be at least 1");
        ensure!(self.n_chars > 0, "n_chars must be at least 1");
        ensure!(
            self.lr.is_finite() && self.lr > 0.0,
            "learning rate must be a positive number, got {}",
            self.lr
        );
        Ok(())
    }

    pub fn model_config(&self, num_classes: usize) -> NameClassifierConfig {
        NameClassifierConfig::new(
            self.n_chars,
            self.embedding_size,
            self.hidden_size,
            self.num_layers,
            num_classes,
        )
        .with_bidirectional(self.bidirectional)
        .with_hidden_policy(self.hidden_policy)
    }

    pub fn loop_settings(&self) -> LoopSettings {
        LoopSettings {
            batch_size:    self.batch_size,
            learning_rate: self.lr,
            seed:          self.seed,
        }
    }
}

/// What a finished run hands back to the CLI.
#[derive(Debug, Clone)]
pub struct TrainReport {
    pub history:     Vec<EpochMetrics>,
    pub predictions: Vec<Prediction>,
}

// ─── TrainUseCase ─────────────────────────────────────────────────────────────
pub struct TrainUseCase {
    config: TrainConfig,
}

impl TrainUseCase {
    pub fn new(config: TrainConfig) -> Self {
        Self { config }
    }

    pub fn execute(&self) -> Result<TrainReport> {
        let cfg = &self.config;
        cfg.validate()?;

        // ── Step 1: Training split ───────────────────────────────────────────
        tracing::info!("Loading training data from '{}'", cfg.train_file);
        let train = NameDataset::load_training(&cfg.train_file)?;
        tracing::info!(
            "Loaded {} training names across {} countries",
            train.record_count(),
            train.countries_num()
        );
        tracing::debug!("Countries: {}", train.vocabulary().countries().join(", "));

        // ── Step 2: Test split, indexed by the training vocabulary ───────────
        tracing::info!("Loading test data from '{}'", cfg.test_file);
        let test = NameDataset::load_evaluation(&cfg.test_file, train.vocabulary())
            .with_context(|| format!("Test split '{}' does not match training labels", cfg.test_file))?;
        tracing::info!("Loaded {} test names", test.record_count());

        // ── Step 3: Output directory ─────────────────────────────────────────
        let run_dir = RunDirectory::new(&cfg.output_dir)?;
        run_dir.save_config(cfg)?;
        let logger = run_dir.metrics_logger()?;
        tracing::info!(
            "Writing run artefacts to '{}' (metrics in '{}')",
            run_dir.path().display(),
            logger.csv_path().display()
        );

        // ── Step 4: Model, optimiser and loaders ─────────────────────────────
        if cfg.bidirectional && cfg.hidden_policy == HiddenPolicy::DuplicateLast {
            tracing::warn!(
                "Hidden policy 'duplicate-last' discards the forward direction's final state"
            );
        }
        let model_cfg = cfg.model_config(train.countries_num());
        let mut ctx = build_context::<TrainBackend>(
            &model_cfg,
            &cfg.loop_settings(),
            train,
            test,
            Default::default(),
        );

        // ── Step 5: Epochs ───────────────────────────────────────────────────
        tracing::info!("Training for {} epochs", cfg.epochs);
        let history = run_epochs(&mut ctx, cfg.epochs, &logger)?;

        // ── Step 6: Chart ────────────────────────────────────────────────────
        let accuracy: Vec<f64> = history.iter().map(|m| m.accuracy).collect();
        write_accuracy_chart(&run_dir.chart_path(), &accuracy)?;
        tracing::info!("Wrote accuracy chart to '{}'", run_dir.chart_path().display());

        // ── Step 7: Classify requested names ─────────────────────────────────
        let predictions = if cfg.classify.is_empty() {
            Vec::new()
        } else {
            let predictor = Predictor::new(
                ctx.model().valid(),
                ctx.vocabulary(),
                ctx.device().clone(),
            );
            predictor.classify(&cfg.classify)?
        };

        Ok(TrainReport { history, predictions })
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use flate2::{write::GzEncoder, Compression};
    use std::{io::Write, path::Path};

    fn write_gz(path: &Path, body: &str) {
        let file    = std::fs::File::create(path).unwrap();
        let mut enc = GzEncoder::new(file, Compression::default());
        enc.write_all(body.as_bytes()).unwrap();
        enc.finish().unwrap();
    }

    fn tiny_config(dir: &Path) -> TrainConfig {
        let train = dir.join("train.csv.gz");
        let test  = dir.join("test.csv.gz");
        write_gz(&train, "Nakamura,Japanese\nKowalski,Polish\nSato,Japanese\nNowak,Polish\n");
        write_gz(&test, "Tanaka,Japanese\nWojcik,Polish\n");

        TrainConfig {
            train_file:     train.to_string_lossy().to_string(),
            test_file:      test.to_string_lossy().to_string(),
            output_dir:     dir.join("run").to_string_lossy().to_string(),
            epochs:         2,
            batch_size:     2,
            embedding_size: 8,
            hidden_size:    8,
            classify:       vec!["Suzuki".to_string()],
            ..TrainConfig::default()
        }
    }

    #[test]
    fn test_default_config_is_baseline_setup() {
        let cfg = TrainConfig::default();
        assert_eq!(cfg.epochs, 30);
        assert_eq!(cfg.batch_size, 256);
        assert_eq!((cfg.embedding_size, cfg.hidden_size, cfg.num_layers), (100, 100, 2));
        assert_eq!(cfg.n_chars, 128);
        assert!(cfg.bidirectional);
        assert_eq!(cfg.hidden_policy, HiddenPolicy::Concatenate);
    }

    #[test]
    fn test_execute_writes_run_artifacts() {
        let _rng = crate::ml::rng_guard();
        let dir    = tempfile::tempdir().unwrap();
        let cfg    = tiny_config(dir.path());
        let report = TrainUseCase::new(cfg).execute().unwrap();

        assert_eq!(report.history.len(), 2);
        assert!(report.history.iter().all(|m| (0.0..=1.0).contains(&m.accuracy)));

        assert_eq!(report.predictions.len(), 1);
        assert!(["Japanese", "Polish"].contains(&report.predictions[0].country.as_str()));

        let run = dir.path().join("run");
        assert!(run.join("train_config.json").is_file());
        assert!(run.join("accuracy.svg").is_file());
        let metrics = std::fs::read_to_string(run.join("metrics.csv")).unwrap();
        assert_eq!(metrics.lines().count(), 3);
    }

    #[test]
    fn test_unknown_test_country_fails_before_training() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = tiny_config(dir.path());
        write_gz(Path::new(&cfg.test_file), "Dubois,French\n");

        let err = TrainUseCase::new(cfg).execute().unwrap_err();
        assert!(format!("{err:#}").contains("French"));
        assert!(!dir.path().join("run").exists());
    }

    #[test]
    fn test_missing_training_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = TrainConfig {
            train_file: dir.path().join("nope.csv.gz").to_string_lossy().to_string(),
            ..TrainConfig::default()
        };
        assert!(TrainUseCase::new(cfg).execute().is_err());
    }

    #[test]
    fn test_zero_layers_is_an_error_not_a_panic() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = TrainConfig { num_layers: 0, ..tiny_config(dir.path()) };

        let err = TrainUseCase::new(cfg).execute().unwrap_err();
        assert!(err.to_string().contains("num_layers"));
        assert!(!dir.path().join("run").exists());
    }

    #[test]
    fn test_validate_rejects_empty_dimensions() {
        let base = TrainConfig::default();
        assert!(base.validate().is_ok());

        let broken = [
            TrainConfig { batch_size: 0, ..base.clone() },
            TrainConfig { hidden_size: 0, ..base.clone() },
            TrainConfig { embedding_size: 0, ..base.clone() },
            TrainConfig { n_chars: 0, ..base.clone() },
            TrainConfig { lr: 0.0, ..base.clone() },
            TrainConfig { lr: f64::NAN, ..base.clone() },
        ];
        for cfg in broken {
            assert!(cfg.validate().is_err(), "accepted {cfg:?}");
        }
    }
}
