// ============================================================
// Layer 5: Training and Evaluation Loops
// ============================================================
// A TrainingContext owns everything one run mutates or reads:
// the model, the Adam state, both data loaders and the label
// vocabulary. It is built once and passed explicitly; nothing
// lives in globals.
//
// Burn insights this file relies on:
//   - Training uses TrainBackend (Autodiff<..>) for gradients
//   - model.valid() returns the model on the inner backend,
//     which has no autodiff graph, so evaluation never tracks
//     gradients and cannot touch the trained parameters
//   - Gradients are produced fresh by every loss.backward(),
//     so there is nothing to zero between steps
//   - argmax(1) returns [batch, 1]; flatten before .equal()
//
// Reference: Burn Book §5, Kingma & Ba (2015) Adam

use std::sync::Arc;

use anyhow::{ensure, Result};
use burn::{
    data::dataloader::{DataLoader, DataLoaderBuilder},
    module::AutodiffModule,
    optim::{AdamConfig, GradientsParams, Optimizer},
    prelude::*,
    tensor::backend::AutodiffBackend,
};

use crate::data::{
    batcher::{NameBatch, NameBatcher},
    dataset::NameDataset,
};
use crate::domain::vocabulary::CountryVocabulary;
use crate::infra::metrics::{EpochMetrics, MetricsLogger};
use crate::ml::model::{NameClassifier, NameClassifierConfig};

#[cfg(not(feature = "wgpu"))]
pub type InnerBackend = burn::backend::NdArray;
#[cfg(feature = "wgpu")]
pub type InnerBackend = burn::backend::Wgpu;

pub type TrainBackend = burn::backend::Autodiff<InnerBackend>;

/// Loop-level settings that are not part of the model architecture.
#[derive(Debug, Clone)]
pub struct LoopSettings {
    pub batch_size:    usize,
    pub learning_rate: f64,
    pub seed:          u64,
}

/// Result of one pass over the evaluation split.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Evaluation {
    pub correct:  usize,
    pub total:    usize,
    /// Mean cross-entropy over evaluation batches
    pub loss:     f64,
}

impl Evaluation {
    /// correct / total, in [0, 1]. An empty split scores 0.
    pub fn accuracy(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.correct as f64 / self.total as f64
        }
    }
}

pub struct TrainingContext<B: AutodiffBackend, O> {
    model:         NameClassifier<B>,
    optimizer:     O,
    train_loader:  Arc<dyn DataLoader<NameBatch<B>>>,
    test_loader:   Arc<dyn DataLoader<NameBatch<B::InnerBackend>>>,
    vocabulary:    Arc<CountryVocabulary>,
    learning_rate: f64,
    device:        B::Device,
}

/// Seed the backend, build the model and the Adam optimiser, and
/// wire both splits into data loaders.
///
/// The training loader reshuffles on every pass; the test loader
/// keeps file order. Neither spawns worker threads.
pub fn build_context<B: AutodiffBackend>(
    model_cfg: &NameClassifierConfig,
    settings:  &LoopSettings,
    train:     NameDataset,
    test:      NameDataset,
    device:    B::Device,
) -> TrainingContext<B, impl Optimizer<NameClassifier<B>, B>> {
    B::seed(settings.seed);

    let model: NameClassifier<B> = model_cfg.init(&device);
    tracing::info!(
        "Model: {} GRU layer(s), {}, classifier input {} → {} classes",
        model.encoder.num_layers(),
        if model.encoder.is_bidirectional() { "bidirectional" } else { "unidirectional" },
        model.classifier_input_size(),
        model_cfg.num_classes,
    );
    let optimizer = AdamConfig::new()
        .with_epsilon(1e-8)
        .init::<B, NameClassifier<B>>();
    let vocabulary = train.vocabulary();

    let train_loader = DataLoaderBuilder::new(NameBatcher::<B>::new(device.clone()))
        .batch_size(settings.batch_size)
        .shuffle(settings.seed)
        .build(train);

    let test_loader = DataLoaderBuilder::new(NameBatcher::<B::InnerBackend>::new(device.clone()))
        .batch_size(settings.batch_size)
        .build(test);

    TrainingContext {
        model,
        optimizer,
        train_loader,
        test_loader,
        vocabulary,
        learning_rate: settings.learning_rate,
        device,
    }
}

impl<B, O> TrainingContext<B, O>
where
    B: AutodiffBackend,
    O: Optimizer<NameClassifier<B>, B>,
{
    pub fn model(&self) -> &NameClassifier<B> {
        &self.model
    }

    pub fn vocabulary(&self) -> Arc<CountryVocabulary> {
        Arc::clone(&self.vocabulary)
    }

    pub fn device(&self) -> &B::Device {
        &self.device
    }

    /// One shuffled pass over the training split, one Adam step per batch.
    /// Returns the mean training loss.
    pub fn train_epoch(&mut self) -> Result<f64> {
        let mut loss_sum = 0.0f64;
        let mut batches  = 0usize;

        for batch in self.train_loader.iter() {
            check_batch(&batch, self.model.n_chars)?;

            let (loss, _) = self.model.forward_classification(batch.names, batch.countries);
            loss_sum += loss.clone().into_scalar().elem::<f64>();
            batches  += 1;

            let grads = loss.backward();
            let grads = GradientsParams::from_grads(grads, &self.model);
            self.model = self.optimizer.step(self.learning_rate, self.model.clone(), grads);
        }

        tracing::debug!("Trained on {} batches", batches);
        Ok(if batches > 0 { loss_sum / batches as f64 } else { f64::NAN })
    }

    /// One pass over the evaluation split in file order.
    pub fn evaluate(&self) -> Result<Evaluation> {
        let model = self.model.valid();

        let mut loss_sum = 0.0f64;
        let mut batches  = 0usize;
        let mut correct  = 0usize;
        let mut total    = 0usize;

        for batch in self.test_loader.iter() {
            check_batch(&batch, model.n_chars)?;

            let (loss, logits) =
                model.forward_classification(batch.names, batch.countries.clone());
            loss_sum += loss.into_scalar().elem::<f64>();
            batches  += 1;

            let predicted = logits.argmax(1).flatten::<1>(0, 1);
            total += batch.countries.dims()[0];
            let hits: i64 = predicted
                .equal(batch.countries)
                .int()
                .sum()
                .into_scalar()
                .elem::<i64>();
            correct += hits as usize;
        }

        Ok(Evaluation {
            correct,
            total,
            loss: if batches > 0 { loss_sum / batches as f64 } else { f64::NAN },
        })
    }
}

/// Fail on the first batch the model cannot consume.
fn check_batch<B: Backend>(batch: &NameBatch<B>, n_chars: usize) -> Result<()> {
    let [seq_len, batch_size] = batch.names.dims();
    let [labels] = batch.countries.dims();
    ensure!(
        batch_size == labels,
        "batch has {batch_size} names but {labels} labels"
    );
    ensure!(seq_len > 0, "batch contains only empty names");

    let max_code: i64 = batch.names.clone().max().into_scalar().elem::<i64>();
    ensure!(
        (max_code as usize) < n_chars,
        "character code {max_code} is outside the {n_chars}-symbol embedding"
    );
    Ok(())
}

/// Run `epochs` × (train pass, evaluation pass).
///
/// Prints `<epoch> test accuracy: <acc>` per epoch, appends each
/// epoch to the metrics CSV, and returns the per-epoch history in
/// order.
pub fn run_epochs<B, O>(
    ctx:    &mut TrainingContext<B, O>,
    epochs: usize,
    logger: &MetricsLogger,
) -> Result<Vec<EpochMetrics>>
where
    B: AutodiffBackend,
    O: Optimizer<NameClassifier<B>, B>,
{
    let mut history = Vec::with_capacity(epochs);

    for epoch in 1..=epochs {
        let train_loss = ctx.train_epoch()?;
        let eval       = ctx.evaluate()?;

        println!("{} test accuracy: {}", epoch, eval.accuracy());
        tracing::info!(
            "Epoch {:>3}/{} | train_loss={:.4} | test_loss={:.4} | accuracy={:.2}% ({}/{})",
            epoch, epochs, train_loss, eval.loss,
            eval.accuracy() * 100.0, eval.correct, eval.total,
        );

        let metrics = EpochMetrics::new(epoch, train_loss, eval.loss, eval.accuracy());
        logger.log(&metrics)?;
        history.push(metrics);
    }

    Ok(history)
}
