use burn::{
    nn::{
        loss::CrossEntropyLossConfig,
        Embedding, EmbeddingConfig,
        Linear, LinearConfig,
    },
    prelude::*,
};
use serde::{Deserialize, Serialize};

use crate::ml::recurrent::{LayerFinalState, StackedGru, StackedGruConfig};

/// How the last GRU layer's final state(s) become the classifier input.
///
/// Only matters for a bidirectional encoder; a unidirectional one
/// always uses its single last-layer state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HiddenPolicy {
    /// `[forward ; backward]`, forward half first.
    Concatenate,
    /// `[backward ; backward]`: the last direction's state joined with
    /// itself. The forward direction's final state is discarded.
    DuplicateLast,
}

impl HiddenPolicy {
    pub fn select<B: Backend>(&self, last_layer: LayerFinalState<B>) -> Tensor<B, 2> {
        let LayerFinalState { forward, backward } = last_layer;
        match (backward, self) {
            (None, _) => forward,
            (Some(backward), HiddenPolicy::Concatenate) => Tensor::cat(vec![forward, backward], 1),
            (Some(backward), HiddenPolicy::DuplicateLast) => {
                Tensor::cat(vec![backward.clone(), backward], 1)
            }
        }
    }
}

#[derive(Config, Debug)]
pub struct NameClassifierConfig {
    /// Alphabet size of the character embedding (128 = ASCII)
    pub n_chars:        usize,
    pub embedding_size: usize,
    pub hidden_size:    usize,
    pub num_layers:     usize,
    pub num_classes:    usize,
    #[config(default = true)]
    pub bidirectional:  bool,
    #[config(default = "HiddenPolicy::Concatenate")]
    pub hidden_policy:  HiddenPolicy,
}

impl NameClassifierConfig {
    pub fn num_directions(&self) -> usize {
        if self.bidirectional { 2 } else { 1 }
    }

    pub fn init<B: Backend>(&self, device: &B::Device) -> NameClassifier<B> {
        let embedding = EmbeddingConfig::new(self.n_chars, self.embedding_size).init(device);
        let encoder   = StackedGruConfig::new(self.embedding_size, self.hidden_size, self.num_layers)
            .with_bidirectional(self.bidirectional)
            .init(device);
        let output    = LinearConfig::new(self.hidden_size * self.num_directions(), self.num_classes)
            .init(device);
        NameClassifier {
            embedding,
            encoder,
            output,
            n_chars: self.n_chars,
            duplicate_last_direction: self.hidden_policy == HiddenPolicy::DuplicateLast,
        }
    }
}

#[derive(Module, Debug)]
pub struct NameClassifier<B: Backend> {
    pub embedding: Embedding<B>,
    pub encoder:   StackedGru<B>,
    pub output:    Linear<B>,
    pub n_chars:   usize,
    duplicate_last_direction: bool,
}

impl<B: Backend> NameClassifier<B> {
    pub fn hidden_policy(&self) -> HiddenPolicy {
        if self.duplicate_last_direction {
            HiddenPolicy::DuplicateLast
        } else {
            HiddenPolicy::Concatenate
        }
    }

    /// Width of the vector fed to the output layer.
    pub fn classifier_input_size(&self) -> usize {
        let [d_input, _] = self.output.weight.dims();
        d_input
    }

    /// names: [seq_len, batch] → [batch, seq_len, d_embed]
    fn embed(&self, names: Tensor<B, 2, Int>) -> Tensor<B, 3> {
        // Embedding keeps the time-major layout: [seq_len, batch, d_embed].
        // Burn's Gru expects batch-major input, hence the swap.
        self.embedding.forward(names).swap_dims(0, 1)
    }

    /// names: [seq_len, batch] → [batch, hidden * directions]
    pub fn classifier_input(&self, names: Tensor<B, 2, Int>) -> Tensor<B, 2> {
        // Lower layers' states are dropped; only the top layer is classified.
        let (_, top) = self.encoder.forward_with_top(self.embed(names));
        self.hidden_policy().select(top)
    }

    /// names: [seq_len, batch] → raw logits [batch, num_classes]
    pub fn forward(&self, names: Tensor<B, 2, Int>) -> Tensor<B, 2> {
        self.output.forward(self.classifier_input(names))
    }

    /// Logits plus mean cross-entropy against `countries` [batch].
    pub fn forward_classification(
        &self,
        names:     Tensor<B, 2, Int>,
        countries: Tensor<B, 1, Int>,
    ) -> (Tensor<B, 1>, Tensor<B, 2>) {
        let logits = self.forward(names);
        let loss   = CrossEntropyLossConfig::new()
            .init(&logits.device())
            .forward(logits.clone(), countries);
        (loss, logits)
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::batcher::NameBatcher;
    use burn::backend::NdArray;

    type TestBackend = NdArray;

    const HIDDEN: usize = 6;

    fn config(policy: HiddenPolicy) -> NameClassifierConfig {
        NameClassifierConfig::new(128, 5, HIDDEN, 2, 3).with_hidden_policy(policy)
    }

    fn names(device: &<TestBackend as Backend>::Device) -> Tensor<TestBackend, 2, Int> {
        NameBatcher::<TestBackend>::new(device.clone()).encode_names(&["Smith", "Ng", "Kowalski"])
    }

    fn max_abs_diff(a: Tensor<TestBackend, 2>, b: Tensor<TestBackend, 2>) -> f32 {
        (a - b).abs().max().into_scalar()
    }

    #[test]
    fn test_logits_shape() {
        let _rng = crate::ml::rng_guard();
        let device = Default::default();
        let model  = config(HiddenPolicy::Concatenate).init::<TestBackend>(&device);
        assert_eq!(model.forward(names(&device)).dims(), [3, 3]);
    }

    #[test]
    fn test_unidirectional_logits_shape() {
        let _rng = crate::ml::rng_guard();
        let device = Default::default();
        let model  = config(HiddenPolicy::Concatenate)
            .with_bidirectional(false)
            .init::<TestBackend>(&device);
        assert_eq!(model.classifier_input_size(), HIDDEN);
        assert_eq!(model.forward(names(&device)).dims(), [3, 3]);
    }

    #[test]
    fn test_concatenate_uses_forward_then_backward() {
        let _rng = crate::ml::rng_guard();
        let device = Default::default();
        let model  = config(HiddenPolicy::Concatenate).init::<TestBackend>(&device);
        assert_eq!(model.classifier_input_size(), 2 * HIDDEN);

        let input = model.classifier_input(names(&device));
        assert_eq!(input.dims(), [3, 2 * HIDDEN]);

        let (_, last) = model.encoder.forward_with_top(model.embed(names(&device)));
        let first_half  = input.clone().slice([0..3, 0..HIDDEN]);
        let second_half = input.slice([0..3, HIDDEN..2 * HIDDEN]);

        assert!(max_abs_diff(first_half, last.forward) < 1e-6);
        assert!(max_abs_diff(second_half, last.backward.unwrap()) < 1e-6);
    }

    #[test]
    fn test_duplicate_last_repeats_backward_state() {
        let _rng = crate::ml::rng_guard();
        let device = Default::default();
        let model  = config(HiddenPolicy::DuplicateLast).init::<TestBackend>(&device);
        assert_eq!(model.hidden_policy(), HiddenPolicy::DuplicateLast);
        assert_eq!(model.classifier_input_size(), 2 * HIDDEN);

        let input    = model.classifier_input(names(&device));
        let backward = model.encoder.forward_with_top(model.embed(names(&device))).1.backward.unwrap();
        let first_half  = input.clone().slice([0..3, 0..HIDDEN]);
        let second_half = input.slice([0..3, HIDDEN..2 * HIDDEN]);

        assert!(max_abs_diff(first_half, backward.clone()) < 1e-6);
        assert!(max_abs_diff(second_half, backward) < 1e-6);
    }

    #[test]
    fn test_loss_is_finite_scalar() {
        let _rng = crate::ml::rng_guard();
        let device    = Default::default();
        let model     = config(HiddenPolicy::Concatenate).init::<TestBackend>(&device);
        let countries = Tensor::<TestBackend, 1, Int>::from_ints([0, 2, 1].as_slice(), &device);

        let (loss, logits) = model.forward_classification(names(&device), countries);
        assert_eq!(logits.dims(), [3, 3]);
        let loss: f32 = loss.into_scalar();
        assert!(loss.is_finite() && loss > 0.0);
    }

    #[test]
    fn test_forward_is_deterministic() {
        let _rng = crate::ml::rng_guard();
        let device = Default::default();
        let model  = config(HiddenPolicy::Concatenate).init::<TestBackend>(&device);

        let a: Vec<f32> = model.forward(names(&device)).into_data().to_vec().unwrap();
        let b: Vec<f32> = model.forward(names(&device)).into_data().to_vec().unwrap();
        assert_eq!(a, b);
    }
}
