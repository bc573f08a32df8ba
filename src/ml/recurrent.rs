// ============================================================
// Layer 5: Stacked (Bi)GRU Encoder
// ============================================================
// Burn's Gru runs one direction over a batch-major sequence
// [batch, seq_len, d_input] and returns the hidden state at
// every step. This module stacks several of them and, when
// bidirectional, pairs each layer with a second GRU that
// reads the sequence reversed.
//
// Per layer:
//   forward  = gru_f(x)                     [batch, seq, hidden]
//   backward = flip(gru_b(flip(x)))         [batch, seq, hidden]
//   next x   = cat(forward, backward, dim 2) [batch, seq, 2*hidden]
//
// The final hidden state of a direction is the output at the
// last step it processed. For the backward GRU that is the
// last step of the reversed run (sequence position 0).
//
// Padding is not masked: trailing zero codes are read like
// any other step, in both directions.
//
// Reference: Burn Book §3 (Building Blocks)
//            Cho et al. (2014) GRU

use burn::{
    nn::gru::{Gru, GruConfig},
    prelude::*,
};

#[derive(Config, Debug)]
pub struct StackedGruConfig {
    pub d_input:    usize,
    pub d_hidden:   usize,
    pub num_layers: usize,
    #[config(default = true)]
    pub bidirectional: bool,
}

impl StackedGruConfig {
    pub fn num_directions(&self) -> usize {
        if self.bidirectional { 2 } else { 1 }
    }

    /// # Panics
    /// Panics if `num_layers` is 0: there would be no final state.
    pub fn init<B: Backend>(&self, device: &B::Device) -> StackedGru<B> {
        assert!(self.num_layers > 0, "a GRU encoder needs at least one layer");

        let layer = |d_input: usize| {
            let gru = || GruConfig::new(d_input, self.d_hidden, true).init(device);
            GruLayer {
                forward:  gru(),
                backward: self.bidirectional.then(gru),
            }
        };

        // Layers after the first read both directions of the one below
        let d_stacked = self.d_hidden * self.num_directions();
        StackedGru {
            bottom: layer(self.d_input),
            upper:  (1..self.num_layers).map(|_| layer(d_stacked)).collect(),
        }
    }
}

#[derive(Module, Debug)]
pub struct GruLayer<B: Backend> {
    pub forward:  Gru<B>,
    pub backward: Option<Gru<B>>,
}

/// The bottom layer is a separate field, so an encoder always
/// has at least one layer and therefore a top-layer state.
#[derive(Module, Debug)]
pub struct StackedGru<B: Backend> {
    pub bottom: GruLayer<B>,
    pub upper:  Vec<GruLayer<B>>,
}

/// Final hidden state(s) of one layer, each [batch, d_hidden].
#[derive(Debug, Clone)]
pub struct LayerFinalState<B: Backend> {
    pub forward:  Tensor<B, 2>,
    pub backward: Option<Tensor<B, 2>>,
}

impl<B: Backend> GruLayer<B> {
    /// x: [batch, seq_len, d_input] → (output sequence, final state)
    fn run(&self, x: Tensor<B, 3>) -> (Tensor<B, 3>, LayerFinalState<B>) {
        let forward_seq   = self.forward.forward(x.clone(), None);
        let forward_final = last_step(forward_seq.clone());

        match &self.backward {
            Some(backward) => {
                let reversed_seq   = backward.forward(x.flip([1]), None);
                let backward_final = last_step(reversed_seq.clone());
                // Re-align backward outputs with sequence positions
                let output = Tensor::cat(vec![forward_seq, reversed_seq.flip([1])], 2);
                (output, LayerFinalState { forward: forward_final, backward: Some(backward_final) })
            }
            None => (forward_seq, LayerFinalState { forward: forward_final, backward: None }),
        }
    }
}

impl<B: Backend> StackedGru<B> {
    pub fn is_bidirectional(&self) -> bool {
        self.bottom.backward.is_some()
    }

    pub fn num_layers(&self) -> usize {
        1 + self.upper.len()
    }

    /// input: [batch, seq_len, d_input] → (lower layers' states bottom first, top layer's state)
    pub fn forward_with_top(
        &self,
        input: Tensor<B, 3>,
    ) -> (Vec<LayerFinalState<B>>, LayerFinalState<B>) {
        let (mut x, mut top) = self.bottom.run(input);
        let mut lower = Vec::with_capacity(self.upper.len());

        for layer in &self.upper {
            let (next_x, state) = layer.run(x);
            lower.push(std::mem::replace(&mut top, state));
            x = next_x;
        }

        (lower, top)
    }
}

/// [batch, seq_len, hidden] → [batch, hidden] at the last step
fn last_step<B: Backend>(sequence: Tensor<B, 3>) -> Tensor<B, 2> {
    let [batch_size, seq_len, d_hidden] = sequence.dims();
    sequence
        .slice([0..batch_size, seq_len - 1..seq_len, 0..d_hidden])
        .reshape([batch_size, d_hidden])
}
