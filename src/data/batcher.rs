// ============================================================
// Layer 4: Name Batcher
// ============================================================
// Implements Burn's Batcher trait to convert a Vec<NameItem>
// into tensors on the target device.
//
// How batching works here:
//   Input:  N NameItems with names of varying length
//   Output: NameBatch with
//             names     [max_len, N]  (time-major, 0-padded)
//             countries [N]
//
// max_len is recomputed for every batch by the encoder, so a
// batch of short names stays short.
//
// Reference: Burn Book §4 (Batcher)

use burn::{
    data::dataloader::batcher::Batcher,
    prelude::*,
};

use crate::data::{dataset::NameItem, encoder::names_to_matrix};

// ─── NameBatch ────────────────────────────────────────────────────────────────
/// A batch of encoded names ready for the model forward pass.
#[derive(Debug, Clone)]
pub struct NameBatch<B: Backend> {
    /// Character codes, shape [seq_len, batch_size]
    pub names: Tensor<B, 2, Int>,

    /// True class indices, shape [batch_size]
    pub countries: Tensor<B, 1, Int>,
}

// ─── NameBatcher ──────────────────────────────────────────────────────────────
#[derive(Clone, Debug)]
pub struct NameBatcher<B: Backend> {
    pub device: B::Device,
}

impl<B: Backend> NameBatcher<B> {
    pub fn new(device: B::Device) -> Self {
        Self { device }
    }

    /// Encode raw names without labels, e.g. for classification.
    pub fn encode_names<S: AsRef<str>>(&self, names: &[S]) -> Tensor<B, 2, Int> {
        let encoded = names_to_matrix(names);
        let flat: Vec<i32> = encoded.as_time_major().iter().map(|&c| c as i32).collect();

        Tensor::<B, 1, Int>::from_ints(flat.as_slice(), &self.device)
            .reshape([encoded.seq_len(), encoded.batch_size()])
    }
}

impl<B: Backend> Batcher<NameItem, NameBatch<B>> for NameBatcher<B> {
    fn batch(&self, items: Vec<NameItem>) -> NameBatch<B> {
        let names: Vec<&str> = items.iter().map(|item| item.name.as_str()).collect();
        let countries: Vec<i32> = items.iter().map(|item| item.country as i32).collect();

        NameBatch {
            names:     self.encode_names(&names),
            countries: Tensor::<B, 1, Int>::from_ints(countries.as_slice(), &self.device),
        }
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use burn::backend::NdArray;

    type TestBackend = NdArray;

    fn item(name: &str, country: usize) -> NameItem {
        NameItem { name: name.to_string(), country }
    }

    #[test]
    fn test_batch_shapes_are_time_major() {
        let batcher = NameBatcher::<TestBackend>::new(Default::default());
        let batch   = batcher.batch(vec![item("ABCD", 1), item("BCD", 0), item("A", 2)]);

        assert_eq!(batch.names.dims(), [4, 3]);
        assert_eq!(batch.countries.dims(), [3]);
    }

    #[test]
    fn test_batch_contents() {
        let batcher = NameBatcher::<TestBackend>::new(Default::default());
        let batch   = batcher.batch(vec![item("ABCD", 1), item("BCD", 0)]);

        let codes: Vec<i64> = batch
            .names
            .into_data()
            .convert::<i64>()
            .to_vec()
            .unwrap();
        assert_eq!(codes, vec![65, 66, 66, 67, 67, 68, 68, 0]);

        let labels: Vec<i64> = batch
            .countries
            .into_data()
            .convert::<i64>()
            .to_vec()
            .unwrap();
        assert_eq!(labels, vec![1, 0]);
    }
}
