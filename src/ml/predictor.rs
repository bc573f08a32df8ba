// ============================================================
// Layer 5: Predictor
// ============================================================
// Runs a trained classifier over free-form names and maps the
// argmax logit back to a country label. Confidence is the
// softmax probability of that label.

use std::sync::Arc;

use anyhow::{ensure, Result};
use burn::{prelude::*, tensor::activation::softmax};

use crate::data::batcher::NameBatcher;
use crate::domain::{
    traits::{CountryClassifier, Prediction},
    vocabulary::CountryVocabulary,
};
use crate::ml::model::NameClassifier;

pub struct Predictor<B: Backend> {
    model:      NameClassifier<B>,
    vocabulary: Arc<CountryVocabulary>,
    batcher:    NameBatcher<B>,
}

impl<B: Backend> Predictor<B> {
    pub fn new(
        model:      NameClassifier<B>,
        vocabulary: Arc<CountryVocabulary>,
        device:     B::Device,
    ) -> Self {
        Self { model, vocabulary, batcher: NameBatcher::new(device) }
    }
}

impl<B: Backend> CountryClassifier for Predictor<B> {
    fn classify(&self, names: &[String]) -> Result<Vec<Prediction>> {
        if names.is_empty() {
            return Ok(Vec::new());
        }
        for name in names {
            ensure!(!name.is_empty(), "cannot classify an empty name");
            ensure!(
                name.chars().all(|c| (c as usize) < self.model.n_chars),
                "'{name}' has characters outside the {}-symbol alphabet",
                self.model.n_chars
            );
        }

        let logits = self.model.forward(self.batcher.encode_names(names));
        let probs  = softmax(logits, 1);

        let best: Vec<i64> = probs
            .clone()
            .argmax(1)
            .into_data()
            .convert::<i64>()
            .to_vec()
            .map_err(|e| anyhow::anyhow!("Read predictions: {e:?}"))?;
        let confidence: Vec<f32> = probs
            .max_dim(1)
            .into_data()
            .convert::<f32>()
            .to_vec()
            .map_err(|e| anyhow::anyhow!("Read probabilities: {e:?}"))?;

        names
            .iter()
            .zip(best.into_iter().zip(confidence))
            .map(|(name, (index, confidence))| {
                let country = self
                    .vocabulary
                    .index_to_country(index as usize)
                    .ok_or_else(|| anyhow::anyhow!("model predicted unknown class {index}"))?;
                tracing::debug!("'{}' → {} ({:.3})", name, country, confidence);
                Ok(Prediction {
                    name:    name.clone(),
                    country: country.to_string(),
                    confidence,
                })
            })
            .collect()
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::ml::model::NameClassifierConfig;
    use burn::backend::NdArray;

    type TestBackend = NdArray;

    fn predictor() -> Predictor<TestBackend> {
        let device = Default::default();
        let vocab  = Arc::new(CountryVocabulary::from_countries(["Japanese", "Polish", "Scottish"]));
        let model  = NameClassifierConfig::new(128, 6, 6, 2, vocab.len()).init(&device);
        Predictor::new(model, vocab, device)
    }

    #[test]
    fn test_one_prediction_per_name_with_known_label() {
        let _rng = crate::ml::rng_guard();
        let names = vec!["Nakamura".to_string(), "Kowalski".to_string(), "Mc".to_string()];
        let out   = predictor().classify(&names).unwrap();

        assert_eq!(out.len(), 3);
        for (prediction, name) in out.iter().zip(&names) {
            assert_eq!(&prediction.name, name);
            assert!(["Japanese", "Polish", "Scottish"].contains(&prediction.country.as_str()));
            // three classes: the top probability is at least a third
            assert!(prediction.confidence >= 1.0 / 3.0 - 1e-6);
            assert!(prediction.confidence <= 1.0 + 1e-6);
        }
    }

    #[test]
    fn test_no_names_no_predictions() {
        let _rng = crate::ml::rng_guard();
        assert!(predictor().classify(&[]).unwrap().is_empty());
    }

    #[test]
    fn test_rejects_non_ascii_and_empty_names() {
        let _rng = crate::ml::rng_guard();
        let p = predictor();
        assert!(p.classify(&["Müller".to_string()]).is_err());
        assert!(p.classify(&[String::new()]).is_err());
    }

    #[test]
    fn test_rejects_code_points_beyond_wide_alphabet() {
        let _rng = crate::ml::rng_guard();
        // Every UTF-8 byte of 'Ł' is below 256, but its code point (321) is not
        let device = Default::default();
        let vocab  = Arc::new(CountryVocabulary::from_countries(["Polish", "Scottish"]));
        let model  = NameClassifierConfig::new(256, 4, 4, 1, vocab.len()).init::<TestBackend>(&device);
        let p      = Predictor::<TestBackend>::new(model, vocab, device);

        let err = p.classify(&["Łukasz".to_string()]).unwrap_err();
        assert!(err.to_string().contains("alphabet"));
        // Latin-1 characters fit a 256-symbol alphabet
        assert_eq!(p.classify(&["Müller".to_string()]).unwrap().len(), 1);
    }
}
