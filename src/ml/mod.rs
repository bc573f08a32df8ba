// ============================================================
// Layer 5: ML / Model Layer (Burn)
// ============================================================
// All model, training and inference code built on Burn.
//
//   recurrent.rs  ── multi-layer GRU, optionally bidirectional,
//                    returning each layer's final hidden state
//
//   model.rs      ── embedding → GRU encoder → linear head,
//                    with the policy that turns the top layer's
//                    final states into the classifier input
//
//   trainer.rs    ── TrainingContext: Adam steps over shuffled
//                    batches, evaluation on the held-out split
//
//   predictor.rs  ── classifies arbitrary names with a trained
//                    model and the training vocabulary
//
// Reference: Burn Book §3 (Building Blocks)
//            Burn Book §5 (Training)
//            Cho et al. (2014) GRU

/// Stacked (bi)directional GRU encoder
pub mod recurrent;

/// Surname classifier and hidden-state policy
pub mod model;

/// Training and evaluation loops
pub mod trainer;

/// Name → country predictions
pub mod predictor;

/// NdArray draws every random tensor from one process-wide RNG, so
/// tests that initialise parameters or reseed take turns on it.
#[cfg(test)]
pub(crate) fn rng_guard() -> std::sync::MutexGuard<'static, ()> {
    static BACKEND_RNG: std::sync::Mutex<()> = std::sync::Mutex::new(());
    BACKEND_RNG.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
