// ============================================================
// Layer 2: Application / Use Cases
// ============================================================
// Coordinates the other layers to carry out one command.
//
// Rules for this layer:
//   - No model math here (that's Layer 5)
//   - No printing here (that's Layer 1)
//   - Only workflow coordination
//
// Reference: Clean Architecture pattern
//            Rust Book §7 (Module System)

// The training workflow
pub mod train_use_case;

// Dataset summary without training
pub mod inspect_use_case;
