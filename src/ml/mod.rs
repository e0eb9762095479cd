// ============================================================
// Layer 5 — ML / Model Layer (Burn)
// ============================================================
// All Burn-specific code lives in this layer. The domain and
// CLI layers never import burn directly.
//
//   capability.rs — Net / Mixer / Typed traits the model is
//                   written against
//   nets.rs       — DenseNet (encoder or classifier)
//   mixers.rs     — ConcatMixer, AddMixer
//   weights.rs    — module parameters ⇄ bytes (BinBytesRecorder)
//   registry.rs   — type tag → decoder table, generic bundle
//                   (de)serialisation
//   model.rs      — the few-shot Model: apply / serialize /
//                   deserialize
//   builder.rs    — FewShotConfig → fresh Model
//   error.rs      — ModelError
//
// Reference: Burn Book §3 (Building Blocks)
//            Burn Book §5 (Records)

/// Capability traits for model parts
pub mod capability;

/// Dense network component
pub mod nets;

/// Mixer components
pub mod mixers;

/// Weight records
pub mod weights;

/// Process-wide decoder registry
pub mod registry;

/// The few-shot model
pub mod model;

/// Serialisation errors of the model
pub mod error;

/// Builds a model from its configuration
pub mod builder;
