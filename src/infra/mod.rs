// ============================================================
// Layer 6 — Infrastructure Layer
// ============================================================
// Cross-cutting persistence concerns:
//
//   codec.rs      — the type-tagged wire envelope every bundle
//                   uses: an ordered list of (tag, payload)
//                   pairs encoded with bincode
//
//   checkpoint.rs — BundleStore: writes a Model to a bundle
//                   directory and reads it back, plus the JSON
//                   config it was built from
//
// Reference: Rust Book §9 (Error Handling with anyhow)

/// Type-tagged bundle envelope
pub mod codec;

/// Model bundle saving and loading
pub mod checkpoint;
