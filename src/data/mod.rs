// ============================================================
// Layer 4 — Data Pipeline
// ============================================================
// From an episode file on disk to tensors on a device:
//
//   episode.json
//       │
//       ▼
//   EpisodeLoader   → parses JSON into a domain Episode
//       │
//       ▼
//   EpisodeBatcher  → flattens rows into Burn tensors
//       │
//       ▼
//   Model::apply

/// Reads episodes from JSON files
pub mod loader;

/// Flattens episodes into tensors
pub mod batcher;
