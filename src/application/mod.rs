// ============================================================
// Layer 2 — Application / Use Cases
// ============================================================
// Workflow coordination only:
//   - No tensor math here (that's Layer 5)
//   - No printing here (that's Layer 1)
//   - No direct file access (that's Layers 4 and 6)

// Build a fresh model bundle
pub mod init_use_case;

// Score an episode with a stored bundle
pub mod classify_use_case;

// Report what a bundle contains
pub mod inspect_use_case;
