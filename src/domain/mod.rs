// ============================================================
// Layer 3 — Domain Layer
// ============================================================
// Plain Rust structs and traits that describe a few-shot
// episode and its results.
//
// Rules for this layer:
//   - NO Burn framework types allowed here
//   - NO file I/O
//   - Only plain Rust structs, enums, and traits

// Support set + query set
pub mod episode;

// Per-query classifier output
pub mod score;

// Core abstractions (traits) that other layers implement
pub mod traits;
