// ============================================================
// Layer 3 — Core Traits (Abstractions)
// ============================================================
// The application layer is programmed against these traits
// so the CLI never needs to know which backend or bundle
// format sits behind a classifier.

use anyhow::Result;
use crate::domain::{episode::Episode, score::ScoreRow};

// ─── EpisodeSource ────────────────────────────────────────────────────────────
/// Anything that can produce a few-shot episode.
///
/// Implementations:
///   - EpisodeLoader → reads an episode from a JSON file
pub trait EpisodeSource {
    fn load_episode(&self) -> Result<Episode>;
}

// ─── FewShotClassifier ────────────────────────────────────────────────────────
/// Anything that can score the queries of an episode against
/// its examples.
///
/// Implementations:
///   - ClassifyUseCase → runs the persisted Model
pub trait FewShotClassifier {
    /// Returns exactly one ScoreRow per query input, in order.
    fn classify(&self, episode: &Episode) -> Result<Vec<ScoreRow>>;
}
