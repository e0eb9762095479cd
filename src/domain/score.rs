// ============================================================
// Layer 3 — Score Domain Type
// ============================================================
// The classifier emits pre-sigmoid scores ("logits"). One
// ScoreRow holds the scores for one query input; turning
// them into probabilities is the caller's choice, so the
// raw logits are kept and probabilities computed on demand.

use serde::{Deserialize, Serialize};

/// Scores for a single query row of an episode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreRow {
    /// Index of the query row inside the episode
    pub query: usize,

    /// Unnormalised classifier outputs
    pub logits: Vec<f32>,
}

impl ScoreRow {
    pub fn new(query: usize, logits: Vec<f32>) -> Self {
        Self { query, logits }
    }

    /// Logistic function applied to every logit.
    /// Each value is the confidence that the query shows the
    /// same class as the examples.
    pub fn probabilities(&self) -> Vec<f32> {
        self.logits.iter().copied().map(sigmoid).collect()
    }
}

/// 1 / (1 + e^-x)
pub fn sigmoid(x: f32) -> f32 {
    1.0 / (1.0 + (-x).exp())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sigmoid_midpoint_and_tails() {
        assert!((sigmoid(0.0) - 0.5).abs() < 1e-6);
        assert!(sigmoid(20.0) > 0.999);
        assert!(sigmoid(-20.0) < 0.001);
    }

    #[test]
    fn test_probabilities_follow_logits() {
        let row = ScoreRow::new(3, vec![-1.0, 0.0, 2.0]);
        let p = row.probabilities();
        assert_eq!(p.len(), 3);
        assert!(p[0] < p[1] && p[1] < p[2]);
        assert_eq!(row.query, 3);
    }
}
