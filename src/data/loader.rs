// ============================================================
// Layer 4 — Episode Loader
// ============================================================
// Reads one few-shot episode from a JSON file:
//
//   {
//     "examples": [[...], [...]],   ← rows of the class to learn
//     "inputs":   [[...]]           ← rows to score
//   }
//
// Parsing only checks the JSON shape; row-width consistency
// is checked by Episode::validate() before inference.

use anyhow::{Context, Result};
use std::{fs, path::PathBuf};

use crate::domain::episode::Episode;
use crate::domain::traits::EpisodeSource;

/// Loads an episode from a JSON file on disk.
pub struct EpisodeLoader {
    path: PathBuf,
}

impl EpisodeLoader {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl EpisodeSource for EpisodeLoader {
    fn load_episode(&self) -> Result<Episode> {
        let json = fs::read_to_string(&self.path)
            .with_context(|| format!("Cannot read episode '{}'", self.path.display()))?;

        let episode: Episode = serde_json::from_str(&json)
            .with_context(|| format!("Invalid episode JSON in '{}'", self.path.display()))?;

        tracing::debug!(
            "Loaded episode '{}': {} examples, {} inputs",
            self.path.display(),
            episode.num_examples(),
            episode.num_inputs()
        );
        Ok(episode)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_loads_episode_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("episode.json");
        fs::write(&path, r#"{"examples": [[1.0, 2.0]], "inputs": [[3.0], [4.0]]}"#).unwrap();

        let ep = EpisodeLoader::new(&path).load_episode().unwrap();
        assert_eq!(ep.examples, vec![vec![1.0, 2.0]]);
        assert_eq!(ep.num_inputs(), 2);
    }

    #[test]
    fn test_missing_file_names_the_path() {
        let err = EpisodeLoader::new("no/such/episode.json").load_episode().unwrap_err();
        assert!(err.to_string().contains("no/such/episode.json"), "got: {err}");
    }

    #[test]
    fn test_bad_json_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("episode.json");
        fs::write(&path, r#"{"examples": "nope"}"#).unwrap();
        assert!(EpisodeLoader::new(&path).load_episode().is_err());
    }
}
