// ============================================================
// Layer 2 — Classify Use Case
// ============================================================
// Scores the queries of an episode against its examples:
//   1. Load the model bundle and its config once
//   2. Validate the episode shape against the config
//   3. Flatten rows into tensors
//   4. Run Model::apply
//   5. Split the flat scores back into one row per query

use std::path::PathBuf;

use anyhow::{ensure, Result};

use crate::application::init_use_case::FewShotConfig;
use crate::data::batcher::EpisodeBatcher;
use crate::domain::{episode::Episode, score::ScoreRow, traits::FewShotClassifier};
use crate::infra::checkpoint::BundleStore;
use crate::ml::model::Model;

type InferBackend = burn::backend::NdArray;

pub struct ClassifyUseCase {
    model:   Model<InferBackend>,
    config:  FewShotConfig,
    batcher: EpisodeBatcher<InferBackend>,
}

impl ClassifyUseCase {
    /// Load the model stored in `bundle_dir` together with the
    /// config it was built from.
    pub fn new(bundle_dir: impl Into<PathBuf>) -> Result<Self> {
        let device = Default::default();
        let store  = BundleStore::new(bundle_dir);
        let model  = store.load_model::<InferBackend>(&device)?;
        let config = store.load_config()?;
        Ok(Self::from_model(model, config, device))
    }

    /// `config` must describe the widths `model` was built with.
    pub fn from_model(
        model:  Model<InferBackend>,
        config: FewShotConfig,
        device: <InferBackend as burn::prelude::Backend>::Device,
    ) -> Self {
        Self { model, config, batcher: EpisodeBatcher::new(device) }
    }
}

impl FewShotClassifier for ClassifyUseCase {
    fn classify(&self, episode: &Episode) -> Result<Vec<ScoreRow>> {
        episode.validate()?;
        self.config.check_episode(episode)?;

        let batch  = self.batcher.batch(episode);
        let scores = self
            .model
            .apply(batch.examples, batch.inputs, batch.num_examples, batch.num_inputs)
            .into_data()
            .to_vec::<f32>()
            .map_err(|e| anyhow::anyhow!("Cannot read scores: {e:?}"))?;

        let rows = batch.num_inputs;
        ensure!(
            !scores.is_empty() && scores.len() % rows == 0,
            "classifier produced {} scores for {} queries",
            scores.len(),
            rows
        );
        let width = scores.len() / rows;
        tracing::debug!("Scored {} queries ({} outputs each)", rows, width);

        Ok(scores
            .chunks(width)
            .enumerate()
            .map(|(query, logits)| ScoreRow::new(query, logits.to_vec()))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::init_use_case::{FewShotConfig, InitUseCase, MixerKind};

    fn small_config() -> FewShotConfig {
        FewShotConfig {
            example_dim: 3,
            input_dim: 3,
            knowledge_dim: 2,
            encoder_hidden: vec![4],
            mixer: MixerKind::Concat,
            mixed_dim: 2,
            classifier_hidden: vec![],
            num_outputs: 1,
        }
    }

    fn episode(num_inputs: usize) -> Episode {
        Episode::new(
            vec![vec![0.1, 0.2, 0.3], vec![0.3, 0.2, 0.1]],
            (0..num_inputs).map(|i| vec![i as f32, 0.5, -0.5]).collect(),
        )
    }

    #[test]
    fn test_one_score_row_per_query() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().to_string_lossy().to_string();
        InitUseCase::new(small_config(), out.clone()).execute().unwrap();

        let classifier = ClassifyUseCase::new(out).unwrap();
        for n in [1, 4] {
            let rows = classifier.classify(&episode(n)).unwrap();
            assert_eq!(rows.len(), n);
            assert!(rows.iter().all(|r| r.logits.len() == 1));
            assert_eq!(rows.last().unwrap().query, n - 1);
        }
    }

    #[test]
    fn test_persisted_model_scores_like_the_in_memory_one() {
        let device = Default::default();
        let model = crate::ml::builder::build_model::<InferBackend>(&small_config(), &device).unwrap();

        let dir = tempfile::tempdir().unwrap();
        let store = BundleStore::new(dir.path());
        store.save_model(&model).unwrap();
        store.save_config(&small_config()).unwrap();

        let direct = ClassifyUseCase::from_model(model, small_config(), device).classify(&episode(3)).unwrap();
        let loaded = ClassifyUseCase::new(dir.path().to_string_lossy().to_string())
            .unwrap()
            .classify(&episode(3))
            .unwrap();
        assert_eq!(direct, loaded);
    }

    #[test]
    fn test_invalid_episode_is_rejected_before_inference() {
        let device = Default::default();
        let model = crate::ml::builder::build_model::<InferBackend>(&small_config(), &device).unwrap();
        let classifier = ClassifyUseCase::from_model(model, small_config(), device);

        let empty = Episode::new(vec![], vec![vec![0.0; 3]]);
        assert!(classifier.classify(&empty).is_err());
    }

    #[test]
    fn test_episode_of_the_wrong_width_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().to_string_lossy().to_string();
        InitUseCase::new(small_config(), out.clone()).execute().unwrap();
        let classifier = ClassifyUseCase::new(out).unwrap();

        let narrow_examples = Episode::new(vec![vec![0.1, 0.2]], vec![vec![0.0; 3]]);
        let err = classifier.classify(&narrow_examples).unwrap_err().to_string();
        assert!(err.contains("example rows have width 2"), "got: {err}");

        let wide_inputs = Episode::new(vec![vec![0.0; 3]], vec![vec![0.0; 4]]);
        let err = classifier.classify(&wide_inputs).unwrap_err().to_string();
        assert!(err.contains("input rows have width 4"), "got: {err}");
    }
}
