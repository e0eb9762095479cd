// ============================================================
// Layer 2 — InitUseCase
// ============================================================
// Builds a fresh model and writes it to a bundle directory:
//
//   Step 1: Check the configuration              (Layer 2)
//   Step 2: Build encoder, mixer, classifier     (Layer 5 - ml)
//   Step 3: Save config and model bundle         (Layer 6 - infra)
//
// Weights come from Burn's default layer initialisers; fitting
// them is the job of a separate training process.

use anyhow::{bail, ensure, Result};
use serde::{Deserialize, Serialize};

use crate::domain::episode::Episode;
use crate::infra::checkpoint::BundleStore;
use crate::ml::builder::build_model;

type InitBackend = burn::backend::NdArray;

/// Which mixer joins the knowledge vector with each query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MixerKind {
    /// [knowledge | query], no weights
    Concat,
    /// tanh(L·knowledge + I·query)
    Add,
}

// ─── Model Configuration ─────────────────────────────────────────────────────
// Every width needed to lay out the three parts. Saved next to
// the bundle as JSON so a human can see how it was built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FewShotConfig {
    pub example_dim:       usize,
    pub input_dim:         usize,
    pub knowledge_dim:     usize,
    pub encoder_hidden:    Vec<usize>,
    pub mixer:             MixerKind,
    pub mixed_dim:         usize,
    pub classifier_hidden: Vec<usize>,
    pub num_outputs:       usize,
}

impl Default for FewShotConfig {
    fn default() -> Self {
        Self {
            example_dim:       64,
            input_dim:         64,
            knowledge_dim:     32,
            encoder_hidden:    vec![128],
            mixer:             MixerKind::Concat,
            mixed_dim:         64,
            classifier_hidden: vec![64],
            num_outputs:       1,
        }
    }
}

impl FewShotConfig {
    /// Width of the rows the mixer hands to the classifier.
    pub fn mixer_output_dim(&self) -> usize {
        match self.mixer {
            MixerKind::Concat => self.knowledge_dim + self.input_dim,
            MixerKind::Add    => self.mixed_dim,
        }
    }

    /// [example_dim, encoder_hidden..., knowledge_dim]
    pub fn encoder_layers(&self) -> Vec<usize> {
        let mut sizes = vec![self.example_dim];
        sizes.extend(&self.encoder_hidden);
        sizes.push(self.knowledge_dim);
        sizes
    }

    /// [mixer_output_dim, classifier_hidden..., num_outputs]
    pub fn classifier_layers(&self) -> Vec<usize> {
        let mut sizes = vec![self.mixer_output_dim()];
        sizes.extend(&self.classifier_hidden);
        sizes.push(self.num_outputs);
        sizes
    }

    pub fn validate(&self) -> Result<()> {
        let named = [
            ("example_dim", self.example_dim),
            ("input_dim", self.input_dim),
            ("knowledge_dim", self.knowledge_dim),
            ("mixed_dim", self.mixed_dim),
            ("num_outputs", self.num_outputs),
        ];
        if let Some((name, _)) = named.iter().find(|(_, v)| *v == 0) {
            bail!("{name} must be greater than zero");
        }
        if self.encoder_hidden.contains(&0) || self.classifier_hidden.contains(&0) {
            bail!("hidden layer sizes must be greater than zero");
        }
        Ok(())
    }

    /// Reject an episode whose rows do not fit the first layers
    /// of a model built from this config.
    pub fn check_episode(&self, episode: &Episode) -> Result<()> {
        ensure!(
            episode.example_width() == self.example_dim,
            "example rows have width {} but the model expects {}",
            episode.example_width(),
            self.example_dim
        );
        ensure!(
            episode.input_width() == self.input_dim,
            "input rows have width {} but the model expects {}",
            episode.input_width(),
            self.input_dim
        );
        Ok(())
    }
}

// ─── InitUseCase ──────────────────────────────────────────────────────────────
pub struct InitUseCase {
    config: FewShotConfig,
    out_dir: String,
}

impl InitUseCase {
    pub fn new(config: FewShotConfig, out_dir: impl Into<String>) -> Self {
        Self { config, out_dir: out_dir.into() }
    }

    /// Build and persist the model. Returns the bundle size in bytes.
    pub fn execute(&self) -> Result<usize> {
        let cfg = &self.config;

        // ── Step 1: Sanity-check widths ───────────────────────────────────────
        cfg.validate()?;

        // ── Step 2: Build the three parts ─────────────────────────────────────
        let device = Default::default();
        let model  = build_model::<InitBackend>(cfg, &device)?;
        tracing::info!(
            "Model ready: encoder {:?}, mixer {:?}, classifier {:?}",
            cfg.encoder_layers(),
            cfg.mixer,
            cfg.classifier_layers()
        );

        // ── Step 3: Persist ───────────────────────────────────────────────────
        let store = BundleStore::new(&self.out_dir);
        store.save_config(cfg)?;
        let size = store.save_model(&model)?;
        tracing::info!("Bundle written to '{}' ({} bytes)", self.out_dir, size);

        Ok(size)
    }
}
