// ============================================================
// Layer 2 — Inspect Use Case
// ============================================================
// Loads a bundle and reports what it is made of, without
// running any inference. Useful to check which component
// types a bundle needs registered before shipping it.

use std::path::PathBuf;

use anyhow::Result;

use crate::infra::checkpoint::BundleStore;

type InspectBackend = burn::backend::NdArray;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BundleReport {
    pub encoder:    String,
    pub mixer:      String,
    pub classifier: String,
    pub bytes:      usize,
}

pub struct InspectUseCase {
    store: BundleStore,
}

impl InspectUseCase {
    pub fn new(bundle_dir: impl Into<PathBuf>) -> Self {
        Self { store: BundleStore::new(bundle_dir) }
    }

    pub fn execute(&self) -> Result<BundleReport> {
        let bytes = self.store.read_model_bytes()?;
        let model = self.store.decode_model::<InspectBackend>(&bytes, &Default::default())?;

        Ok(BundleReport {
            encoder:    model.encoder().serializer_type().to_string(),
            mixer:      model.mixer().serializer_type().to_string(),
            classifier: model.classifier().serializer_type().to_string(),
            bytes:      bytes.len(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::init_use_case::{FewShotConfig, InitUseCase, MixerKind};

    #[test]
    fn test_report_lists_component_tags() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().to_string_lossy().to_string();
        let cfg = FewShotConfig {
            example_dim: 2,
            input_dim: 2,
            knowledge_dim: 2,
            encoder_hidden: vec![],
            mixer: MixerKind::Add,
            mixed_dim: 2,
            classifier_hidden: vec![],
            num_outputs: 1,
        };
        let size = InitUseCase::new(cfg, out.clone()).execute().unwrap();

        let report = InspectUseCase::new(out).execute().unwrap();
        assert_eq!(report.encoder, "fontshot.DenseNet");
        assert_eq!(report.mixer, "fontshot.AddMixer");
        assert_eq!(report.classifier, "fontshot.DenseNet");
        assert_eq!(report.bytes, size);
    }
}
