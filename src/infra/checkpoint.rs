// ============================================================
// Layer 6 — Bundle Store
// ============================================================
// Saves and restores a Model on disk.
//
// What gets saved per bundle directory:
//   1. model.bin            — the Model as a one-entry type-tagged
//                             bundle, so the file itself records
//                             that it holds a fontshot.Model
//   2. fewshot_config.json  — the config the model was built from
//
// model.bin is self-describing (every component carries its
// own layer sizes), so rebuilding the model never needs the
// JSON. Classification reads it to check episode row widths.
//
// File layout:
//   bundle/
//     model.bin
//     fewshot_config.json

use anyhow::{Context, Result};
use burn::prelude::*;
use std::{fs, path::PathBuf};

use crate::application::init_use_case::FewShotConfig;
use crate::ml::{
    model::Model,
    registry::{deserialize_any, serialize_any},
};

const MODEL_FILE:  &str = "model.bin";
const CONFIG_FILE: &str = "fewshot_config.json";

/// Manages saving and loading of a model bundle directory.
pub struct BundleStore {
    dir: PathBuf,
}

impl BundleStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &PathBuf {
        &self.dir
    }

    pub fn model_path(&self) -> PathBuf {
        self.dir.join(MODEL_FILE)
    }

    /// Serialise the model and write it to `model.bin`.
    /// Returns the number of bytes written.
    pub fn save_model<B: Backend>(&self, model: &Model<B>) -> Result<usize> {
        fs::create_dir_all(&self.dir)
            .with_context(|| format!("Cannot create bundle directory '{}'", self.dir.display()))?;

        let bytes = serialize_any(&[model])?;
        let path  = self.model_path();
        fs::write(&path, &bytes)
            .with_context(|| format!("Failed to write model to '{}'", path.display()))?;

        tracing::debug!("Saved model bundle: {} bytes", bytes.len());
        Ok(bytes.len())
    }

    /// Read `model.bin` and rebuild the model on `device`.
    pub fn load_model<B: Backend>(&self, device: &B::Device) -> Result<Model<B>> {
        let bytes = self.read_model_bytes()?;
        self.decode_model(&bytes, device)
    }

    /// Rebuild the model from bytes already read from `model.bin`.
    pub fn decode_model<B: Backend>(&self, bytes: &[u8], device: &B::Device) -> Result<Model<B>> {
        let mut parts = deserialize_any::<B>(bytes, device)
            .with_context(|| format!("Cannot decode '{}'", self.model_path().display()))?;

        anyhow::ensure!(
            parts.len() == 1,
            "'{}' should hold one model, found {} entries",
            self.model_path().display(),
            parts.len()
        );
        let model = parts.remove(0).into_model()?;

        tracing::info!("Loaded model from '{}'", self.model_path().display());
        Ok(model)
    }

    /// Raw contents of `model.bin`.
    pub fn read_model_bytes(&self) -> Result<Vec<u8>> {
        let path = self.model_path();
        fs::read(&path).with_context(|| {
            format!("Cannot read '{}'. Have you run 'init' first?", path.display())
        })
    }

    /// Save the build configuration as pretty JSON.
    pub fn save_config(&self, cfg: &FewShotConfig) -> Result<()> {
        fs::create_dir_all(&self.dir)
            .with_context(|| format!("Cannot create bundle directory '{}'", self.dir.display()))?;

        let path = self.dir.join(CONFIG_FILE);
        let json = serde_json::to_string_pretty(cfg)?;
        fs::write(&path, json)
            .with_context(|| format!("Cannot write config to '{}'", path.display()))?;

        tracing::debug!("Saved config to '{}'", path.display());
        Ok(())
    }

    /// Load the build configuration, if one was saved.
    pub fn load_config(&self) -> Result<FewShotConfig> {
        let path = self.dir.join(CONFIG_FILE);
        let json = fs::read_to_string(&path)
            .with_context(|| format!("Cannot read config from '{}'", path.display()))?;
        serde_json::from_str(&json)
            .with_context(|| format!("Invalid config in '{}'", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use burn::backend::NdArray;

    use crate::ml::{mixers::ConcatMixer, nets::DenseNetConfig};

    type TestBackend = NdArray;

    fn tiny_model() -> Model<TestBackend> {
        let device = Default::default();
        Model::new(
            Box::new(DenseNetConfig::new(vec![2, 3]).init::<TestBackend>(&device)),
            Box::new(ConcatMixer),
            Box::new(DenseNetConfig::new(vec![5, 1]).init::<TestBackend>(&device)),
        )
    }

    #[test]
    fn test_model_round_trip_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        let store = BundleStore::new(dir.path());
        let model = tiny_model();

        let written = store.save_model(&model).unwrap();
        assert_eq!(written, fs::metadata(store.model_path()).unwrap().len() as usize);

        let loaded = store.load_model::<TestBackend>(&Default::default()).unwrap();
        assert_eq!(loaded.serialize().unwrap(), model.serialize().unwrap());
    }

    #[test]
    fn test_decode_model_matches_load_model() {
        let dir = tempfile::tempdir().unwrap();
        let store = BundleStore::new(dir.path());
        store.save_model(&tiny_model()).unwrap();

        let bytes = store.read_model_bytes().unwrap();
        let decoded = store.decode_model::<TestBackend>(&bytes, &Default::default()).unwrap();
        let loaded = store.load_model::<TestBackend>(&Default::default()).unwrap();
        assert_eq!(decoded.serialize().unwrap(), loaded.serialize().unwrap());
    }

    #[test]
    fn test_missing_model_mentions_init() {
        let dir = tempfile::tempdir().unwrap();
        let store = BundleStore::new(dir.path());
        let err = store.load_model::<TestBackend>(&Default::default()).unwrap_err();
        assert!(err.to_string().contains("init"), "got: {err}");
    }

    #[test]
    fn test_file_holding_a_bare_net_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let store = BundleStore::new(dir.path());
        let net = DenseNetConfig::new(vec![1, 1]).init::<TestBackend>(&Default::default());
        fs::write(store.model_path(), serialize_any(&[&net]).unwrap()).unwrap();

        let err = store.load_model::<TestBackend>(&Default::default()).unwrap_err();
        assert!(err.to_string().contains("expected a Model"), "got: {err}");
    }

    #[test]
    fn test_config_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = BundleStore::new(dir.path());
        let cfg = FewShotConfig::default();
        store.save_config(&cfg).unwrap();
        assert_eq!(store.load_config().unwrap(), cfg);
    }
}
