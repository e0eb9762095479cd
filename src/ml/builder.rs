// ============================================================
// Layer 5 — Model Builder
// ============================================================
// FewShotConfig → freshly initialised Model on a device.

use anyhow::Result;
use burn::prelude::*;

use crate::application::init_use_case::{FewShotConfig, MixerKind};
use crate::ml::{
    capability::Mixer,
    mixers::{AddMixerConfig, ConcatMixer},
    model::Model,
    nets::DenseNetConfig,
};

pub fn build_model<B: Backend>(cfg: &FewShotConfig, device: &B::Device) -> Result<Model<B>> {
    cfg.validate()?;

    let encoder = DenseNetConfig::new(cfg.encoder_layers()).init::<B>(device);
    let mixer: Box<dyn Mixer<B>> = match cfg.mixer {
        MixerKind::Concat => Box::new(ConcatMixer),
        MixerKind::Add => Box::new(
            AddMixerConfig::new(cfg.knowledge_dim, cfg.input_dim, cfg.mixed_dim).init::<B>(device),
        ),
    };
    let classifier = DenseNetConfig::new(cfg.classifier_layers()).init::<B>(device);

    Ok(Model::new(Box::new(encoder), mixer, Box::new(classifier)))
}
