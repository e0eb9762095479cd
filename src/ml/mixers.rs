// ============================================================
// Layer 5 — Mixer Components
// ============================================================
// A mixer turns (knowledge row, query row) pairs into the
// rows the classifier scores. Two flavours:
//
//   ConcatMixer — out = [learned | input]           (no weights)
//   AddMixer    — out = tanh(L·learned + I·input)   (two Linear)

use anyhow::{Context, Result};
use burn::{
    nn::{Linear, LinearConfig},
    prelude::*,
};
use serde::{Deserialize, Serialize};

use crate::infra::codec::{decode_value, encode_value};
use crate::ml::capability::{as_rows, Mixer, Typed};
use crate::ml::weights::{decode_weights, encode_weights, linear_shapes, ParamShapes};

// ─── ConcatMixer ──────────────────────────────────────────────────────────────

/// Joins each learned row with the matching input row.
/// Output width = learned width + input width.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConcatMixer;

impl ConcatMixer {
    pub const SERIALIZER_TYPE: &'static str = "fontshot.ConcatMixer";

    pub fn decode(bytes: &[u8]) -> Result<Self> {
        anyhow::ensure!(bytes.is_empty(), "ConcatMixer payload must be empty, got {} bytes", bytes.len());
        Ok(Self)
    }
}

impl Typed for ConcatMixer {
    fn serializer_type(&self) -> &'static str {
        Self::SERIALIZER_TYPE
    }

    fn encode(&self) -> Result<Vec<u8>> {
        Ok(Vec::new())
    }
}

impl<B: Backend> Mixer<B> for ConcatMixer {
    fn mix(&self, learned: Tensor<B, 1>, inputs: Tensor<B, 1>, rows: usize) -> Tensor<B, 1> {
        let learned = as_rows(learned, rows);
        let inputs  = as_rows(inputs, rows);
        Tensor::cat(vec![learned, inputs], 1).flatten(0, 1)
    }
}

// ─── AddMixer ─────────────────────────────────────────────────────────────────

#[derive(Config, Debug)]
pub struct AddMixerConfig {
    pub learned_dim: usize,
    pub input_dim:   usize,
    pub output_dim:  usize,
}

impl AddMixerConfig {
    pub fn init<B: Backend>(&self, device: &B::Device) -> AddMixer<B> {
        AddMixer {
            config: self.clone(),
            layers: AddLayers {
                learned: LinearConfig::new(self.learned_dim, self.output_dim).init(device),
                input:   LinearConfig::new(self.input_dim, self.output_dim).init(device),
            },
        }
    }
}

#[derive(Module, Debug)]
pub struct AddLayers<B: Backend> {
    pub learned: Linear<B>,
    pub input:   Linear<B>,
}

impl<B: Backend> ParamShapes<B> for AddLayers<B> {
    fn param_shapes(&self) -> Vec<Vec<usize>> {
        let mut shapes = linear_shapes(&self.learned.weight, &self.learned.bias);
        shapes.extend(linear_shapes(&self.input.weight, &self.input.bias));
        shapes
    }

    fn record_shapes(record: &Self::Record) -> Vec<Vec<usize>> {
        let mut shapes = linear_shapes(&record.learned.weight, &record.learned.bias);
        shapes.extend(linear_shapes(&record.input.weight, &record.input.bias));
        shapes
    }
}

/// Projects both sides to a shared width, sums, squashes.
#[derive(Debug, Clone)]
pub struct AddMixer<B: Backend> {
    config: AddMixerConfig,
    layers: AddLayers<B>,
}

#[derive(Serialize, Deserialize)]
struct AddPayload {
    config:  AddMixerConfig,
    weights: Vec<u8>,
}

impl<B: Backend> AddMixer<B> {
    pub const SERIALIZER_TYPE: &'static str = "fontshot.AddMixer";

    pub fn config(&self) -> &AddMixerConfig {
        &self.config
    }

    pub fn decode(bytes: &[u8], device: &B::Device) -> Result<Self> {
        let payload: AddPayload = decode_value(bytes).context("AddMixer payload")?;
        let skeleton = payload.config.init::<B>(device);
        let layers = decode_weights(skeleton.layers, payload.weights, device)
            .context("AddMixer weights")?;
        Ok(Self { config: payload.config, layers })
    }
}

impl<B: Backend> Typed for AddMixer<B> {
    fn serializer_type(&self) -> &'static str {
        Self::SERIALIZER_TYPE
    }

    fn encode(&self) -> Result<Vec<u8>> {
        encode_value(&AddPayload {
            config:  self.config.clone(),
            weights: encode_weights::<B, _>(&self.layers)?,
        })
    }
}

impl<B: Backend> Mixer<B> for AddMixer<B> {
    fn mix(&self, learned: Tensor<B, 1>, inputs: Tensor<B, 1>, rows: usize) -> Tensor<B, 1> {
        let learned = self.layers.learned.forward(as_rows(learned, rows));
        let inputs  = self.layers.input.forward(as_rows(inputs, rows));
        (learned + inputs).tanh().flatten(0, 1)
    }
}
