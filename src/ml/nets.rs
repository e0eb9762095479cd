// ============================================================
// Layer 5 — Dense Network Component
// ============================================================
// A plain multi-layer perceptron built from burn::nn::Linear.
// Used for both the encoder role (examples → knowledge
// vectors) and the classifier role (mixed rows → scores).
//
//   layer_sizes = [in, h1, h2, ..., out]
//   x → Linear → ReLU → Linear → ReLU → ... → Linear
//
// No activation after the last layer: classifier outputs are
// pre-sigmoid scores.

use anyhow::{Context, Result};
use burn::{
    nn::{Linear, LinearConfig},
    prelude::*,
    tensor::activation::relu,
};
use serde::{Deserialize, Serialize};

use crate::infra::codec::{decode_value, encode_value};
use crate::ml::capability::{as_rows, Net, Typed};
use crate::ml::weights::{decode_weights, encode_weights, linear_shapes, ParamShapes};

#[derive(Config, Debug)]
pub struct DenseNetConfig {
    /// Input width followed by the width of every layer's output.
    pub layer_sizes: Vec<usize>,
}

impl DenseNetConfig {
    pub fn init<B: Backend>(&self, device: &B::Device) -> DenseNet<B> {
        let linears = self
            .layer_sizes
            .windows(2)
            .map(|w| LinearConfig::new(w[0], w[1]).init(device))
            .collect();
        DenseNet {
            config: self.clone(),
            layers: DenseLayers { linears },
        }
    }

    pub fn input_dim(&self) -> usize {
        self.layer_sizes.first().copied().unwrap_or(0)
    }

    pub fn output_dim(&self) -> usize {
        self.layer_sizes.last().copied().unwrap_or(0)
    }
}

#[derive(Module, Debug)]
pub struct DenseLayers<B: Backend> {
    pub linears: Vec<Linear<B>>,
}

impl<B: Backend> DenseLayers<B> {
    pub fn forward(&self, x: Tensor<B, 2>) -> Tensor<B, 2> {
        let last = self.linears.len().saturating_sub(1);
        self.linears
            .iter()
            .enumerate()
            .fold(x, |x, (i, layer)| {
                let y = layer.forward(x);
                if i < last { relu(y) } else { y }
            })
    }
}

impl<B: Backend> ParamShapes<B> for DenseLayers<B> {
    fn param_shapes(&self) -> Vec<Vec<usize>> {
        self.linears.iter().flat_map(|l| linear_shapes(&l.weight, &l.bias)).collect()
    }

    fn record_shapes(record: &Self::Record) -> Vec<Vec<usize>> {
        record.linears.iter().flat_map(|l| linear_shapes(&l.weight, &l.bias)).collect()
    }
}

/// Architecture plus parameters. The config travels with the
/// weights so a decoder can rebuild the layer stack first.
#[derive(Debug, Clone)]
pub struct DenseNet<B: Backend> {
    config: DenseNetConfig,
    layers: DenseLayers<B>,
}

#[derive(Serialize, Deserialize)]
pub(crate) struct DensePayload {
    pub(crate) config:  DenseNetConfig,
    pub(crate) weights: Vec<u8>,
}

impl<B: Backend> DenseNet<B> {
    pub const SERIALIZER_TYPE: &'static str = "fontshot.DenseNet";

    pub fn config(&self) -> &DenseNetConfig {
        &self.config
    }

    pub fn layers(&self) -> &DenseLayers<B> {
        &self.layers
    }

    /// Rebuild a DenseNet from the payload written by `encode()`.
    pub fn decode(bytes: &[u8], device: &B::Device) -> Result<Self> {
        let payload: DensePayload = decode_value(bytes).context("DenseNet payload")?;
        let skeleton = payload.config.init::<B>(device);
        let layers = decode_weights(skeleton.layers, payload.weights, device)
            .context("DenseNet weights")?;
        Ok(Self { config: payload.config, layers })
    }
}

impl<B: Backend> Typed for DenseNet<B> {
    fn serializer_type(&self) -> &'static str {
        Self::SERIALIZER_TYPE
    }

    fn encode(&self) -> Result<Vec<u8>> {
        let payload = DensePayload {
            config:  self.config.clone(),
            weights: encode_weights::<B, _>(&self.layers)?,
        };
        encode_value(&payload)
    }
}

impl<B: Backend> Net<B> for DenseNet<B> {
    fn apply(&self, input: Tensor<B, 1>, rows: usize) -> Tensor<B, 1> {
        self.layers.forward(as_rows(input, rows)).flatten(0, 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use burn::backend::NdArray;

    type TestBackend = NdArray;

    fn to_vec(t: Tensor<TestBackend, 1>) -> Vec<f32> {
        t.into_data().to_vec::<f32>().unwrap()
    }

    #[test]
    fn test_output_has_one_row_per_input_row() {
        let device = Default::default();
        let net = DenseNetConfig::new(vec![3, 5, 2]).init::<TestBackend>(&device);
        let input = Tensor::<TestBackend, 1>::from_floats([0.1, 0.2, 0.3, 0.4, 0.5, 0.6], &device);

        let out = net.apply(input, 2);
        assert_eq!(out.dims(), [4]);
        assert_eq!(net.config().input_dim(), 3);
        assert_eq!(net.config().output_dim(), 2);
    }

    #[test]
    fn test_layer_count_matches_config() {
        let device = Default::default();
        let net = DenseNetConfig::new(vec![4, 8, 8, 1]).init::<TestBackend>(&device);
        assert_eq!(net.layers().linears.len(), 3);
    }

    #[test]
    fn test_decode_restores_identical_outputs() {
        let device = Default::default();
        let net = DenseNetConfig::new(vec![2, 6, 3]).init::<TestBackend>(&device);
        let bytes = net.encode().unwrap();
        let back = DenseNet::<TestBackend>::decode(&bytes, &device).unwrap();

        let input = Tensor::<TestBackend, 1>::from_floats([1.0, -1.0, 0.5, 2.0], &device);
        assert_eq!(to_vec(net.apply(input.clone(), 2)), to_vec(back.apply(input, 2)));
        assert_eq!(back.config().layer_sizes, vec![2, 6, 3]);
        assert_eq!(back.serializer_type(), "fontshot.DenseNet");
    }

    #[test]
    fn test_decode_rejects_garbage() {
        let device = Default::default();
        assert!(DenseNet::<TestBackend>::decode(&[1, 2, 3], &device).is_err());
    }

    fn payload_with_weights(layer_sizes: Vec<usize>, weights: Vec<u8>) -> Vec<u8> {
        encode_value(&DensePayload { config: DenseNetConfig::new(layer_sizes), weights }).unwrap()
    }

    #[test]
    fn test_damaged_weights_are_an_error() {
        let device = Default::default();
        let net = DenseNetConfig::new(vec![2, 2]).init::<TestBackend>(&device);
        let weights = encode_weights::<TestBackend, _>(net.layers()).unwrap();

        for damaged in [weights[..weights.len() / 2].to_vec(), vec![1, 2, 3], vec![]] {
            let bytes = payload_with_weights(vec![2, 2], damaged);
            let err = DenseNet::<TestBackend>::decode(&bytes, &device).unwrap_err();
            assert!(format!("{err:#}").contains("DenseNet weights"), "got: {err:#}");
        }
    }

    #[test]
    fn test_weights_of_another_layout_are_rejected() {
        let device = Default::default();
        let wider = DenseNetConfig::new(vec![3, 3]).init::<TestBackend>(&device);
        let deeper = DenseNetConfig::new(vec![2, 2, 2]).init::<TestBackend>(&device);

        for other in [wider, deeper] {
            let weights = encode_weights::<TestBackend, _>(other.layers()).unwrap();
            let bytes = payload_with_weights(vec![2, 2], weights);
            let err = DenseNet::<TestBackend>::decode(&bytes, &device).unwrap_err();
            assert!(format!("{err:#}").contains("stored weights have shapes"), "got: {err:#}");
        }
    }
}
