// ============================================================
// Layer 5 — Few-Shot Model
// ============================================================
// Glues three opaque parts into one classifier:
//
//   examples ──► encoder ──► knowledge rows ──► sum ──► repeat
//                                                        │
//   inputs ──────────────────────────────────────► mixer ◄┘
//                                                    │
//                                                    ▼
//                                               classifier ──► scores
//
// The model never inspects its parts. It only calls their
// capabilities and takes part in their (de)serialisation.
// All tensor work stays inside Burn's graph, so the whole
// pipeline can be differentiated by an autodiff backend.

use anyhow::anyhow;
use burn::prelude::*;

use crate::ml::{
    capability::{Mixer, Net, Typed},
    error::ModelError,
    registry::{deserialize_any, serialize_any},
};

/// Encoder, mixer and classifier, always all three.
///
/// `Send` but not `Sync`: parts are Burn modules, which promise
/// no shared-reference thread safety. Run one model per thread.
#[derive(Debug)]
pub struct Model<B: Backend> {
    /// Maps each example to a knowledge vector.
    /// Knowledge vectors are summed before mixing.
    encoder: Box<dyn Net<B>>,

    /// Mixes the summed knowledge with each query row.
    mixer: Box<dyn Mixer<B>>,

    /// Maps mixed rows to pre-sigmoid scores.
    classifier: Box<dyn Net<B>>,
}

impl<B: Backend> Model<B> {
    pub const SERIALIZER_TYPE: &'static str = "fontshot.Model";

    pub fn new(
        encoder:    Box<dyn Net<B>>,
        mixer:      Box<dyn Mixer<B>>,
        classifier: Box<dyn Net<B>>,
    ) -> Self {
        Self { encoder, mixer, classifier }
    }

    pub fn encoder(&self) -> &dyn Net<B> {
        self.encoder.as_ref()
    }

    pub fn mixer(&self) -> &dyn Mixer<B> {
        self.mixer.as_ref()
    }

    pub fn classifier(&self) -> &dyn Net<B> {
        self.classifier.as_ref()
    }

    /// Look at the examples, then score a batch of new inputs
    /// against them.
    ///
    /// `examples` holds `num_examples` rows and `inputs` holds
    /// `num_inputs` rows, both flat and row-major. The counts are
    /// the caller's contract; nothing here checks them, and shape
    /// errors surface from the engine unchanged.
    ///
    /// Returns `num_inputs` rows of pre-sigmoid scores.
    pub fn apply(
        &self,
        examples:     Tensor<B, 1>,
        inputs:       Tensor<B, 1>,
        num_examples: usize,
        num_inputs:   usize,
    ) -> Tensor<B, 1> {
        let learned = self.encoder.apply(examples, num_examples);
        let summed  = sum_rows(learned, num_examples);
        let repeated = repeat_rows(summed, num_inputs);

        let mixed = self.mixer.mix(repeated, inputs, num_inputs);
        self.classifier.apply(mixed, num_inputs)
    }

    /// Decode a model written by [`Model::serialize`].
    ///
    /// The bundle must hold exactly encoder, mixer and classifier,
    /// in that order. Nothing is returned on any failure.
    pub fn deserialize(bytes: &[u8], device: &B::Device) -> Result<Self, ModelError> {
        let parts = deserialize_any::<B>(bytes, device).map_err(ModelError::Deserialization)?;
        let [encoder, mixer, classifier]: [_; 3] = parts.try_into().map_err(|parts: Vec<_>| {
            ModelError::Deserialization(anyhow!("expected 3 components, found {}", parts.len()))
        })?;

        Ok(Self {
            encoder:    encoder.into_net().map_err(ModelError::Deserialization)?,
            mixer:      mixer.into_mixer().map_err(ModelError::Deserialization)?,
            classifier: classifier.into_net().map_err(ModelError::Deserialization)?,
        })
    }

    /// Encode encoder, mixer and classifier, in that order, as one
    /// type-tagged bundle.
    pub fn serialize(&self) -> Result<Vec<u8>, ModelError> {
        serialize_any(&[&self.encoder, &self.mixer, &self.classifier])
            .map_err(ModelError::Serialization)
    }
}

impl<B: Backend> Typed for Model<B> {
    fn serializer_type(&self) -> &'static str {
        Self::SERIALIZER_TYPE
    }

    fn encode(&self) -> anyhow::Result<Vec<u8>> {
        Ok(self.serialize()?)
    }
}

/// Element-wise sum of the `rows` rows of a flat batch.
///
/// Returns a single `[1, width]` row with `width = len / rows`.
/// A length that is not a multiple of `rows` leaves a remainder
/// that is ignored; this is logged rather than rejected.
pub fn sum_rows<B: Backend>(data: Tensor<B, 1>, rows: usize) -> Tensor<B, 2> {
    let len  = data.dims()[0];
    let cols = len / rows;
    let data = if cols * rows != len {
        tracing::warn!(
            "knowledge batch of {} values is not divisible into {} rows; ignoring last {}",
            len,
            rows,
            len - cols * rows
        );
        data.slice([0..cols * rows])
    } else {
        data
    };
    data.reshape([rows, cols]).sum_dim(0)
}

/// Repeat a `[1, width]` row `count` times as a flat batch.
///
/// Expressed as "zeros plus the row" so the copies stay
/// connected to `row` in the autodiff graph.
pub fn repeat_rows<B: Backend>(row: Tensor<B, 2>, count: usize) -> Tensor<B, 1> {
    let width = row.dims()[1];
    let zeros = Tensor::<B, 2>::zeros([count, width], &row.device());
    zeros.add(row.expand([count, width])).flatten(0, 1)
}
