// ============================================================
// Layer 5 — Module Weight Records
// ============================================================
// Converts a Burn module's parameters to bytes and back using
// Burn's in-memory named MessagePack recorder (full f32
// precision). Decode failures come back as RecorderError.
//
// A record only holds parameter values, not the architecture,
// so loading needs a freshly initialised skeleton of the same
// shape. load_record() swaps stored tensors in whatever their
// shape, so the stored shapes are compared with the skeleton's
// before anything is loaded.

use anyhow::{ensure, Context, Result};
use burn::{
    module::Param,
    prelude::*,
    record::{FullPrecisionSettings, NamedMpkBytesRecorder, Recorder},
};

type WeightRecorder = NamedMpkBytesRecorder<FullPrecisionSettings>;

/// Parameter shapes of a module, in a fixed order, readable from
/// both a live module and a stored record of it.
pub trait ParamShapes<B: Backend>: Module<B> {
    fn param_shapes(&self) -> Vec<Vec<usize>>;

    fn record_shapes(record: &Self::Record) -> Vec<Vec<usize>>;
}

/// Shapes of one `Linear` layer (or its record): weight, then bias.
pub fn linear_shapes<B: Backend>(
    weight: &Param<Tensor<B, 2>>,
    bias:   &Option<Param<Tensor<B, 1>>>,
) -> Vec<Vec<usize>> {
    let mut shapes = vec![weight.val().dims().to_vec()];
    shapes.extend(bias.iter().map(|b| b.val().dims().to_vec()));
    shapes
}

/// Serialise every parameter of `module`.
pub fn encode_weights<B: Backend, M: Module<B>>(module: &M) -> Result<Vec<u8>> {
    <WeightRecorder as Recorder<B>>::record(&WeightRecorder::default(), module.clone().into_record(), ())
        .context("record module weights")
}

/// Load parameters produced by [`encode_weights`] into `skeleton`.
/// Fails on undecodable bytes and on a record whose parameter
/// shapes differ from the skeleton's.
pub fn decode_weights<B: Backend, M: ParamShapes<B>>(
    skeleton: M,
    bytes:    Vec<u8>,
    device:   &B::Device,
) -> Result<M> {
    let record: M::Record = <WeightRecorder as Recorder<B>>::load(&WeightRecorder::default(), bytes, device)
        .context("load module weights")?;

    let expected = skeleton.param_shapes();
    let stored   = M::record_shapes(&record);
    ensure!(
        stored == expected,
        "stored weights have shapes {stored:?} but the layers need {expected:?}"
    );
    Ok(skeleton.load_record(record))
}
