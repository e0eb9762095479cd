// ============================================================
// Layer 5 — Component Capabilities
// ============================================================
// The model never looks inside its parts. It only needs:
//
//   Net    — batch function, N rows in → N rows out
//   Mixer  — (broadcast knowledge rows, query rows) → mixed rows
//   Typed  — a stable type tag plus an opaque payload, so the
//            part can live inside a type-tagged bundle
//
// Batches are flat rank-1 tensors. They carry no row count,
// so every call is told how many rows the data holds.

use std::fmt::Debug;

use anyhow::Result;
use burn::prelude::*;

/// Something that can be written into a type-tagged bundle.
pub trait Typed {
    /// Stable identifier the registry resolves back to a decoder.
    fn serializer_type(&self) -> &'static str;

    /// Opaque payload handed back to the decoder registered for
    /// `serializer_type()`.
    fn encode(&self) -> Result<Vec<u8>>;
}

impl<T: Typed + ?Sized> Typed for Box<T> {
    fn serializer_type(&self) -> &'static str {
        (**self).serializer_type()
    }

    fn encode(&self) -> Result<Vec<u8>> {
        (**self).encode()
    }
}

/// A batch function over flat row-major data.
pub trait Net<B: Backend>: Typed + Debug + Send {
    /// `input` holds `rows` rows of equal width; the output holds
    /// `rows` rows of the net's output width.
    fn apply(&self, input: Tensor<B, 1>, rows: usize) -> Tensor<B, 1>;
}

/// Combines two row-aligned batches into one.
pub trait Mixer<B: Backend>: Typed + Debug + Send {
    fn mix(&self, learned: Tensor<B, 1>, inputs: Tensor<B, 1>, rows: usize) -> Tensor<B, 1>;
}

/// View a flat batch as `rows` rows of width `len / rows`.
pub fn as_rows<B: Backend>(data: Tensor<B, 1>, rows: usize) -> Tensor<B, 2> {
    let cols = data.dims()[0] / rows;
    data.reshape([rows, cols])
}
