// ============================================================
// Layer 6 — Type-Tagged Codec
// ============================================================
// The generic wire envelope used for every persisted bundle.
// It knows nothing about tensors or models: it stores an
// ordered list of (type tag, opaque payload) pairs.
//
// Layout of one bundle:
//   [tag + payload][tag + payload]...[tag + payload]
//
// Encoded with bincode (fixed-width integers, length-prefixed
// strings and byte vectors). Trailing bytes are rejected so a
// bundle glued to garbage does not decode silently.

use anyhow::{bail, Context, Result};
use bincode::Options;
use serde::{Deserialize, Serialize};

/// Upper bound on a single bundle. Guards decode against a
/// corrupt length prefix asking for gigabytes.
const MAX_BUNDLE_BYTES: u64 = 1 << 30;

/// One entry of a bundle: which decoder to use and what to feed it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypedPayload {
    pub type_tag: String,
    pub payload:  Vec<u8>,
}

impl TypedPayload {
    pub fn new(type_tag: impl Into<String>, payload: Vec<u8>) -> Self {
        Self { type_tag: type_tag.into(), payload }
    }
}

fn options() -> impl Options {
    bincode::DefaultOptions::new()
        .with_fixint_encoding()
        .with_limit(MAX_BUNDLE_BYTES)
        .reject_trailing_bytes()
}

/// Encode an ordered list of typed payloads into one blob.
pub fn encode_list(items: &[TypedPayload]) -> Result<Vec<u8>> {
    options()
        .serialize(items)
        .context("encode typed payload list")
}

/// Decode a blob produced by [`encode_list`].
pub fn decode_list(bytes: &[u8]) -> Result<Vec<TypedPayload>> {
    if bytes.is_empty() {
        bail!("empty bundle");
    }
    options()
        .deserialize(bytes)
        .context("decode typed payload list")
}

/// Encode any serde value with the same bincode settings.
/// Components use this for their own payload envelopes.
pub fn encode_value<T: Serialize>(value: &T) -> Result<Vec<u8>> {
    options().serialize(value).context("encode payload")
}

/// Counterpart of [`encode_value`].
pub fn decode_value<T: for<'de> Deserialize<'de>>(bytes: &[u8]) -> Result<T> {
    options().deserialize(bytes).context("decode payload")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Vec<TypedPayload> {
        vec![
            TypedPayload::new("a.First", vec![1, 2, 3]),
            TypedPayload::new("a.Second", vec![]),
            TypedPayload::new("a.Third", vec![9; 40]),
        ]
    }

    #[test]
    fn test_list_keeps_order_and_tags() {
        let bytes = encode_list(&sample()).unwrap();
        let back  = decode_list(&bytes).unwrap();
        assert_eq!(back, sample());
    }

    #[test]
    fn test_empty_input_is_error() {
        let err = decode_list(&[]).unwrap_err();
        assert!(err.to_string().contains("empty"));
    }

    #[test]
    fn test_truncated_input_is_error() {
        let bytes = encode_list(&sample()).unwrap();
        for cut in [1, bytes.len() / 2, bytes.len() - 1] {
            assert!(decode_list(&bytes[..cut]).is_err(), "cut at {cut} decoded");
        }
    }

    #[test]
    fn test_trailing_bytes_are_rejected() {
        let mut bytes = encode_list(&sample()).unwrap();
        bytes.push(0);
        assert!(decode_list(&bytes).is_err());
    }

    #[test]
    fn test_empty_list_round_trips() {
        let bytes = encode_list(&[]).unwrap();
        assert!(decode_list(&bytes).unwrap().is_empty());
    }
}
