// ============================================================
// Layer 5 — Type Registry and Generic (De)serialisation
// ============================================================
// Bundles are lists of (type tag, payload) pairs. Encoding is
// easy: every component knows its own tag. Decoding needs the
// reverse mapping, tag → decoder, and that lives here.
//
// The registry is process-wide and write-once-read-many:
//   - the built-in tags are installed the first time a
//     backend touches the registry
//   - extra decoders may be added with register_deserializer()
//     during start-up, before any bundle is decoded
//   - every decode afterwards only takes the read lock
//
// Decoders are generic over the Burn backend, but a static
// cannot be, so entries are keyed by (backend TypeId, tag) and
// stored type-erased; lookup downcasts back to DecodeFn<B>.

use std::{
    any::{Any, TypeId},
    collections::{HashMap, HashSet},
    sync::{OnceLock, PoisonError, RwLock},
};

use anyhow::{anyhow, bail, Context, Result};
use burn::prelude::*;

use crate::infra::codec::{decode_list, encode_list, TypedPayload};
use crate::ml::{
    capability::{Mixer, Net, Typed},
    mixers::{AddMixer, ConcatMixer},
    model::Model,
    nets::DenseNet,
};

/// A decoded bundle entry, tagged by the capability it provides.
#[derive(Debug)]
pub enum Component<B: Backend> {
    Net(Box<dyn Net<B>>),
    Mixer(Box<dyn Mixer<B>>),
    Model(Box<Model<B>>),
}

impl<B: Backend> Component<B> {
    pub fn serializer_type(&self) -> &'static str {
        match self {
            Component::Net(n)   => n.serializer_type(),
            Component::Mixer(m) => m.serializer_type(),
            Component::Model(m) => m.serializer_type(),
        }
    }

    fn kind(&self) -> &'static str {
        match self {
            Component::Net(_)   => "Net",
            Component::Mixer(_) => "Mixer",
            Component::Model(_) => "Model",
        }
    }

    pub fn into_net(self) -> Result<Box<dyn Net<B>>> {
        match self {
            Component::Net(n) => Ok(n),
            other => Err(mismatch("Net", &other)),
        }
    }

    pub fn into_mixer(self) -> Result<Box<dyn Mixer<B>>> {
        match self {
            Component::Mixer(m) => Ok(m),
            other => Err(mismatch("Mixer", &other)),
        }
    }

    pub fn into_model(self) -> Result<Model<B>> {
        match self {
            Component::Model(m) => Ok(*m),
            other => Err(mismatch("Model", &other)),
        }
    }
}

fn mismatch<B: Backend>(wanted: &str, got: &Component<B>) -> anyhow::Error {
    anyhow!(
        "expected a {wanted} but '{}' is a {}",
        got.serializer_type(),
        got.kind()
    )
}

/// Turns a payload back into a component on `device`.
pub type DecodeFn<B> = fn(&[u8], &<B as Backend>::Device) -> Result<Component<B>>;

#[derive(Default)]
struct Registry {
    decoders: HashMap<(TypeId, String), Box<dyn Any + Send + Sync>>,
    seeded:   HashSet<TypeId>,
}

impl Registry {
    fn seed<B: Backend>(&mut self) {
        if !self.seeded.insert(TypeId::of::<B>()) {
            return;
        }
        let builtins: [(&str, DecodeFn<B>); 4] = [
            (DenseNet::<B>::SERIALIZER_TYPE, decode_dense_net::<B>),
            (ConcatMixer::SERIALIZER_TYPE, decode_concat_mixer::<B>),
            (AddMixer::<B>::SERIALIZER_TYPE, decode_add_mixer::<B>),
            (Model::<B>::SERIALIZER_TYPE, decode_model::<B>),
        ];
        for (tag, decode) in builtins {
            self.decoders
                .entry((TypeId::of::<B>(), tag.to_string()))
                .or_insert_with(|| Box::new(decode) as Box<dyn Any + Send + Sync>);
        }
        tracing::debug!("Registered built-in decoders for {}", std::any::type_name::<B>());
    }

    fn get<B: Backend>(&self, tag: &str) -> Option<DecodeFn<B>> {
        self.decoders
            .get(&(TypeId::of::<B>(), tag.to_string()))
            .and_then(|f| f.downcast_ref::<DecodeFn<B>>())
            .copied()
    }
}

static REGISTRY: OnceLock<RwLock<Registry>> = OnceLock::new();

fn registry() -> &'static RwLock<Registry> {
    REGISTRY.get_or_init(|| RwLock::new(Registry::default()))
}

/// Make sure the built-in decoders for `B` are installed.
fn ensure_seeded<B: Backend>() {
    let seeded = registry()
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .seeded
        .contains(&TypeId::of::<B>());
    if !seeded {
        registry()
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .seed::<B>();
    }
}

/// Register a decoder for a component type defined outside this crate.
///
/// Must be called before any bundle containing `tag` is decoded.
/// Registering a tag twice is an error.
pub fn register_deserializer<B: Backend>(tag: &str, decode: DecodeFn<B>) -> Result<()> {
    ensure_seeded::<B>();
    let mut reg = registry().write().unwrap_or_else(PoisonError::into_inner);
    let key = (TypeId::of::<B>(), tag.to_string());
    if reg.decoders.contains_key(&key) {
        bail!("a deserializer for '{tag}' is already registered");
    }
    reg.decoders.insert(key, Box::new(decode));
    tracing::debug!("Registered deserializer '{}'", tag);
    Ok(())
}

/// Look up the decoder registered for `tag`.
pub fn lookup<B: Backend>(tag: &str) -> Option<DecodeFn<B>> {
    ensure_seeded::<B>();
    registry()
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .get::<B>(tag)
}

/// Encode components, in order, as one type-tagged bundle.
pub fn serialize_any(items: &[&dyn Typed]) -> Result<Vec<u8>> {
    let payloads = items
        .iter()
        .map(|item| {
            let tag = item.serializer_type();
            let payload = item.encode().with_context(|| format!("encode '{tag}'"))?;
            Ok(TypedPayload::new(tag, payload))
        })
        .collect::<Result<Vec<_>>>()?;
    encode_list(&payloads)
}

/// Decode every entry of a bundle through the registry.
pub fn deserialize_any<B: Backend>(bytes: &[u8], device: &B::Device) -> Result<Vec<Component<B>>> {
    decode_list(bytes)?
        .into_iter()
        .map(|entry| {
            let decode = lookup::<B>(&entry.type_tag)
                .ok_or_else(|| anyhow!("no deserializer registered for '{}'", entry.type_tag))?;
            decode(&entry.payload, device).with_context(|| format!("decode '{}'", entry.type_tag))
        })
        .collect()
}

fn decode_dense_net<B: Backend>(bytes: &[u8], device: &B::Device) -> Result<Component<B>> {
    Ok(Component::Net(Box::new(DenseNet::<B>::decode(bytes, device)?)))
}

fn decode_concat_mixer<B: Backend>(bytes: &[u8], _device: &B::Device) -> Result<Component<B>> {
    Ok(Component::Mixer(Box::new(ConcatMixer::decode(bytes)?)))
}

fn decode_add_mixer<B: Backend>(bytes: &[u8], device: &B::Device) -> Result<Component<B>> {
    Ok(Component::Mixer(Box::new(AddMixer::<B>::decode(bytes, device)?)))
}

fn decode_model<B: Backend>(bytes: &[u8], device: &B::Device) -> Result<Component<B>> {
    Ok(Component::Model(Box::new(Model::deserialize(bytes, device)?)))
}
