use thiserror::Error;

/// Failures of the model's own persistence operations.
///
/// Each variant keeps the underlying cause as its source, so
/// `format!("{err:#}")` through anyhow prints the full chain,
/// e.g. `deserialize Model: decode typed payload list: ...`.
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("deserialize Model")]
    Deserialization(#[source] anyhow::Error),

    #[error("serialize Model")]
    Serialization(#[source] anyhow::Error),
}
