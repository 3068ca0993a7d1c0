use thiserror::Error;

/// Errors produced while encoding or decoding wire payloads.
#[derive(Error, Debug)]
pub enum ProtocolError {
    /// The payload could not be serialized or deserialized.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
