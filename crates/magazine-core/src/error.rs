//! Error types for the magazine pipeline.

use thiserror::Error;

/// Errors that can occur while syncing, decoding, or persisting events.
#[derive(Debug, Error)]
pub enum MagazineError {
    #[error("chain unavailable: {0}")]
    ChainUnavailable(String),

    #[error("store unavailable: {0}")]
    StoreUnavailable(String),

    #[error("unknown event signature: {topic0}")]
    UnknownSignature { topic0: String },

    #[error("decode failed for '{name}': {reason}")]
    Decode { name: String, reason: String },

    #[error("invalid ABI fragment '{fragment}': {reason}")]
    InvalidAbi { fragment: String, reason: String },

    #[error("duplicate event signature: {signature}")]
    DuplicateSignature { signature: String },

    #[error("sink error: {0}")]
    Sink(String),
}

impl MagazineError {
    /// Returns `true` if the error concerns a single log rather than the
    /// whole cycle. These are skippable under the default decode policy.
    pub fn is_decode(&self) -> bool {
        matches!(self, Self::UnknownSignature { .. } | Self::Decode { .. })
    }
}
