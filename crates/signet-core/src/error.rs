//! Error types for reference parsing and the signature codec.

use thiserror::Error;

/// Errors produced while parsing an image reference string.
#[derive(Debug, Error)]
pub enum ReferenceError {
    /// The string cannot be parsed into a repository path at all.
    #[error("invalid image reference '{reference}': {reason}")]
    Invalid {
        /// The offending reference string.
        reference: String,
        /// Why parsing failed.
        reason: String,
    },
}

/// Errors produced by the signature codec.
#[derive(Debug, Error)]
pub enum CodecError {
    /// Internal serialization failure while building the canonical payload.
    #[error("failed to encode signature payload: {source}")]
    Encoding {
        /// Underlying serialization error.
        #[source]
        source: serde_json::Error,
    },

    /// The stored signature value is not valid base64.
    #[error("failed to decode signature value: {0}")]
    SignatureDecode(String),
}
