//! Error types for registry operations.

use thiserror::Error;

/// Errors that can occur during registry operations.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// Failed to connect to the registry.
    #[error("failed to connect to registry at {url}: {source}")]
    ConnectionFailed {
        /// Registry URL.
        url: String,
        /// Underlying error.
        #[source]
        source: reqwest::Error,
    },

    /// Credential could not be turned into a request header.
    #[error("authentication failed: {message}")]
    AuthenticationFailed {
        /// Error message.
        message: String,
    },

    /// HTTP error from the registry.
    #[error("HTTP error from registry: {status} - {message}")]
    HttpError {
        /// HTTP status code.
        status: u16,
        /// Error message.
        message: String,
    },

    /// JSON serialization/deserialization error.
    #[error("JSON error: {source}")]
    JsonError {
        /// Underlying error.
        #[source]
        source: serde_json::Error,
    },

    /// The reference string could not be parsed.
    #[error(transparent)]
    Reference(#[from] signet_core::ReferenceError),

    /// The signature codec failed.
    #[error(transparent)]
    Codec(#[from] signet_core::CodecError),

    /// A reference could not be resolved to a digest: the registry is
    /// unreachable, the repository does not exist, or the credential was
    /// rejected.
    #[error("failed to resolve '{reference}': {message}")]
    ResolutionFailed {
        /// The reference being resolved.
        reference: String,
        /// What went wrong.
        message: String,
    },

    /// The signature entity at the derived namespace tag could not be read.
    #[error("failed to access signature entity at '{tag}': {message}")]
    EntityAccessFailed {
        /// Derived namespace tag.
        tag: String,
        /// What went wrong.
        message: String,
    },

    /// The merged signature set could not be written back.
    #[error("failed to write signatures to '{tag}': {message}")]
    WriteFailed {
        /// Derived namespace tag.
        tag: String,
        /// What went wrong.
        message: String,
    },

    /// No valid signatures were found for the digest.
    #[error("no signatures found for {digest}")]
    NoSignatures {
        /// The digest that was queried.
        digest: String,
    },
}

impl From<reqwest::Error> for RegistryError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_connect() {
            Self::ConnectionFailed {
                url: err
                    .url()
                    .map_or_else(|| "unknown".to_string(), ToString::to_string),
                source: err,
            }
        } else {
            let status = err.status().map_or(0, |s| s.as_u16());
            Self::HttpError {
                status,
                message: err.to_string(),
            }
        }
    }
}

impl From<serde_json::Error> for RegistryError {
    fn from(err: serde_json::Error) -> Self {
        Self::JsonError { source: err }
    }
}
