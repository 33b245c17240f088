//! Content digests and the signature namespace derived from them.

use crate::error::ReferenceError;
use crate::reference::ImageReference;

/// Default suffix distinguishing this signature scheme from others sharing
/// the registry (a PKI-based scheme would use a different suffix and can
/// never collide on the derived tag).
pub const DEFAULT_SIGNATURE_SUFFIX: &str = "eth";

/// An immutable content digest bound to a repository.
///
/// The digest is the primary key for all signature lookups. It is computed
/// fresh from live registry state on every request and never cached; the
/// registry is the source of truth and tags are mutable.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Digest {
    registry: String,
    repository: String,
    algorithm: String,
    hex: String,
}

impl Digest {
    /// Creates a digest bound to a registry host and repository path.
    #[must_use]
    pub fn new(
        registry: impl Into<String>,
        repository: impl Into<String>,
        algorithm: impl Into<String>,
        hex: impl Into<String>,
    ) -> Self {
        Self {
            registry: registry.into(),
            repository: repository.into(),
            algorithm: algorithm.into(),
            hex: hex.into(),
        }
    }

    /// Parses an `<algorithm>:<hex>` digest string, binding it to the
    /// repository named by `reference`.
    ///
    /// # Errors
    ///
    /// Returns [`ReferenceError::Invalid`] when the string is not of the
    /// `<algorithm>:<hex>` form.
    pub fn parse(reference: &ImageReference, digest: &str) -> Result<Self, ReferenceError> {
        match digest.split_once(':') {
            Some((algorithm, hex)) if !algorithm.is_empty() && !hex.is_empty() => Ok(Self::new(
                reference.registry(),
                reference.repository(),
                algorithm,
                hex,
            )),
            _ => Err(ReferenceError::Invalid {
                reference: digest.to_string(),
                reason: "digest must be '<algorithm>:<hex>'".to_string(),
            }),
        }
    }

    /// Returns the registry host this digest is bound to.
    #[must_use]
    pub fn registry(&self) -> &str {
        &self.registry
    }

    /// Returns the repository path without the registry host.
    #[must_use]
    pub fn repository(&self) -> &str {
        &self.repository
    }

    /// Returns the full repository name, `<registry>/<repository>`.
    #[must_use]
    pub fn name(&self) -> String {
        format!("{}/{}", self.registry, self.repository)
    }

    /// Returns the digest algorithm (e.g., `sha256`).
    #[must_use]
    pub fn algorithm(&self) -> &str {
        &self.algorithm
    }

    /// Returns the hex digest value.
    #[must_use]
    pub fn hex(&self) -> &str {
        &self.hex
    }

    /// Returns the `<algorithm>:<hex>` form used on the wire.
    #[must_use]
    pub fn digest_str(&self) -> String {
        format!("{}:{}", self.algorithm, self.hex)
    }

    /// Derives the registry tag under which signatures for this digest are
    /// stored: `<algorithm>-<hex>.<suffix>`.
    ///
    /// The suffix is the final dot-separated component, so two different
    /// suffixes always derive two different tags.
    #[must_use]
    pub fn signature_tag(&self, suffix: &str) -> String {
        format!("{}-{}.{}", self.algorithm, self.hex, suffix)
    }
}

impl std::fmt::Display for Digest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.algorithm, self.hex)
    }
}
