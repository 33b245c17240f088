//! Digest resolution: mapping an image reference to an immutable digest.

use signet_core::{Digest, ImageReference, ReferenceTarget};
use tracing::debug;

use crate::client::RegistryClient;
use crate::config::RegistryCredential;
use crate::error::RegistryError;

/// Resolves human-given image references to canonical content digests.
///
/// Every call re-resolves against current registry state: tags are mutable,
/// so resolved digests are never cached across requests.
#[derive(Debug)]
pub struct DigestResolver<'c> {
    client: &'c RegistryClient,
}

impl<'c> DigestResolver<'c> {
    /// Creates a resolver backed by the given client.
    #[must_use]
    pub const fn new(client: &'c RegistryClient) -> Self {
        Self { client }
    }

    /// Resolves a reference string to the digest it currently points at.
    ///
    /// Digest-pinned references resolve without a network round-trip; tag
    /// references issue a manifest HEAD against the live registry.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::Reference`] when the string cannot be parsed
    /// into a repository path at all, and [`RegistryError::ResolutionFailed`]
    /// when the registry is unreachable, the repository or tag does not
    /// exist, or the credential is rejected.
    pub async fn resolve(
        &self,
        reference: &str,
        credential: &RegistryCredential,
    ) -> Result<Digest, RegistryError> {
        let parsed = ImageReference::parse(reference)?;

        if let ReferenceTarget::Digest { algorithm, hex } = parsed.target() {
            return Ok(Digest::new(
                parsed.registry(),
                parsed.repository(),
                algorithm,
                hex,
            ));
        }

        let target = parsed.target().as_path_segment();
        let resolved = self
            .client
            .manifest_digest(parsed.registry(), parsed.repository(), &target, credential)
            .await
            .map_err(|e| RegistryError::ResolutionFailed {
                reference: reference.to_string(),
                message: e.to_string(),
            })?
            .ok_or_else(|| RegistryError::ResolutionFailed {
                reference: reference.to_string(),
                message: "manifest not found".to_string(),
            })?;

        let digest = Digest::parse(&parsed, &resolved).map_err(|_| {
            RegistryError::ResolutionFailed {
                reference: reference.to_string(),
                message: format!("registry returned malformed digest '{resolved}'"),
            }
        })?;

        debug!(reference, digest = %digest, "resolved reference");
        Ok(digest)
    }
}
