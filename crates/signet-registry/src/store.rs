//! Signature store: writing a new signature alongside its siblings.

use signet_core::{Digest, SignatureObject};
use tracing::info;

use crate::client::RegistryClient;
use crate::config::RegistryCredential;
use crate::error::RegistryError;
use crate::oci::{Descriptor, Manifest, MediaType};

/// Placeholder config blob carried by every signature manifest.
const EMPTY_CONFIG: &[u8] = b"{}";

/// Writes signature objects into the registry under the namespace derived
/// from the target digest.
///
/// Attaching is a non-transactional read-merge-write: two concurrent
/// attaches to the same digest can both read the same prior set and the
/// later write wins, losing the other's entry. The baseline registry
/// protocol offers no conditional-write primitive, so this is a documented
/// property of the store, not a bug; an optimistic retry on conflict would
/// be the hardening point if one is ever needed. No retries happen here,
/// on failure the caller sees the error and decides.
#[derive(Debug)]
pub struct SignatureStore<'c> {
    client: &'c RegistryClient,
}

impl<'c> SignatureStore<'c> {
    /// Creates a store backed by the given client.
    #[must_use]
    pub const fn new(client: &'c RegistryClient) -> Self {
        Self { client }
    }

    /// Attaches a signature to the digest's namespace, merging with any
    /// signatures already present. The merge is purely additive: the
    /// resulting set is the previous set plus exactly this entry.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::EntityAccessFailed`] when the current
    /// signature entity cannot be read, and [`RegistryError::WriteFailed`]
    /// when a blob upload or the manifest push is rejected.
    pub async fn attach(
        &self,
        digest: &Digest,
        signature: &SignatureObject,
        credential: &RegistryCredential,
    ) -> Result<(), RegistryError> {
        let tag = digest.signature_tag(&self.client.config().signature_suffix);
        let registry = digest.registry();
        let repository = digest.repository();

        // Read the current entity; absent means an empty signature set.
        let mut manifest = self
            .client
            .fetch_manifest(registry, repository, &tag, credential)
            .await
            .map_err(|e| RegistryError::EntityAccessFailed {
                tag: tag.clone(),
                message: e.to_string(),
            })?
            .unwrap_or_else(|| {
                Manifest::for_signatures(Descriptor::new(
                    MediaType::oci_config(),
                    RegistryClient::compute_digest(EMPTY_CONFIG),
                    EMPTY_CONFIG.len() as u64,
                ))
            });

        let payload_digest = RegistryClient::compute_digest(&signature.payload);
        let layer = Descriptor::new(
            MediaType::simple_signing(),
            payload_digest.clone(),
            signature.payload.len() as u64,
        )
        .with_annotations(signature.annotations());

        manifest.push_layer(layer);

        // Blob uploads are content-addressed, so re-pushing an existing
        // config or payload is harmless.
        self.client
            .upload_blob(registry, repository, EMPTY_CONFIG, &manifest.config.digest, credential)
            .await
            .map_err(|e| RegistryError::WriteFailed {
                tag: tag.clone(),
                message: e.to_string(),
            })?;

        self.client
            .upload_blob(registry, repository, &signature.payload, &payload_digest, credential)
            .await
            .map_err(|e| RegistryError::WriteFailed {
                tag: tag.clone(),
                message: e.to_string(),
            })?;

        self.client
            .push_manifest(registry, repository, &tag, &manifest, credential)
            .await
            .map_err(|e| RegistryError::WriteFailed {
                tag: tag.clone(),
                message: e.to_string(),
            })?;

        info!(
            digest = %digest,
            tag,
            signer = %signature.identity.address,
            signatures = manifest.layers.len(),
            "attached signature"
        );

        Ok(())
    }
}
