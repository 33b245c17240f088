//! Signature enumeration: reading every signature attached to a digest.

use signet_core::{codec, Digest, SignatureObject};
use tracing::warn;

use crate::client::RegistryClient;
use crate::config::RegistryCredential;
use crate::error::RegistryError;

/// The signatures currently attached to a digest, plus a count of entries
/// that were present but undecodable.
///
/// Entry order follows the order the registry reports the layers in. That
/// order is implementation-defined and not guaranteed stable across registry
/// implementations.
#[derive(Debug, Clone)]
pub struct SignatureList {
    /// Successfully decoded signatures, in registry-reported order.
    pub entries: Vec<SignatureObject>,

    /// Entries skipped because they were malformed or belong to a foreign
    /// scheme. Exposed for callers who want visibility into the gap between
    /// stored and returned.
    pub skipped: usize,
}

/// Reads all signature objects associated with a digest.
#[derive(Debug)]
pub struct SignatureEnumerator<'c> {
    client: &'c RegistryClient,
}

impl<'c> SignatureEnumerator<'c> {
    /// Creates an enumerator backed by the given client.
    #[must_use]
    pub const fn new(client: &'c RegistryClient) -> Self {
        Self { client }
    }

    /// Lists every valid signature attached to the digest.
    ///
    /// Malformed or incomplete entries are skipped, never fatal: one foreign
    /// or truncated entry must not abort enumeration of the rest. Each
    /// returned entry carries the canonical payload reconstructed from the
    /// digest, which is byte-identical to what the store wrote because the
    /// payload form is deterministic.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::EntityAccessFailed`] when the signature
    /// entity cannot be read, and [`RegistryError::NoSignatures`] when the
    /// entity is absent or nothing valid remains after filtering. The two
    /// are deliberately distinct: an unreachable registry is not an empty
    /// result.
    pub async fn list(
        &self,
        digest: &Digest,
        credential: &RegistryCredential,
    ) -> Result<SignatureList, RegistryError> {
        let tag = digest.signature_tag(&self.client.config().signature_suffix);

        let manifest = self
            .client
            .fetch_manifest(digest.registry(), digest.repository(), &tag, credential)
            .await
            .map_err(|e| RegistryError::EntityAccessFailed {
                tag: tag.clone(),
                message: e.to_string(),
            })?
            .ok_or_else(|| RegistryError::NoSignatures {
                digest: digest.digest_str(),
            })?;

        let payload = codec::build_payload(digest)?;

        let mut entries = Vec::with_capacity(manifest.layers.len());
        let mut skipped = 0;

        for layer in &manifest.layers {
            let decoded = layer
                .annotations
                .as_ref()
                .and_then(|a| SignatureObject::from_annotations(a, payload.clone()));

            match decoded {
                Some(signature) => entries.push(signature),
                None => {
                    skipped += 1;
                    warn!(tag, layer = %layer.digest, "skipping undecodable signature entry");
                }
            }
        }

        if entries.is_empty() {
            return Err(RegistryError::NoSignatures {
                digest: digest.digest_str(),
            });
        }

        Ok(SignatureList { entries, skipped })
    }
}
