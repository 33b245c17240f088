//! The signature wire format: canonical signed payload and annotations.
//!
//! A stored signature is a payload blob plus an annotation map on the layer
//! descriptor that carries it. [`build_payload`] produces the exact bytes a
//! wallet signs; it must stay byte-stable for a given digest because
//! verifiers reconstruct the payload independently rather than trusting the
//! stored blob.
//!
//! Decoding is tolerant by design: [`SignatureObject::from_annotations`]
//! returns `None` for malformed or foreign-scheme entries so that one bad
//! entry never aborts enumeration of the rest.

use std::collections::BTreeMap;

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use chrono::Utc;
use serde::Serialize;

use crate::digest::Digest;
use crate::error::CodecError;
use crate::identity::SigningIdentity;

/// Annotation keys attached to every stored signature.
pub mod annotations {
    /// Base64-encoded signature value.
    pub const SIGNATURE: &str = "dev.cosignproject.cosign/signature";
    /// Public wallet address of the signer.
    pub const SIGNER: &str = "dev.cosignproject.cosign/signer";
    /// Hash of the authorizing transaction.
    pub const TRANSACTION: &str = "dev.cosignproject.cosign/transaction";
    /// Unix timestamp (seconds, decimal) of the signing request.
    pub const TIMESTAMP: &str = "dev.cosignproject.cosign/timestamp";
    /// Chain name.
    pub const BLOCKCHAIN: &str = "dev.cosignproject.cosign/blockchain";
    /// Network name.
    pub const NETWORK: &str = "dev.cosignproject.cosign/network";
    /// Decimal chain id.
    pub const CHAIN_ID: &str = "dev.cosignproject.cosign/chainId";
}

/// Statement type recorded inside the canonical payload.
const PAYLOAD_TYPE: &str = "cosign container image signature";

#[derive(Serialize)]
struct Payload {
    critical: Critical,
    optional: Option<serde_json::Value>,
}

#[derive(Serialize)]
struct Critical {
    identity: PayloadIdentity,
    image: PayloadImage,
    #[serde(rename = "type")]
    statement: &'static str,
}

#[derive(Serialize)]
struct PayloadIdentity {
    #[serde(rename = "docker-reference")]
    docker_reference: String,
}

#[derive(Serialize)]
struct PayloadImage {
    #[serde(rename = "docker-manifest-digest")]
    docker_manifest_digest: String,
}

/// Serializes a digest into the canonical signable form.
///
/// Byte-stable: the same digest always produces the same bytes. The field
/// order is fixed by the struct declaration and no map types are involved.
///
/// # Errors
///
/// Returns [`CodecError::Encoding`] on internal serialization failure.
pub fn build_payload(digest: &Digest) -> Result<Vec<u8>, CodecError> {
    let payload = Payload {
        critical: Critical {
            identity: PayloadIdentity {
                docker_reference: digest.name(),
            },
            image: PayloadImage {
                docker_manifest_digest: digest.digest_str(),
            },
            statement: PAYLOAD_TYPE,
        },
        optional: None,
    };

    serde_json::to_vec(&payload).map_err(|source| CodecError::Encoding { source })
}

/// One stored signature: the signed payload, the signature value, and the
/// signer's identity metadata.
///
/// Immutable once written; new signatures are only ever added alongside
/// existing ones, never edited.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignatureObject {
    /// The exact bytes that were signed.
    pub payload: Vec<u8>,

    /// Base64-encoded signature over `payload`.
    pub signature: String,

    /// The signer's asserted wallet identity.
    pub identity: SigningIdentity,

    /// Unix timestamp (seconds) stamped when the signature was encoded.
    pub timestamp: i64,
}

impl SignatureObject {
    /// Builds a signature object, stamping the current time when no
    /// timestamp is supplied.
    ///
    /// Absent identity fields are the caller's responsibility to fill in
    /// before encoding; no business-rule validation happens here.
    #[must_use]
    pub fn new(
        payload: Vec<u8>,
        signature: impl Into<String>,
        identity: SigningIdentity,
        timestamp: Option<i64>,
    ) -> Self {
        Self {
            payload,
            signature: signature.into(),
            identity,
            timestamp: timestamp.unwrap_or_else(|| Utc::now().timestamp()),
        }
    }

    /// Projects this signature into its annotation map, the form stored on
    /// the layer descriptor in the registry.
    #[must_use]
    pub fn annotations(&self) -> BTreeMap<String, String> {
        BTreeMap::from([
            (annotations::SIGNATURE.to_string(), self.signature.clone()),
            (annotations::SIGNER.to_string(), self.identity.address.clone()),
            (annotations::TRANSACTION.to_string(), self.identity.txn.clone()),
            (annotations::TIMESTAMP.to_string(), self.timestamp.to_string()),
            (annotations::BLOCKCHAIN.to_string(), self.identity.blockchain.clone()),
            (annotations::NETWORK.to_string(), self.identity.network.clone()),
            (annotations::CHAIN_ID.to_string(), self.identity.chain_id.to_string()),
        ])
    }

    /// Rebuilds a signature object from a stored annotation map.
    ///
    /// Returns `None` when the signature, signer, or transaction key is
    /// missing, or when the timestamp is absent or not a valid integer.
    /// Chain name, network and chain id are read leniently (empty/zero when
    /// absent) so entries written by older producers still decode. This
    /// never returns an error: undecodable entries are skipped, not fatal.
    #[must_use]
    pub fn from_annotations(
        annotations: &BTreeMap<String, String>,
        payload: Vec<u8>,
    ) -> Option<Self> {
        let signature = annotations.get(self::annotations::SIGNATURE)?;
        let signer = annotations.get(self::annotations::SIGNER)?;
        let txn = annotations.get(self::annotations::TRANSACTION)?;
        let timestamp: i64 = annotations
            .get(self::annotations::TIMESTAMP)?
            .parse()
            .ok()?;

        let blockchain = annotations
            .get(self::annotations::BLOCKCHAIN)
            .cloned()
            .unwrap_or_default();
        let network = annotations
            .get(self::annotations::NETWORK)
            .cloned()
            .unwrap_or_default();
        let chain_id = annotations
            .get(self::annotations::CHAIN_ID)
            .and_then(|raw| raw.parse().ok())
            .unwrap_or(0);

        Some(Self {
            payload,
            signature: signature.clone(),
            identity: SigningIdentity {
                address: signer.clone(),
                blockchain,
                network,
                chain_id,
                txn: txn.clone(),
            },
            timestamp,
        })
    }

    /// Decodes the base64 signature value into raw bytes.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::SignatureDecode`] when the value is not valid
    /// base64.
    pub fn signature_bytes(&self) -> Result<Vec<u8>, CodecError> {
        BASE64
            .decode(&self.signature)
            .map_err(|e| CodecError::SignatureDecode(e.to_string()))
    }
}
