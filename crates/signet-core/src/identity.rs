//! Signer identity metadata.

use serde::{Deserialize, Serialize};

/// The wallet identity asserted by a signer.
///
/// Supplied by the caller and persisted immutably alongside the signature.
/// Nothing in this crate verifies the wallet signature or the transaction;
/// verification is the consumer's responsibility.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SigningIdentity {
    /// Public wallet address.
    pub address: String,

    /// Chain name (e.g., `ethereum`).
    pub blockchain: String,

    /// Network name within the chain (e.g., `mainnet`).
    pub network: String,

    /// Numeric chain id of the network.
    pub chain_id: u64,

    /// Hash of the transaction asserted to authorize this signature.
    pub txn: String,
}

impl SigningIdentity {
    /// Creates a new signing identity.
    #[must_use]
    pub fn new(
        address: impl Into<String>,
        blockchain: impl Into<String>,
        network: impl Into<String>,
        chain_id: u64,
        txn: impl Into<String>,
    ) -> Self {
        Self {
            address: address.into(),
            blockchain: blockchain.into(),
            network: network.into(),
            chain_id,
            txn: txn.into(),
        }
    }
}
