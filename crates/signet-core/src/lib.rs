//! # Signet Core
//!
//! Core types and the signature codec for wallet-signed container images.
//!
//! This crate provides the I/O-free half of the signet protocol:
//!
//! - [`ImageReference`] - Lenient parsing of image reference strings
//! - [`Digest`] - An immutable content digest bound to a repository
//! - [`SigningIdentity`] - The signer's wallet identity metadata
//! - [`SignatureObject`] - One stored signature with its annotations
//! - [`codec`] - The canonical signed payload and annotation wire format
//!
//! Everything that talks to a registry lives in `signet-registry`; this crate
//! only defines the shapes those operations move around.
//!
//! ## Example
//!
//! ```rust
//! use signet_core::{codec, Digest, ImageReference, SignatureObject, SigningIdentity};
//!
//! let reference = ImageReference::parse("registry.example/app:v1").unwrap();
//! assert_eq!(reference.name(), "registry.example/app");
//!
//! let digest = Digest::new("registry.example", "app", "sha256", "ab".repeat(32));
//! let payload = codec::build_payload(&digest).unwrap();
//!
//! let identity = SigningIdentity::new("0xABC", "ethereum", "mainnet", 1, "0xdead");
//! let signature = SignatureObject::new(payload, "c2lnbmVk", identity, Some(1_700_000_000));
//! assert_eq!(signature.identity.address, "0xABC");
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod codec;
pub mod digest;
pub mod error;
pub mod identity;
pub mod reference;


pub use codec::SignatureObject;
pub use digest::{Digest, DEFAULT_SIGNATURE_SUFFIX};
pub use error::{CodecError, ReferenceError};
pub use identity::SigningIdentity;
pub use reference::{ImageReference, ReferenceTarget};
