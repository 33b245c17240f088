//! # Signet Registry
//!
//! OCI registry client and the I/O half of the signet signature protocol.
//!
//! Signatures live in the signed image's own repository, under a tag derived
//! from the image digest plus a scheme suffix (`sha256-<hex>.eth`). The
//! signature entity at that tag is an ordinary OCI manifest whose layers are
//! the individual signature objects, so any OCI-compatible registry can hold
//! them without special support.
//!
//! ## Components
//!
//! - [`RegistryClient`] - low-level manifest/blob operations
//! - [`DigestResolver`] - reference → immutable digest
//! - [`SignatureStore`] - additive signature writes
//! - [`SignatureEnumerator`] - tolerant signature reads
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use signet_registry::{
//!     DigestResolver, RegistryClient, RegistryConfig, RegistryCredential,
//! };
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = RegistryClient::new(RegistryConfig::new())?;
//!     let credential = RegistryCredential::bearer("token");
//!
//!     let digest = DigestResolver::new(&client)
//!         .resolve("registry.example/app:v1", &credential)
//!         .await?;
//!     println!("{digest}");
//!
//!     Ok(())
//! }
//! ```

#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

mod client;
mod config;
mod enumerate;
mod error;
mod oci;
mod resolver;
mod store;

pub use client::RegistryClient;
pub use config::{RegistryConfig, RegistryCredential};
pub use enumerate::{SignatureEnumerator, SignatureList};
pub use error::RegistryError;
pub use oci::{Descriptor, Manifest, MediaType};
pub use resolver::DigestResolver;
pub use store::SignatureStore;
