//! OCI Distribution Specification types.
//!
//! This module defines the subset of the OCI image/distribution types that
//! the signature protocol moves over the wire.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// OCI media types used by the signature protocol.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MediaType(String);

impl MediaType {
    /// OCI image manifest media type.
    pub const OCI_MANIFEST: &'static str = "application/vnd.oci.image.manifest.v1+json";

    /// OCI image config media type (the signature entity carries a minimal
    /// placeholder config).
    pub const OCI_CONFIG: &'static str = "application/vnd.oci.image.config.v1+json";

    /// Media type of a simple-signing payload layer.
    pub const SIMPLE_SIGNING: &'static str = "application/vnd.dev.cosign.simplesigning.v1+json";

    /// Creates a new media type.
    #[must_use]
    pub fn new(media_type: impl Into<String>) -> Self {
        Self(media_type.into())
    }

    /// Returns the media type string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Creates the OCI image manifest media type.
    #[must_use]
    pub fn oci_manifest() -> Self {
        Self::new(Self::OCI_MANIFEST)
    }

    /// Creates the OCI image config media type.
    #[must_use]
    pub fn oci_config() -> Self {
        Self::new(Self::OCI_CONFIG)
    }

    /// Creates the simple-signing payload media type.
    #[must_use]
    pub fn simple_signing() -> Self {
        Self::new(Self::SIMPLE_SIGNING)
    }
}

impl std::fmt::Display for MediaType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for MediaType {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl Serialize for MediaType {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for MediaType {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Ok(Self(s))
    }
}

/// OCI content descriptor.
///
/// A descriptor describes the disposition of targeted content: its media
/// type, content digest, byte size, and optional annotations. Signature
/// layers carry their signer metadata in the annotations.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Descriptor {
    /// Media type of the referenced content.
    pub media_type: MediaType,

    /// Digest of the targeted content.
    pub digest: String,

    /// Size in bytes of the content.
    pub size: u64,

    /// Optional annotations (ordered key-value metadata).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub annotations: Option<BTreeMap<String, String>>,
}

impl Descriptor {
    /// Creates a new descriptor.
    #[must_use]
    pub fn new(media_type: MediaType, digest: impl Into<String>, size: u64) -> Self {
        Self {
            media_type,
            digest: digest.into(),
            size,
            annotations: None,
        }
    }

    /// Replaces the descriptor's annotations.
    #[must_use]
    pub fn with_annotations(mut self, annotations: BTreeMap<String, String>) -> Self {
        self.annotations = Some(annotations);
        self
    }

    /// Adds a single annotation to the descriptor.
    #[must_use]
    pub fn with_annotation(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.annotations
            .get_or_insert_with(BTreeMap::new)
            .insert(key.into(), value.into());
        self
    }
}

/// OCI image manifest.
///
/// The signature entity is one of these: a minimal config plus one layer per
/// stored signature.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Manifest {
    /// Schema version (always 2).
    pub schema_version: u32,

    /// Media type of this manifest.
    pub media_type: MediaType,

    /// Configuration descriptor.
    pub config: Descriptor,

    /// Layers that make up the artifact.
    pub layers: Vec<Descriptor>,

    /// Optional annotations.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub annotations: Option<BTreeMap<String, String>>,
}

impl Manifest {
    /// Creates an empty signature manifest around the given config.
    #[must_use]
    pub fn for_signatures(config: Descriptor) -> Self {
        Self {
            schema_version: 2,
            media_type: MediaType::oci_manifest(),
            config,
            layers: Vec::new(),
            annotations: None,
        }
    }

    /// Appends a signature layer, leaving every existing layer untouched.
    pub fn push_layer(&mut self, layer: Descriptor) {
        self.layers.push(layer);
    }
}
