//! Image reference parsing.
//!
//! Supports the reference forms accepted on the wire:
//! - `registry.example/app` → tag defaults to `latest`
//! - `registry.example/app:v1` → tagged
//! - `registry.example/app@sha256:abc...` → digest-pinned
//! - `app:v1` → no registry host, defaults to `docker.io`
//!
//! Validation is deliberately lenient: a string that is ambiguous between a
//! tag and a digest form is kept as a tag and resolved against live registry
//! state. Parsing only fails when no repository path can be extracted.

use crate::error::ReferenceError;

/// The tag-or-digest half of a parsed reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReferenceTarget {
    /// A mutable tag, resolved against the registry on every use.
    Tag(String),

    /// An immutable digest pin.
    Digest {
        /// Digest algorithm (e.g., `sha256`).
        algorithm: String,
        /// Hex digest value.
        hex: String,
    },
}

impl ReferenceTarget {
    /// Returns the path segment used on the manifest endpoint for this target.
    #[must_use]
    pub fn as_path_segment(&self) -> String {
        match self {
            Self::Tag(tag) => tag.clone(),
            Self::Digest { algorithm, hex } => format!("{algorithm}:{hex}"),
        }
    }
}

/// A parsed image reference: registry host, repository path, and target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageReference {
    registry: String,
    repository: String,
    target: ReferenceTarget,
}

/// Registry host assumed when the reference does not name one.
const DEFAULT_REGISTRY: &str = "docker.io";

/// Tag assumed when the reference does not name one.
const DEFAULT_TAG: &str = "latest";

impl ImageReference {
    /// Parses a reference string.
    ///
    /// # Errors
    ///
    /// Returns [`ReferenceError::Invalid`] when the string cannot be parsed
    /// into a repository path: empty input, empty path components, or an
    /// empty tag/digest after the separator.
    ///
    /// # Examples
    ///
    /// ```
    /// use signet_core::{ImageReference, ReferenceTarget};
    ///
    /// let tagged = ImageReference::parse("registry.example/app:v1").unwrap();
    /// assert_eq!(tagged.registry(), "registry.example");
    /// assert_eq!(tagged.repository(), "app");
    /// assert_eq!(tagged.target(), &ReferenceTarget::Tag("v1".to_string()));
    ///
    /// let pinned = ImageReference::parse("registry.example/app@sha256:abc123").unwrap();
    /// assert!(matches!(pinned.target(), ReferenceTarget::Digest { .. }));
    /// ```
    pub fn parse(reference: &str) -> Result<Self, ReferenceError> {
        let reference = reference.trim();

        if reference.is_empty() {
            return Err(invalid(reference, "empty reference"));
        }

        // Digest pin takes precedence; a tag before the '@' is ignored.
        if let Some((base, digest)) = reference.split_once('@') {
            let (algorithm, hex) = digest
                .split_once(':')
                .ok_or_else(|| invalid(reference, "digest must be '<algorithm>:<hex>'"))?;
            if algorithm.is_empty() || hex.is_empty() {
                return Err(invalid(reference, "digest must be '<algorithm>:<hex>'"));
            }

            let name = strip_tag(base);
            let (registry, repository) = split_host(name, reference)?;
            return Ok(Self {
                registry,
                repository,
                target: ReferenceTarget::Digest {
                    algorithm: algorithm.to_string(),
                    hex: hex.to_string(),
                },
            });
        }

        let (name, tag) = match tag_position(reference) {
            Some(pos) => {
                let tag = &reference[pos + 1..];
                if tag.is_empty() {
                    return Err(invalid(reference, "empty tag"));
                }
                (&reference[..pos], tag.to_string())
            }
            None => (reference, DEFAULT_TAG.to_string()),
        };

        let (registry, repository) = split_host(name, reference)?;
        Ok(Self {
            registry,
            repository,
            target: ReferenceTarget::Tag(tag),
        })
    }

    /// Returns the registry host.
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

    /// Returns the tag or digest this reference points at.
    #[must_use]
    pub const fn target(&self) -> &ReferenceTarget {
        &self.target
    }
}

impl std::fmt::Display for ImageReference {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.target {
            ReferenceTarget::Tag(tag) => {
                write!(f, "{}/{}:{}", self.registry, self.repository, tag)
            }
            ReferenceTarget::Digest { algorithm, hex } => {
                write!(f, "{}/{}@{}:{}", self.registry, self.repository, algorithm, hex)
            }
        }
    }
}

impl std::str::FromStr for ImageReference {
    type Err = ReferenceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

fn invalid(reference: &str, reason: &str) -> ReferenceError {
    ReferenceError::Invalid {
        reference: reference.to_string(),
        reason: reason.to_string(),
    }
}

/// Position of the tag separator: the last ':' after the last '/'.
/// A ':' inside the first component belongs to a registry port.
fn tag_position(reference: &str) -> Option<usize> {
    let colon = reference.rfind(':')?;
    match reference.rfind('/') {
        Some(slash) if colon < slash => None,
        _ => Some(colon),
    }
}

fn strip_tag(name: &str) -> &str {
    tag_position(name).map_or(name, |pos| &name[..pos])
}

/// Splits `<host>/<repo>` using the docker heuristic: the first component is
/// a registry host when it contains a '.' or ':' or is `localhost`.
fn split_host(name: &str, reference: &str) -> Result<(String, String), ReferenceError> {
    if name.is_empty() {
        return Err(invalid(reference, "empty repository path"));
    }

    let (registry, repository) = match name.split_once('/') {
        Some((first, rest))
            if first.contains('.') || first.contains(':') || first == "localhost" =>
        {
            (first.to_string(), rest.to_string())
        }
        _ => (DEFAULT_REGISTRY.to_string(), name.to_string()),
    };

    if repository.is_empty() || repository.split('/').any(str::is_empty) {
        return Err(invalid(reference, "empty repository path component"));
    }

    Ok((registry, repository))
}
