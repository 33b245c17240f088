//! OCI Distribution API client.
//!
//! This module provides the low-level registry capability the protocol
//! components are built on: manifest HEAD/GET/PUT and blob GET/upload,
//! addressed by registry host + repository, with the caller's credential
//! forwarded on every request.
//!
//! Every method blocks only on network I/O; dropping the returned future
//! abandons the in-flight registry call, so the caller's request deadline
//! propagates naturally.

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use sha2::{Digest as _, Sha256};

use crate::config::{RegistryConfig, RegistryCredential};
use crate::error::RegistryError;
use crate::oci::{Manifest, MediaType};

/// Header carrying the canonical digest of a manifest response.
const CONTENT_DIGEST_HEADER: &str = "Docker-Content-Digest";

/// Client for OCI-compatible registries.
#[derive(Debug)]
pub struct RegistryClient {
    config: RegistryConfig,
    http: reqwest::Client,
}

impl RegistryClient {
    /// Creates a new registry client with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use signet_registry::{RegistryClient, RegistryConfig};
    ///
    /// let client = RegistryClient::new(RegistryConfig::new())?;
    /// # Ok::<(), signet_registry::RegistryError>(())
    /// ```
    pub fn new(config: RegistryConfig) -> Result<Self, RegistryError> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(&config.user_agent)
            .build()
            .map_err(|source| RegistryError::ConnectionFailed {
                url: "client".to_string(),
                source,
            })?;

        Ok(Self { config, http })
    }

    /// Returns the registry configuration.
    #[must_use]
    pub const fn config(&self) -> &RegistryConfig {
        &self.config
    }

    /// Resolves a manifest reference (tag or digest) to its canonical
    /// `<algorithm>:<hex>` digest.
    ///
    /// Issues a HEAD request and reads the content-digest header, falling
    /// back to fetching the manifest body and hashing it when the registry
    /// omits the header. Returns `Ok(None)` when the manifest does not
    /// exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the registry cannot be contacted or rejects the
    /// request.
    pub async fn manifest_digest(
        &self,
        registry: &str,
        repository: &str,
        reference: &str,
        credential: &RegistryCredential,
    ) -> Result<Option<String>, RegistryError> {
        let url = format!(
            "{}/v2/{repository}/manifests/{reference}",
            self.config.base_url(registry)
        );

        let response = self
            .http
            .head(&url)
            .headers(Self::auth_headers(credential)?)
            .header(ACCEPT, MediaType::OCI_MANIFEST)
            .send()
            .await?;

        if response.status().as_u16() == 404 {
            return Ok(None);
        }
        if !response.status().is_success() {
            return Err(RegistryError::HttpError {
                status: response.status().as_u16(),
                message: format!("HEAD {url}"),
            });
        }

        if let Some(digest) = response
            .headers()
            .get(CONTENT_DIGEST_HEADER)
            .and_then(|v| v.to_str().ok())
        {
            return Ok(Some(digest.to_string()));
        }

        // Header missing; hash the manifest body instead.
        let response = self
            .http
            .get(&url)
            .headers(Self::auth_headers(credential)?)
            .header(ACCEPT, MediaType::OCI_MANIFEST)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(RegistryError::HttpError {
                status: response.status().as_u16(),
                message: response.text().await.unwrap_or_default(),
            });
        }

        let body = response.bytes().await?;
        Ok(Some(Self::compute_digest(&body)))
    }

    /// Fetches a manifest from the registry.
    ///
    /// Returns `Ok(None)` when the manifest does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the registry cannot be contacted, rejects the
    /// request, or returns a body that is not a manifest.
    pub async fn fetch_manifest(
        &self,
        registry: &str,
        repository: &str,
        reference: &str,
        credential: &RegistryCredential,
    ) -> Result<Option<Manifest>, RegistryError> {
        let url = format!(
            "{}/v2/{repository}/manifests/{reference}",
            self.config.base_url(registry)
        );

        let response = self
            .http
            .get(&url)
            .headers(Self::auth_headers(credential)?)
            .header(ACCEPT, MediaType::OCI_MANIFEST)
            .send()
            .await?;

        if response.status().as_u16() == 404 {
            return Ok(None);
        }
        if !response.status().is_success() {
            return Err(RegistryError::HttpError {
                status: response.status().as_u16(),
                message: response.text().await.unwrap_or_default(),
            });
        }

        let body = response.bytes().await?;
        serde_json::from_slice(&body).map(Some).map_err(Into::into)
    }

    /// Uploads a blob to the registry using the two-step upload flow.
    ///
    /// # Errors
    ///
    /// Returns an error if the upload session cannot be started or the
    /// upload is rejected.
    pub async fn upload_blob(
        &self,
        registry: &str,
        repository: &str,
        data: &[u8],
        digest: &str,
        credential: &RegistryCredential,
    ) -> Result<(), RegistryError> {
        let base = self.config.base_url(registry);

        // Start upload session
        let start_url = format!("{base}/v2/{repository}/blobs/uploads/");

        let response = self
            .http
            .post(&start_url)
            .headers(Self::auth_headers(credential)?)
            .send()
            .await?;

        if !response.status().is_success() && response.status().as_u16() != 202 {
            return Err(RegistryError::HttpError {
                status: response.status().as_u16(),
                message: "failed to start blob upload".to_string(),
            });
        }

        let location = response
            .headers()
            .get("location")
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| RegistryError::HttpError {
                status: response.status().as_u16(),
                message: "no upload location returned".to_string(),
            })?;

        // The location may be absolute or registry-relative.
        let location = if location.starts_with("http://") || location.starts_with("https://") {
            location.to_string()
        } else {
            format!("{base}{location}")
        };

        // Complete upload with PUT
        let upload_url = if location.contains('?') {
            format!("{location}&digest={digest}")
        } else {
            format!("{location}?digest={digest}")
        };

        let response = self
            .http
            .put(&upload_url)
            .headers(Self::auth_headers(credential)?)
            .header(CONTENT_TYPE, "application/octet-stream")
            .body(data.to_vec())
            .send()
            .await?;

        if !response.status().is_success() && response.status().as_u16() != 201 {
            return Err(RegistryError::HttpError {
                status: response.status().as_u16(),
                message: format!("failed to upload blob {digest}"),
            });
        }

        Ok(())
    }

    /// Pushes a manifest to the registry under a tag.
    ///
    /// # Errors
    ///
    /// Returns an error if the manifest cannot be serialized or the push is
    /// rejected.
    pub async fn push_manifest(
        &self,
        registry: &str,
        repository: &str,
        tag: &str,
        manifest: &Manifest,
        credential: &RegistryCredential,
    ) -> Result<(), RegistryError> {
        let url = format!(
            "{}/v2/{repository}/manifests/{tag}",
            self.config.base_url(registry)
        );

        let manifest_json = serde_json::to_vec(manifest)?;

        let response = self
            .http
            .put(&url)
            .headers(Self::auth_headers(credential)?)
            .header(CONTENT_TYPE, MediaType::OCI_MANIFEST)
            .body(manifest_json)
            .send()
            .await?;

        if !response.status().is_success() && response.status().as_u16() != 201 {
            return Err(RegistryError::HttpError {
                status: response.status().as_u16(),
                message: response.text().await.unwrap_or_default(),
            });
        }

        Ok(())
    }

    /// Creates authentication headers for a credential.
    fn auth_headers(credential: &RegistryCredential) -> Result<HeaderMap, RegistryError> {
        let mut headers = HeaderMap::new();

        match credential {
            RegistryCredential::Anonymous => {}
            RegistryCredential::Basic { username, password } => {
                let encoded = BASE64.encode(format!("{username}:{password}"));
                headers.insert(
                    AUTHORIZATION,
                    HeaderValue::from_str(&format!("Basic {encoded}")).map_err(|_| {
                        RegistryError::AuthenticationFailed {
                            message: "invalid credentials".to_string(),
                        }
                    })?,
                );
            }
            RegistryCredential::Bearer { token } => {
                headers.insert(
                    AUTHORIZATION,
                    HeaderValue::from_str(&format!("Bearer {token}")).map_err(|_| {
                        RegistryError::AuthenticationFailed {
                            message: "invalid token".to_string(),
                        }
                    })?,
                );
            }
        }

        Ok(headers)
    }

    /// Computes the SHA-256 digest of data in `<algorithm>:<hex>` form.
    #[must_use]
    pub fn compute_digest(data: &[u8]) -> String {
        let mut hasher = Sha256::new();
        hasher.update(data);
        format!("sha256:{}", hex::encode(hasher.finalize()))
    }
}
