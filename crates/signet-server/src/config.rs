//! Server configuration.
//!
//! All handler configuration lives in one immutable [`ServerConfig`] built
//! at startup and shared by reference with every request-scoped operation;
//! there is no mutable global state.

use clap::Parser;
use signet_registry::RegistryConfig;

/// Command-line arguments for the signet server.
#[derive(Debug, Parser)]
#[command(name = "signet", about = "Wallet-signed container image signatures")]
pub struct ServerArgs {
    /// Port to listen on.
    #[arg(short, long, env = "SIGNET_PORT", default_value_t = 8787)]
    pub port: u16,

    /// Suffix of the signature namespace tag.
    #[arg(long, env = "SIGNET_SIGNATURE_SUFFIX", default_value = "eth")]
    pub signature_suffix: String,

    /// Talk plain HTTP to registries (local registries only).
    #[arg(long, env = "SIGNET_PLAIN_HTTP")]
    pub plain_http: bool,

    /// Local debug mode: reverse-proxy unmatched paths to the frontend dev
    /// server.
    #[arg(long)]
    pub local: bool,

    /// Frontend dev server proxied to in local mode.
    #[arg(long, default_value = "http://localhost:8080")]
    pub dev_proxy: String,
}

/// Immutable server configuration derived from [`ServerArgs`].
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Registry client configuration.
    pub registry: RegistryConfig,

    /// Whether the dev-proxy fallback route is active.
    pub local: bool,

    /// Base URL unmatched paths are proxied to in local mode.
    pub dev_proxy: String,
}

impl ServerConfig {
    /// Builds the configuration from parsed arguments.
    #[must_use]
    pub fn from_args(args: &ServerArgs) -> Self {
        Self {
            registry: RegistryConfig::new()
                .with_signature_suffix(&args.signature_suffix)
                .with_plain_http(args.plain_http),
            local: args.local,
            dev_proxy: args.dev_proxy.clone(),
        }
    }
}
