//! BungeeCord placeholder provider
//!
//! BungeeCord has no programmatic distribution API. The provider
//! exists so the name resolves in the registry; every capability
//! fails with a manual-download message and never touches the network.

use async_trait::async_trait;

use crate::cache::Algorithm;
use crate::error::{McinitError, McinitResult};
use crate::provider::{DownloadedJar, Provider};

pub struct BungeeProvider;

impl BungeeProvider {
    pub fn new() -> Self {
        Self
    }

    fn unsupported<T>() -> McinitResult<T> {
        Err(McinitError::NotSupported("BungeeCord".to_string()))
    }
}

impl Default for BungeeProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Provider for BungeeProvider {
    fn name(&self) -> &str {
        "bungee"
    }

    async fn available_versions(&self) -> McinitResult<Vec<String>> {
        Self::unsupported()
    }

    async fn latest_build(&self, _version: &str) -> McinitResult<String> {
        Self::unsupported()
    }

    async fn download_url(&self, _version: &str, _build: &str) -> McinitResult<String> {
        Self::unsupported()
    }

    async fn checksum(&self, _version: &str, _build: &str) -> McinitResult<(Algorithm, String)> {
        Self::unsupported()
    }

    async fn download_jar(&self, _version: &str, _build: &str) -> McinitResult<DownloadedJar> {
        Self::unsupported()
    }
}
