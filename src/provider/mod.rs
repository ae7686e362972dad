//! Server jar providers
//!
//! Each upstream distribution channel (Mojang, PaperMC, PurpurMC, ...)
//! is exposed through the same capability set: list versions, resolve
//! the latest build, look up download URL and checksum, and fetch the
//! jar through the shared cache.
//!
//! HTTP calls go through `ureq` on blocking threads; agent timeouts
//! bound every request.

pub mod bungee;
pub mod papermc;
pub mod purpur;
pub mod registry;
pub mod vanilla;

pub use bungee::BungeeProvider;
pub use papermc::{PaperFamilyProvider, PaperProject};
pub use purpur::PurpurProvider;
pub use registry::ProviderRegistry;
pub use vanilla::VanillaProvider;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use std::path::PathBuf;
use std::time::Duration;
use ureq::Agent;

use crate::cache::Algorithm;
use crate::error::{McinitError, McinitResult};

/// Metadata API requests are small; downloads use their own, longer timeout.
const API_TIMEOUT: Duration = Duration::from_secs(30);

/// A downloaded server jar with its provenance
#[derive(Debug, Clone)]
pub struct DownloadedJar {
    pub local_path: PathBuf,
    pub download_url: String,
    /// Empty when the source publishes no digest
    pub checksum: String,
    pub algorithm: Algorithm,
}

/// Capability set every jar source implements
#[async_trait]
pub trait Provider: Send + Sync {
    /// Provider name as used in config and cache keys
    fn name(&self) -> &str;

    /// All Minecraft versions the source offers
    async fn available_versions(&self) -> McinitResult<Vec<String>>;

    /// Latest build for a version; empty string means the source has
    /// no build concept (distinct from failure)
    async fn latest_build(&self, version: &str) -> McinitResult<String>;

    /// Direct download URL, without transferring artifact bytes
    async fn download_url(&self, version: &str, build: &str) -> McinitResult<String>;

    /// Expected digest for a version/build, without transferring bytes
    async fn checksum(&self, version: &str, build: &str) -> McinitResult<(Algorithm, String)>;

    /// Fetch the jar through the cache, resolving "latest" first
    async fn download_jar(&self, version: &str, build: &str) -> McinitResult<DownloadedJar>;
}

/// Agent used for metadata API calls
pub(crate) fn api_agent() -> Agent {
    Agent::config_builder()
        .timeout_global(Some(API_TIMEOUT))
        .build()
        .into()
}

/// GET a JSON document on a blocking thread
pub(crate) async fn get_json<T>(agent: &Agent, url: String) -> McinitResult<T>
where
    T: DeserializeOwned + Send + 'static,
{
    let agent = agent.clone();
    let task_url = url.clone();
    tokio::task::spawn_blocking(move || -> McinitResult<T> {
        let mut response = agent.get(&task_url).call().map_err(|e| {
            let reason = match e {
                ureq::Error::StatusCode(status) => format!("unexpected status code: {}", status),
                other => other.to_string(),
            };
            McinitError::UpstreamUnavailable {
                url: task_url.clone(),
                reason,
            }
        })?;

        let body = response.body_mut().read_to_string().map_err(|e| {
            McinitError::UpstreamUnavailable {
                url: task_url.clone(),
                reason: e.to_string(),
            }
        })?;

        Ok(serde_json::from_str(&body)?)
    })
    .await
    .map_err(|e| McinitError::Internal(format!("request task failed: {}", e)))?
}

/// Treat an empty or "latest" build as unresolved
pub(crate) fn needs_resolution(build: &str) -> bool {
    build.is_empty() || build == "latest"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn latest_needs_resolution() {
        assert!(needs_resolution(""));
        assert!(needs_resolution("latest"));
        assert!(!needs_resolution("123"));
    }
}
