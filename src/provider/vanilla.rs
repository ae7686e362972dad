//! Mojang's official server distribution
//!
//! Versions come from the launcher metadata manifest; only
//! release-typed entries are surfaced. Vanilla has no build axis, so
//! cache keys carry an empty build component. Digests are sha1.

use async_trait::async_trait;
use serde::Deserialize;
use ureq::Agent;

use crate::cache::{Algorithm, ArtifactKey, Cache, Downloader};
use crate::error::{McinitError, McinitResult};
use crate::provider::{api_agent, get_json, DownloadedJar, Provider};

const MANIFEST_URL: &str = "https://launchermeta.mojang.com/mc/game/version_manifest_v2.json";

pub struct VanillaProvider {
    cache: Cache,
    agent: Agent,
}

impl VanillaProvider {
    pub fn new(cache: Cache) -> Self {
        Self {
            cache,
            agent: api_agent(),
        }
    }

    async fn fetch_manifest(&self) -> McinitResult<VersionManifest> {
        get_json(&self.agent, MANIFEST_URL.to_string()).await
    }

    /// Resolve the per-version metadata document for `version`
    async fn fetch_version_info(&self, version: &str) -> McinitResult<VersionInfo> {
        let manifest = self.fetch_manifest().await?;
        let entry = manifest
            .versions
            .iter()
            .find(|v| v.id == version)
            .ok_or_else(|| McinitError::VersionNotFound {
                version: version.to_string(),
            })?;

        let info: VersionInfo = get_json(&self.agent, entry.url.clone()).await?;
        if info.downloads.server.url.is_empty() {
            return Err(McinitError::UpstreamUnavailable {
                url: entry.url.clone(),
                reason: format!("no server download for version {}", version),
            });
        }
        Ok(info)
    }
}

#[async_trait]
impl Provider for VanillaProvider {
    fn name(&self) -> &str {
        "vanilla"
    }

    async fn available_versions(&self) -> McinitResult<Vec<String>> {
        let manifest = self.fetch_manifest().await?;
        Ok(release_ids(&manifest))
    }

    async fn latest_build(&self, _version: &str) -> McinitResult<String> {
        // no build concept
        Ok(String::new())
    }

    async fn download_url(&self, version: &str, _build: &str) -> McinitResult<String> {
        let info = self.fetch_version_info(version).await?;
        Ok(info.downloads.server.url)
    }

    async fn checksum(&self, version: &str, _build: &str) -> McinitResult<(Algorithm, String)> {
        let info = self.fetch_version_info(version).await?;
        Ok((Algorithm::Sha1, info.downloads.server.sha1))
    }

    async fn download_jar(&self, version: &str, _build: &str) -> McinitResult<DownloadedJar> {
        let info = self.fetch_version_info(version).await?;
        let url = info.downloads.server.url;
        let sha1 = info.downloads.server.sha1;

        let key = ArtifactKey::new("vanilla", version, "");
        let cache = self.cache.clone();
        let fetch_url = url.clone();
        let expected = sha1.clone();
        let local_path = tokio::task::spawn_blocking(move || {
            Downloader::new(cache).fetch(&fetch_url, &key, &expected, Algorithm::Sha1)
        })
        .await
        .map_err(|e| McinitError::Internal(format!("download task failed: {}", e)))??;

        Ok(DownloadedJar {
            local_path,
            download_url: url,
            checksum: sha1,
            algorithm: Algorithm::Sha1,
        })
    }
}

/// Release-typed version ids, newest first (manifest order)
fn release_ids(manifest: &VersionManifest) -> Vec<String> {
    manifest
        .versions
        .iter()
        .filter(|v| v.kind == "release")
        .map(|v| v.id.clone())
        .collect()
}

// Mojang API structures

#[derive(Debug, Deserialize)]
struct VersionManifest {
    versions: Vec<VersionEntry>,
}

#[derive(Debug, Deserialize)]
struct VersionEntry {
    id: String,
    #[serde(rename = "type")]
    kind: String,
    url: String,
}

#[derive(Debug, Deserialize)]
struct VersionInfo {
    downloads: Downloads,
}

#[derive(Debug, Deserialize, Default)]
struct Downloads {
    #[serde(default)]
    server: ServerDownload,
}

#[derive(Debug, Deserialize, Default)]
struct ServerDownload {
    #[serde(default)]
    sha1: String,
    #[serde(default)]
    url: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn manifest() -> VersionManifest {
        serde_json::from_str(
            r#"{
                "latest": {"release": "1.21.4", "snapshot": "25w02a"},
                "versions": [
                    {"id": "25w02a", "type": "snapshot", "url": "https://meta/25w02a.json"},
                    {"id": "1.21.4", "type": "release", "url": "https://meta/1.21.4.json"},
                    {"id": "1.21.3", "type": "release", "url": "https://meta/1.21.3.json"},
                    {"id": "24w44a", "type": "snapshot", "url": "https://meta/24w44a.json"}
                ]
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn only_releases_are_listed() {
        assert_eq!(release_ids(&manifest()), vec!["1.21.4", "1.21.3"]);
    }

    #[test]
    fn version_info_parses_server_download() {
        let info: VersionInfo = serde_json::from_str(
            r#"{"downloads": {"server": {"sha1": "abc123", "size": 1, "url": "https://dl/server.jar"}}}"#,
        )
        .unwrap();
        assert_eq!(info.downloads.server.sha1, "abc123");
    }

    #[test]
    fn version_info_tolerates_missing_server() {
        let info: VersionInfo = serde_json::from_str(r#"{"downloads": {}}"#).unwrap();
        assert!(info.downloads.server.url.is_empty());
    }
}
