//! PurpurMC provider
//!
//! Same latest-build semantics as the Paper family, but the API never
//! publishes a digest: `checksum` returns an empty digest and downloads
//! are accepted unverified. That is the upstream's limitation, not an
//! error.

use async_trait::async_trait;
use serde::Deserialize;
use ureq::Agent;

use crate::cache::{Algorithm, ArtifactKey, Cache, Downloader};
use crate::error::{McinitError, McinitResult};
use crate::provider::{api_agent, get_json, needs_resolution, DownloadedJar, Provider};

const API_BASE: &str = "https://api.purpurmc.org/v2/purpur";

pub struct PurpurProvider {
    cache: Cache,
    agent: Agent,
}

impl PurpurProvider {
    pub fn new(cache: Cache) -> Self {
        Self {
            cache,
            agent: api_agent(),
        }
    }

    async fn resolve_build(&self, version: &str, build: &str) -> McinitResult<String> {
        if needs_resolution(build) {
            self.latest_build(version).await
        } else {
            Ok(build.to_string())
        }
    }
}

#[async_trait]
impl Provider for PurpurProvider {
    fn name(&self) -> &str {
        "purpur"
    }

    async fn available_versions(&self) -> McinitResult<Vec<String>> {
        let project: ProjectInfo = get_json(&self.agent, API_BASE.to_string()).await?;
        Ok(project.versions)
    }

    async fn latest_build(&self, version: &str) -> McinitResult<String> {
        let url = format!("{}/{}", API_BASE, version);
        let info: VersionInfo = get_json(&self.agent, url).await?;
        if info.builds.latest.is_empty() {
            return Err(McinitError::NoBuildsAvailable {
                version: version.to_string(),
            });
        }
        Ok(info.builds.latest)
    }

    async fn download_url(&self, version: &str, build: &str) -> McinitResult<String> {
        let build = self.resolve_build(version, build).await?;
        Ok(download_url_for(version, &build))
    }

    async fn checksum(&self, _version: &str, _build: &str) -> McinitResult<(Algorithm, String)> {
        // upstream publishes no digests
        Ok((Algorithm::None, String::new()))
    }

    async fn download_jar(&self, version: &str, build: &str) -> McinitResult<DownloadedJar> {
        let build = self.resolve_build(version, build).await?;
        let url = download_url_for(version, &build);

        let key = ArtifactKey::new("purpur", version, build);
        let cache = self.cache.clone();
        let fetch_url = url.clone();
        let local_path = tokio::task::spawn_blocking(move || {
            Downloader::new(cache).fetch(&fetch_url, &key, "", Algorithm::None)
        })
        .await
        .map_err(|e| McinitError::Internal(format!("download task failed: {}", e)))??;

        Ok(DownloadedJar {
            local_path,
            download_url: url,
            checksum: String::new(),
            algorithm: Algorithm::None,
        })
    }
}

fn download_url_for(version: &str, build: &str) -> String {
    format!("{}/{}/{}/download", API_BASE, version, build)
}

// PurpurMC API structures

#[derive(Debug, Deserialize)]
struct ProjectInfo {
    versions: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct VersionInfo {
    builds: Builds,
}

#[derive(Debug, Deserialize)]
struct Builds {
    latest: String,
}
