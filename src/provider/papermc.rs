//! PaperMC API providers
//!
//! Paper, Folia, Velocity, and Waterfall share the same upstream API
//! and differ only in project name, so they are one implementation
//! over a project tag. Builds are integers, the last element of the
//! versions endpoint's ordered array is the latest, and digests are
//! sha256.

use async_trait::async_trait;
use serde::Deserialize;
use ureq::Agent;

use crate::cache::{Algorithm, ArtifactKey, Cache, Downloader};
use crate::error::{McinitError, McinitResult};
use crate::provider::{api_agent, get_json, needs_resolution, DownloadedJar, Provider};

const API_BASE: &str = "https://api.papermc.io/v2/projects";

/// Which PaperMC project this provider serves
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaperProject {
    Paper,
    Folia,
    Velocity,
    Waterfall,
}

impl PaperProject {
    pub fn name(self) -> &'static str {
        match self {
            Self::Paper => "paper",
            Self::Folia => "folia",
            Self::Velocity => "velocity",
            Self::Waterfall => "waterfall",
        }
    }
}

pub struct PaperFamilyProvider {
    project: PaperProject,
    cache: Cache,
    agent: Agent,
}

impl PaperFamilyProvider {
    pub fn new(project: PaperProject, cache: Cache) -> Self {
        Self {
            project,
            cache,
            agent: api_agent(),
        }
    }

    fn project_url(&self) -> String {
        format!("{}/{}", API_BASE, self.project.name())
    }

    fn version_url(&self, version: &str) -> String {
        format!("{}/versions/{}", self.project_url(), version)
    }

    fn build_url(&self, version: &str, build: &str) -> String {
        format!("{}/builds/{}", self.version_url(version), build)
    }

    /// Resolve an empty or "latest" build to a concrete one
    async fn resolve_build(&self, version: &str, build: &str) -> McinitResult<String> {
        if needs_resolution(build) {
            self.latest_build(version).await
        } else {
            Ok(build.to_string())
        }
    }

    async fn fetch_build_info(&self, version: &str, build: &str) -> McinitResult<BuildInfo> {
        get_json(&self.agent, self.build_url(version, build)).await
    }
}

#[async_trait]
impl Provider for PaperFamilyProvider {
    fn name(&self) -> &str {
        self.project.name()
    }

    async fn available_versions(&self) -> McinitResult<Vec<String>> {
        let project: ProjectInfo = get_json(&self.agent, self.project_url()).await?;
        Ok(project.versions)
    }

    async fn latest_build(&self, version: &str) -> McinitResult<String> {
        let info: VersionBuilds = get_json(&self.agent, self.version_url(version)).await?;
        let latest = info
            .builds
            .last()
            .ok_or_else(|| McinitError::NoBuildsAvailable {
                version: version.to_string(),
            })?;
        Ok(latest.to_string())
    }

    async fn download_url(&self, version: &str, build: &str) -> McinitResult<String> {
        let build = self.resolve_build(version, build).await?;
        let info = self.fetch_build_info(version, &build).await?;
        Ok(download_url_for(
            self.project.name(),
            version,
            &build,
            &info.downloads.application.name,
        ))
    }

    async fn checksum(&self, version: &str, build: &str) -> McinitResult<(Algorithm, String)> {
        let build = self.resolve_build(version, build).await?;
        let info = self.fetch_build_info(version, &build).await?;
        Ok((Algorithm::Sha256, info.downloads.application.sha256))
    }

    async fn download_jar(&self, version: &str, build: &str) -> McinitResult<DownloadedJar> {
        let build = self.resolve_build(version, build).await?;
        let info = self.fetch_build_info(version, &build).await?;

        let url = download_url_for(
            self.project.name(),
            version,
            &build,
            &info.downloads.application.name,
        );
        let sha256 = info.downloads.application.sha256;

        let key = ArtifactKey::new(self.project.name(), version, build);
        let cache = self.cache.clone();
        let fetch_url = url.clone();
        let expected = sha256.clone();
        let local_path = tokio::task::spawn_blocking(move || {
            Downloader::new(cache).fetch(&fetch_url, &key, &expected, Algorithm::Sha256)
        })
        .await
        .map_err(|e| McinitError::Internal(format!("download task failed: {}", e)))??;

        Ok(DownloadedJar {
            local_path,
            download_url: url,
            checksum: sha256,
            algorithm: Algorithm::Sha256,
        })
    }
}

fn download_url_for(project: &str, version: &str, build: &str, filename: &str) -> String {
    format!(
        "{}/{}/versions/{}/builds/{}/downloads/{}",
        API_BASE, project, version, build, filename
    )
}

// PaperMC API structures

#[derive(Debug, Deserialize)]
struct ProjectInfo {
    versions: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct VersionBuilds {
    builds: Vec<i64>,
}

#[derive(Debug, Deserialize)]
struct BuildInfo {
    downloads: BuildDownloads,
}

#[derive(Debug, Deserialize)]
struct BuildDownloads {
    application: ApplicationDownload,
}

#[derive(Debug, Deserialize)]
struct ApplicationDownload {
    name: String,
    sha256: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn project_names() {
        assert_eq!(PaperProject::Paper.name(), "paper");
        assert_eq!(PaperProject::Folia.name(), "folia");
        assert_eq!(PaperProject::Velocity.name(), "velocity");
        assert_eq!(PaperProject::Waterfall.name(), "waterfall");
    }

    #[test]
    fn download_url_synthesis() {
        assert_eq!(
            download_url_for("paper", "1.21.4", "123", "paper-1.21.4-123.jar"),
            "https://api.papermc.io/v2/projects/paper/versions/1.21.4/builds/123/downloads/paper-1.21.4-123.jar"
        );
    }

    #[test]
    fn latest_build_is_last_element() {
        let info: VersionBuilds =
            serde_json::from_str(r#"{"builds": [118, 119, 123]}"#).unwrap();
        assert_eq!(info.builds.last().unwrap().to_string(), "123");
    }

    #[test]
    fn build_info_parses() {
        let info: BuildInfo = serde_json::from_str(
            r#"{"downloads": {"application": {"name": "paper-1.21.4-123.jar", "sha256": "cafe"}}}"#,
        )
        .unwrap();
        assert_eq!(info.downloads.application.sha256, "cafe");
    }
}
