//! Shared jar cache
//!
//! Downloaded server jars are cached once per (source, version, build)
//! under the platform cache directory and reused across server
//! directories. Artifacts are immutable once written: the downloader
//! streams into a temp file and promotes it with an atomic rename, and
//! a metadata record is written only after verification succeeds.
//!
//! `has()` only checks file presence. Files can be tampered with
//! out-of-band, so callers needing a strong guarantee re-verify the
//! digest before trusting a hit.

pub mod checksum;
pub mod download;

pub use checksum::Algorithm;
pub use download::Downloader;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{McinitError, McinitResult};

/// Identity of a cached artifact
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactKey {
    pub source_kind: String,
    pub version: String,
    /// Empty for sources without a build axis (e.g. vanilla).
    /// Always a concrete value; "latest" is resolved before lookup.
    pub build: String,
}

impl ArtifactKey {
    pub fn new(
        source_kind: impl Into<String>,
        version: impl Into<String>,
        build: impl Into<String>,
    ) -> Self {
        Self {
            source_kind: source_kind.into(),
            version: version.into(),
            build: build.into(),
        }
    }

    /// File stem: `<kind>-<version>[-<build>]`
    fn file_stem(&self) -> String {
        if self.build.is_empty() {
            format!("{}-{}", self.source_kind, self.version)
        } else {
            format!("{}-{}-{}", self.source_kind, self.version, self.build)
        }
    }
}

/// Metadata record stored next to each cached jar
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheRecord {
    pub version: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub build: String,
    #[serde(rename = "serverType")]
    pub source_kind: String,
    pub download_url: String,
    pub checksum: String,
    pub algorithm: Algorithm,
    pub cached_at: DateTime<Utc>,
}

/// The on-disk cache
#[derive(Debug, Clone)]
pub struct Cache {
    root: PathBuf,
}

impl Cache {
    /// Open the cache at the platform cache directory
    pub fn open() -> McinitResult<Self> {
        let root = dirs::cache_dir()
            .ok_or(McinitError::PlatformUnsupported)?
            .join("mcinit");
        Ok(Self { root })
    }

    /// Open a cache rooted at an explicit directory
    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn jars_dir(&self) -> PathBuf {
        self.root.join("jars")
    }

    /// Path where the artifact for `key` lives. Pure, no I/O.
    pub fn jar_path(&self, key: &ArtifactKey) -> PathBuf {
        self.jars_dir().join(format!("{}.jar", key.file_stem()))
    }

    /// Path of the metadata record for `key`. Pure, no I/O.
    pub fn meta_path(&self, key: &ArtifactKey) -> PathBuf {
        self.jars_dir().join(format!("{}.jar.meta.json", key.file_stem()))
    }

    /// True iff both the artifact and its metadata record exist
    pub fn has(&self, key: &ArtifactKey) -> bool {
        self.jar_path(key).exists() && self.meta_path(key).exists()
    }

    /// Read the metadata record for a cached artifact
    pub fn read_metadata(&self, key: &ArtifactKey) -> McinitResult<CacheRecord> {
        let path = self.meta_path(key);
        let data = match fs::read_to_string(&path) {
            Ok(data) => data,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(McinitError::CacheMetadataNotFound(path));
            }
            Err(e) => return Err(McinitError::io(format!("reading {}", path.display()), e)),
        };
        Ok(serde_json::from_str(&data)?)
    }

    /// Write the metadata record for a cached artifact
    pub fn write_metadata(&self, key: &ArtifactKey, record: &CacheRecord) -> McinitResult<()> {
        let path = self.meta_path(key);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| McinitError::io(format!("creating {}", parent.display()), e))?;
        }
        let data = serde_json::to_string_pretty(record)?;
        fs::write(&path, data)
            .map_err(|e| McinitError::io(format!("writing {}", path.display()), e))
    }

    /// Ensure the jars directory exists
    pub fn ensure_jars_dir(&self) -> McinitResult<()> {
        let dir = self.jars_dir();
        fs::create_dir_all(&dir)
            .map_err(|e| McinitError::io(format!("creating {}", dir.display()), e))
    }

    /// Remove the entire cache root
    pub fn clear(&self) -> McinitResult<()> {
        match fs::remove_dir_all(&self.root) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(McinitError::io(format!("removing {}", self.root.display()), e)),
        }
    }

    /// Total size of all cached files in bytes
    pub fn size(&self) -> McinitResult<u64> {
        fn walk(dir: &Path, total: &mut u64) -> std::io::Result<()> {
            for entry in fs::read_dir(dir)? {
                let entry = entry?;
                let meta = entry.metadata()?;
                if meta.is_dir() {
                    walk(&entry.path(), total)?;
                } else {
                    *total += meta.len();
                }
            }
            Ok(())
        }

        if !self.root.exists() {
            return Ok(0);
        }
        let mut total = 0;
        walk(&self.root, &mut total)
            .map_err(|e| McinitError::io(format!("walking {}", self.root.display()), e))?;
        Ok(total)
    }

    /// Number of cached jars
    pub fn artifact_count(&self) -> McinitResult<usize> {
        let dir = self.jars_dir();
        if !dir.exists() {
            return Ok(0);
        }
        let entries = fs::read_dir(&dir)
            .map_err(|e| McinitError::io(format!("reading {}", dir.display()), e))?;
        let mut count = 0;
        for entry in entries {
            let entry = entry.map_err(|e| McinitError::io("reading cache entry", e))?;
            if entry.path().extension().is_some_and(|ext| ext == "jar") {
                count += 1;
            }
        }
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn record(key: &ArtifactKey) -> CacheRecord {
        CacheRecord {
            version: key.version.clone(),
            build: key.build.clone(),
            source_kind: key.source_kind.clone(),
            download_url: "https://example.invalid/server.jar".to_string(),
            checksum: "deadbeef".to_string(),
            algorithm: Algorithm::Sha256,
            cached_at: Utc::now(),
        }
    }

    #[test]
    fn jar_path_includes_build_when_present() {
        let cache = Cache::with_root("/cache");
        let key = ArtifactKey::new("paper", "1.21.4", "123");
        assert_eq!(
            cache.jar_path(&key),
            PathBuf::from("/cache/jars/paper-1.21.4-123.jar")
        );
        assert_eq!(
            cache.meta_path(&key),
            PathBuf::from("/cache/jars/paper-1.21.4-123.jar.meta.json")
        );
    }

    #[test]
    fn jar_path_omits_empty_build() {
        let cache = Cache::with_root("/cache");
        let key = ArtifactKey::new("vanilla", "1.21.4", "");
        assert_eq!(
            cache.jar_path(&key),
            PathBuf::from("/cache/jars/vanilla-1.21.4.jar")
        );
    }

    #[test]
    fn has_requires_both_files() {
        let temp = TempDir::new().unwrap();
        let cache = Cache::with_root(temp.path());
        let key = ArtifactKey::new("paper", "1.21.4", "123");

        assert!(!cache.has(&key));

        cache.ensure_jars_dir().unwrap();
        fs::write(cache.jar_path(&key), b"jar").unwrap();
        assert!(!cache.has(&key));

        cache.write_metadata(&key, &record(&key)).unwrap();
        assert!(cache.has(&key));
    }

    #[test]
    fn metadata_roundtrip() {
        let temp = TempDir::new().unwrap();
        let cache = Cache::with_root(temp.path());
        let key = ArtifactKey::new("paper", "1.21.4", "123");

        cache.write_metadata(&key, &record(&key)).unwrap();
        let loaded = cache.read_metadata(&key).unwrap();
        assert_eq!(loaded.source_kind, "paper");
        assert_eq!(loaded.checksum, "deadbeef");
        assert_eq!(loaded.algorithm, Algorithm::Sha256);

        // on-disk shape matches the original tool's records
        let raw = fs::read_to_string(cache.meta_path(&key)).unwrap();
        assert!(raw.contains("\"serverType\": \"paper\""));
        assert!(raw.contains("\"downloadUrl\""));
    }

    #[test]
    fn read_metadata_missing() {
        let temp = TempDir::new().unwrap();
        let cache = Cache::with_root(temp.path());
        let key = ArtifactKey::new("paper", "1.21.4", "1");
        assert!(matches!(
            cache.read_metadata(&key),
            Err(McinitError::CacheMetadataNotFound(_))
        ));
    }

    #[test]
    fn clear_and_size() {
        let temp = TempDir::new().unwrap();
        let root = temp.path().join("cache");
        let cache = Cache::with_root(&root);
        let key = ArtifactKey::new("paper", "1.21.4", "123");

        assert_eq!(cache.size().unwrap(), 0);

        cache.ensure_jars_dir().unwrap();
        fs::write(cache.jar_path(&key), b"12345").unwrap();
        assert_eq!(cache.size().unwrap(), 5);
        assert_eq!(cache.artifact_count().unwrap(), 1);

        cache.clear().unwrap();
        assert!(!root.exists());
        // clearing twice is fine
        cache.clear().unwrap();
    }
}
