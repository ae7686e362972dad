//! Jar downloader
//!
//! Streams an artifact into the cache: a verified cache hit returns
//! without touching the network, and a fresh download goes to a temp
//! file that is only renamed into place after the digest checks out.
//! A stale or corrupt cache entry counts as a miss and is re-downloaded
//! exactly once per call.
//!
//! All calls are blocking; async callers run them via
//! `tokio::task::spawn_blocking`.

use indicatif::{ProgressBar, ProgressStyle};
use std::fs::{self, File};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info, warn};
use ureq::Agent;

use crate::cache::checksum::{verify_file, Algorithm, Hasher, HashingWriter};
use crate::cache::{ArtifactKey, Cache, CacheRecord};
use crate::error::{McinitError, McinitResult};

/// Artifacts run to tens of megabytes; allow minutes, not seconds.
const DOWNLOAD_TIMEOUT: Duration = Duration::from_secs(300);

/// Downloads jars into the cache
pub struct Downloader {
    cache: Cache,
    agent: Agent,
}

impl Downloader {
    pub fn new(cache: Cache) -> Self {
        let config = Agent::config_builder()
            .timeout_global(Some(DOWNLOAD_TIMEOUT))
            .build();
        Self {
            cache,
            agent: config.into(),
        }
    }

    /// Fetch the artifact for `key`, returning its cached path.
    ///
    /// With a non-empty `expected` digest a cache hit is re-verified
    /// before being trusted; with an empty one the cached file is
    /// returned as-is (no integrity guarantee available upstream).
    pub fn fetch(
        &self,
        url: &str,
        key: &ArtifactKey,
        expected: &str,
        algorithm: Algorithm,
    ) -> McinitResult<PathBuf> {
        let jar_path = self.cache.jar_path(key);

        if self.cache.has(key) {
            if expected.is_empty() {
                debug!("Cache hit (unverifiable): {}", jar_path.display());
                return Ok(jar_path);
            }
            if verify_file(&jar_path, expected, algorithm)? {
                debug!("Cache hit: {}", jar_path.display());
                return Ok(jar_path);
            }
            warn!("Cached jar failed verification, re-downloading");
        }

        self.cache.ensure_jars_dir()?;

        let tmp_path = jar_path.with_extension("jar.tmp");
        let actual = match self.download_to(url, &tmp_path, expected, algorithm) {
            Ok(actual) => actual,
            Err(e) => {
                let _ = fs::remove_file(&tmp_path);
                return Err(e);
            }
        };

        if let Some(actual) = &actual {
            if !actual.eq_ignore_ascii_case(expected) {
                let _ = fs::remove_file(&tmp_path);
                return Err(McinitError::ChecksumMismatch {
                    expected: expected.to_string(),
                    actual: actual.clone(),
                });
            }
            debug!("Checksum verified ({})", algorithm);
        }

        fs::rename(&tmp_path, &jar_path).map_err(|e| {
            let _ = fs::remove_file(&tmp_path);
            McinitError::io(format!("promoting {}", jar_path.display()), e)
        })?;

        let record = CacheRecord {
            version: key.version.clone(),
            build: key.build.clone(),
            source_kind: key.source_kind.clone(),
            download_url: url.to_string(),
            checksum: expected.to_string(),
            algorithm,
            cached_at: chrono::Utc::now(),
        };
        self.cache.write_metadata(key, &record)?;

        Ok(jar_path)
    }

    /// Stream `url` into `dest`, hashing inline when a digest is expected.
    /// Returns the computed digest, or `None` when nothing was expected.
    fn download_to(
        &self,
        url: &str,
        dest: &Path,
        expected: &str,
        algorithm: Algorithm,
    ) -> McinitResult<Option<String>> {
        info!("Downloading {}", url);

        let mut response = self.agent.get(url).call().map_err(|e| match e {
            ureq::Error::StatusCode(status) => McinitError::DownloadFailed { status },
            other => McinitError::UpstreamUnavailable {
                url: url.to_string(),
                reason: other.to_string(),
            },
        })?;

        let total = response
            .headers()
            .get("content-length")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse::<u64>().ok());
        let bar = progress_bar(total);

        let hasher = if expected.is_empty() {
            None
        } else {
            Some(Hasher::new(algorithm)?)
        };

        let file = File::create(dest)
            .map_err(|e| McinitError::io(format!("creating {}", dest.display()), e))?;
        let mut writer = HashingWriter::new(file, hasher);

        let mut reader = response.body_mut().as_reader();
        let mut buf = [0u8; 64 * 1024];
        let mut written: u64 = 0;
        loop {
            let n = reader.read(&mut buf).map_err(|e| McinitError::UpstreamUnavailable {
                url: url.to_string(),
                reason: e.to_string(),
            })?;
            if n == 0 {
                break;
            }
            writer
                .write_all(&buf[..n])
                .map_err(|e| McinitError::io(format!("writing {}", dest.display()), e))?;
            written += n as u64;
            bar.set_position(written);
        }

        let (mut file, digest) = writer.finish();
        file.flush()
            .map_err(|e| McinitError::io(format!("flushing {}", dest.display()), e))?;
        bar.finish_and_clear();

        info!("Downloaded {} bytes", written);
        Ok(digest)
    }
}

fn progress_bar(total: Option<u64>) -> ProgressBar {
    match total {
        Some(len) => {
            let bar = ProgressBar::new(len);
            bar.set_style(
                ProgressStyle::default_bar()
                    .template("  {bar:30.cyan/dim} {bytes}/{total_bytes} {bytes_per_sec} {msg}")
                    .unwrap()
                    .progress_chars("━╸─"),
            );
            bar
        }
        None => ProgressBar::new_spinner(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sha2::{Digest as _, Sha256};
    use std::io::{Read as _, Write as _};
    use std::net::TcpListener;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use tempfile::TempDir;

    /// Minimal HTTP server answering every request with the same body,
    /// counting hits. Runs on a detached thread for the test's lifetime.
    fn serve(status: &'static str, body: Vec<u8>, hits: Arc<AtomicUsize>) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        std::thread::spawn(move || {
            for stream in listener.incoming() {
                let mut stream = match stream {
                    Ok(s) => s,
                    Err(_) => break,
                };
                hits.fetch_add(1, Ordering::SeqCst);
                let mut buf = [0u8; 2048];
                let _ = stream.read(&mut buf);
                let header = format!(
                    "HTTP/1.1 {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
                    status,
                    body.len()
                );
                let _ = stream.write_all(header.as_bytes());
                let _ = stream.write_all(&body);
            }
        });
        format!("http://{}/jar", addr)
    }

    fn sha256_hex(data: &[u8]) -> String {
        hex::encode(Sha256::digest(data))
    }

    fn key() -> ArtifactKey {
        ArtifactKey::new("paper", "1.21.4", "123")
    }

    #[test]
    fn fetch_downloads_verifies_and_caches() {
        let temp = TempDir::new().unwrap();
        let cache = Cache::with_root(temp.path());
        let hits = Arc::new(AtomicUsize::new(0));
        let body = b"pretend this is a server jar".to_vec();
        let digest = sha256_hex(&body);
        let url = serve("200 OK", body.clone(), hits.clone());

        let downloader = Downloader::new(cache.clone());
        let path = downloader
            .fetch(&url, &key(), &digest, Algorithm::Sha256)
            .unwrap();

        assert_eq!(path, cache.jar_path(&key()));
        assert_eq!(fs::read(&path).unwrap(), body);
        assert_eq!(hits.load(Ordering::SeqCst), 1);

        let meta = cache.read_metadata(&key()).unwrap();
        assert_eq!(meta.checksum, digest);
        assert_eq!(meta.algorithm, Algorithm::Sha256);

        // second fetch is served from cache: zero additional requests
        let again = downloader
            .fetch(&url, &key(), &digest, Algorithm::Sha256)
            .unwrap();
        assert_eq!(again, path);
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn fetch_rejects_corrupt_download() {
        let temp = TempDir::new().unwrap();
        let cache = Cache::with_root(temp.path());
        let hits = Arc::new(AtomicUsize::new(0));
        let url = serve("200 OK", b"tampered bytes".to_vec(), hits.clone());

        let downloader = Downloader::new(cache.clone());
        let err = downloader
            .fetch(&url, &key(), "deadbeef", Algorithm::Sha256)
            .unwrap_err();

        assert!(matches!(err, McinitError::ChecksumMismatch { .. }));
        // nothing promoted, no temp file left behind
        assert!(!cache.jar_path(&key()).exists());
        assert!(!cache.jar_path(&key()).with_extension("jar.tmp").exists());
        assert!(!cache.has(&key()));
    }

    #[test]
    fn fetch_surfaces_http_error() {
        let temp = TempDir::new().unwrap();
        let cache = Cache::with_root(temp.path());
        let hits = Arc::new(AtomicUsize::new(0));
        let url = serve("404 Not Found", Vec::new(), hits.clone());

        let downloader = Downloader::new(cache.clone());
        let err = downloader
            .fetch(&url, &key(), "", Algorithm::None)
            .unwrap_err();

        assert!(matches!(err, McinitError::DownloadFailed { status: 404 }));
        assert!(!cache.jar_path(&key()).exists());
    }

    #[test]
    fn unverifiable_cache_hit_skips_network() {
        let temp = TempDir::new().unwrap();
        let cache = Cache::with_root(temp.path());
        let k = ArtifactKey::new("purpur", "1.21.4", "2300");

        cache.ensure_jars_dir().unwrap();
        fs::write(cache.jar_path(&k), b"cached jar").unwrap();
        cache
            .write_metadata(
                &k,
                &CacheRecord {
                    version: k.version.clone(),
                    build: k.build.clone(),
                    source_kind: k.source_kind.clone(),
                    download_url: "https://example.invalid".to_string(),
                    checksum: String::new(),
                    algorithm: Algorithm::None,
                    cached_at: chrono::Utc::now(),
                },
            )
            .unwrap();

        let downloader = Downloader::new(cache.clone());
        // URL is unroutable; a network call would fail the test
        let path = downloader
            .fetch("http://127.0.0.1:1/jar", &k, "", Algorithm::None)
            .unwrap();
        assert_eq!(path, cache.jar_path(&k));
    }

    #[test]
    fn stale_cache_hit_redownloads_once() {
        let temp = TempDir::new().unwrap();
        let cache = Cache::with_root(temp.path());
        let hits = Arc::new(AtomicUsize::new(0));
        let body = b"fresh correct jar".to_vec();
        let digest = sha256_hex(&body);
        let url = serve("200 OK", body.clone(), hits.clone());

        // seed the cache with bytes that no longer match the digest
        cache.ensure_jars_dir().unwrap();
        fs::write(cache.jar_path(&key()), b"rotted bytes").unwrap();
        cache
            .write_metadata(
                &key(),
                &CacheRecord {
                    version: "1.21.4".to_string(),
                    build: "123".to_string(),
                    source_kind: "paper".to_string(),
                    download_url: url.clone(),
                    checksum: digest.clone(),
                    algorithm: Algorithm::Sha256,
                    cached_at: chrono::Utc::now(),
                },
            )
            .unwrap();

        let downloader = Downloader::new(cache.clone());
        let path = downloader
            .fetch(&url, &key(), &digest, Algorithm::Sha256)
            .unwrap();

        assert_eq!(hits.load(Ordering::SeqCst), 1);
        assert_eq!(fs::read(&path).unwrap(), body);
        assert!(verify_file(&path, &digest, Algorithm::Sha256).unwrap());
    }
}
