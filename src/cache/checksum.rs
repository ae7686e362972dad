//! Artifact digest computation and verification
//!
//! Digests are computed while the byte stream is written to its
//! destination. Artifacts run to tens of megabytes, so nothing here
//! buffers a whole file.

use serde::{Deserialize, Serialize};
use sha1::Sha1;
use sha2::{Digest, Sha256};
use std::fs::File;
use std::io::{self, Read, Write};
use std::path::Path;

use crate::error::{McinitError, McinitResult};

/// Checksum algorithm published by an upstream source
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Algorithm {
    Sha1,
    Sha256,
    /// Upstream publishes no digest (e.g. Purpur)
    #[default]
    None,
}

impl std::fmt::Display for Algorithm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Sha1 => "sha1",
            Self::Sha256 => "sha256",
            Self::None => "none",
        };
        write!(f, "{}", name)
    }
}

/// Incremental digest over one of the supported algorithms
pub enum Hasher {
    Sha1(Sha1),
    Sha256(Sha256),
}

impl Hasher {
    /// Create a hasher; `Algorithm::None` is not hashable
    pub fn new(algorithm: Algorithm) -> McinitResult<Self> {
        match algorithm {
            Algorithm::Sha1 => Ok(Self::Sha1(Sha1::new())),
            Algorithm::Sha256 => Ok(Self::Sha256(Sha256::new())),
            Algorithm::None => Err(McinitError::UnsupportedAlgorithm("none".to_string())),
        }
    }

    pub fn update(&mut self, data: &[u8]) {
        match self {
            Self::Sha1(h) => h.update(data),
            Self::Sha256(h) => h.update(data),
        }
    }

    /// Consume the hasher and return the lowercase hex digest
    pub fn finalize_hex(self) -> String {
        match self {
            Self::Sha1(h) => hex::encode(h.finalize()),
            Self::Sha256(h) => hex::encode(h.finalize()),
        }
    }
}

/// Writer adapter that feeds every written byte into a digest
///
/// Wraps the artifact's destination so download streaming and digest
/// computation happen in a single pass.
pub struct HashingWriter<W: Write> {
    inner: W,
    hasher: Option<Hasher>,
}

impl<W: Write> HashingWriter<W> {
    pub fn new(inner: W, hasher: Option<Hasher>) -> Self {
        Self { inner, hasher }
    }

    /// Finish writing and return the digest, if one was computed
    pub fn finish(self) -> (W, Option<String>) {
        (self.inner, self.hasher.map(Hasher::finalize_hex))
    }
}

impl<W: Write> Write for HashingWriter<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let written = self.inner.write(buf)?;
        if let Some(hasher) = &mut self.hasher {
            hasher.update(&buf[..written]);
        }
        Ok(written)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}

/// Re-verify an on-disk artifact against an expected digest, streaming
pub fn verify_file(path: &Path, expected: &str, algorithm: Algorithm) -> McinitResult<bool> {
    let mut hasher = Hasher::new(algorithm)?;
    let mut file = File::open(path)
        .map_err(|e| McinitError::io(format!("opening {}", path.display()), e))?;

    let mut buf = [0u8; 64 * 1024];
    loop {
        let n = file
            .read(&mut buf)
            .map_err(|e| McinitError::io(format!("reading {}", path.display()), e))?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
    }

    Ok(hasher.finalize_hex().eq_ignore_ascii_case(expected))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write as _;
    use tempfile::NamedTempFile;

    // Digests of b"hello world"
    const HELLO_SHA1: &str = "2aae6c35c94fcfb415dbe95f408b9ce91ee846ed";
    const HELLO_SHA256: &str = "b94d27b9934d3e08a52e52d7da7dabfac484efe37a5380ee9088f7ace2efcde9";

    #[test]
    fn sha1_known_digest() {
        let mut h = Hasher::new(Algorithm::Sha1).unwrap();
        h.update(b"hello world");
        assert_eq!(h.finalize_hex(), HELLO_SHA1);
    }

    #[test]
    fn sha256_known_digest() {
        let mut h = Hasher::new(Algorithm::Sha256).unwrap();
        h.update(b"hello world");
        assert_eq!(h.finalize_hex(), HELLO_SHA256);
    }

    #[test]
    fn none_is_unsupported() {
        assert!(matches!(
            Hasher::new(Algorithm::None),
            Err(McinitError::UnsupportedAlgorithm(_))
        ));
    }

    #[test]
    fn hashing_writer_single_pass() {
        let mut writer = HashingWriter::new(Vec::new(), Some(Hasher::new(Algorithm::Sha256).unwrap()));
        writer.write_all(b"hello ").unwrap();
        writer.write_all(b"world").unwrap();
        let (bytes, digest) = writer.finish();
        assert_eq!(bytes, b"hello world");
        assert_eq!(digest.unwrap(), HELLO_SHA256);
    }

    #[test]
    fn verify_file_matches() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"hello world").unwrap();
        assert!(verify_file(file.path(), HELLO_SHA256, Algorithm::Sha256).unwrap());
        assert!(!verify_file(file.path(), HELLO_SHA1, Algorithm::Sha256).unwrap());
        assert!(verify_file(file.path(), &HELLO_SHA1.to_uppercase(), Algorithm::Sha1).unwrap());
    }

    #[test]
    fn algorithm_serde_lowercase() {
        assert_eq!(serde_json::to_string(&Algorithm::Sha256).unwrap(), "\"sha256\"");
        let a: Algorithm = serde_json::from_str("\"sha1\"").unwrap();
        assert_eq!(a, Algorithm::Sha1);
    }
}
