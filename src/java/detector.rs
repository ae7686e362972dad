//! Java installation detection
//!
//! Probes candidate executables with `java -version` and parses both
//! the legacy (`1.8.0_292`) and modern (`17.0.1`) version formats.
//! Candidates come from JAVA_HOME, PATH, and the platform's
//! conventional install roots, in that order.

use semver::Version;
use std::collections::HashSet;
use std::env;
use std::path::{Path, PathBuf};
use tokio::process::Command;
use tracing::debug;

use crate::error::{McinitError, McinitResult};

/// A probed Java installation
#[derive(Debug, Clone)]
pub struct Installation {
    pub path: PathBuf,
    /// Version string as printed by `java -version`
    pub raw_version: String,
    pub version: Version,
}

impl Installation {
    pub fn major(&self) -> u64 {
        self.version.major
    }
}

/// Finds Java installations on the system
pub struct Detector;

impl Detector {
    pub fn new() -> Self {
        Self
    }

    /// All detectable installations, deduplicated by path
    pub async fn detect(&self) -> Vec<Installation> {
        let mut installations = Vec::new();
        let mut seen = HashSet::new();

        for candidate in candidate_paths() {
            if !seen.insert(candidate.clone()) {
                continue;
            }
            match self.probe(&candidate).await {
                Ok(inst) => installations.push(inst),
                Err(_) => continue,
            }
        }

        installations
    }

    /// Probe a specific executable and extract its version
    pub async fn probe(&self, java: &Path) -> McinitResult<Installation> {
        let output = Command::new(java)
            .arg("-version")
            .output()
            .await
            .map_err(|_| McinitError::JavaInvalid(java.to_path_buf()))?;

        // `java -version` historically prints to stderr
        let stderr = String::from_utf8_lossy(&output.stderr);
        let stdout = String::from_utf8_lossy(&output.stdout);
        let text = if stderr.contains("version") { stderr } else { stdout };

        let (raw_version, version) =
            parse_java_version(&text).ok_or_else(|| McinitError::JavaInvalid(java.to_path_buf()))?;

        debug!("Probed Java {} at {}", raw_version, java.display());
        Ok(Installation {
            path: java.to_path_buf(),
            raw_version,
            version,
        })
    }

    /// Find an installation with the requested major version
    pub async fn find_by_major(&self, major: u64) -> McinitResult<Installation> {
        self.detect()
            .await
            .into_iter()
            .find(|inst| inst.major() == major)
            .ok_or(McinitError::JavaVersionNotFound(major))
    }

    /// Find the highest-versioned installation
    pub async fn find_best(&self) -> McinitResult<Installation> {
        self.detect()
            .await
            .into_iter()
            .max_by(|a, b| a.version.cmp(&b.version))
            .ok_or(McinitError::JavaNotFound)
    }
}

impl Default for Detector {
    fn default() -> Self {
        Self::new()
    }
}

/// Candidate executables: JAVA_HOME, PATH, conventional roots
fn candidate_paths() -> Vec<PathBuf> {
    let mut candidates = Vec::new();

    if let Ok(home) = env::var("JAVA_HOME") {
        candidates.push(Path::new(&home).join("bin").join(executable_name()));
    }

    if let Some(paths) = env::var_os("PATH") {
        for dir in env::split_paths(&paths) {
            let java = dir.join(executable_name());
            if java.is_file() {
                candidates.push(java);
            }
        }
    }

    for root in conventional_roots() {
        let Ok(entries) = std::fs::read_dir(&root) else {
            continue;
        };
        for entry in entries.flatten() {
            let base = entry.path();
            candidates.push(base.join("bin").join(executable_name()));
            // macOS JDK bundles nest the home directory
            candidates.push(base.join("Contents/Home/bin").join(executable_name()));
        }
    }

    candidates.retain(|p| p.is_file());
    candidates
}

fn executable_name() -> &'static str {
    if cfg!(windows) {
        "java.exe"
    } else {
        "java"
    }
}

fn conventional_roots() -> Vec<PathBuf> {
    let roots: &[&str] = if cfg!(windows) {
        &[
            "C:\\Program Files\\Java",
            "C:\\Program Files (x86)\\Java",
            "C:\\Program Files\\Eclipse Adoptium",
            "C:\\Program Files\\Microsoft\\jdk",
        ]
    } else if cfg!(target_os = "macos") {
        &[
            "/Library/Java/JavaVirtualMachines",
            "/System/Library/Java/JavaVirtualMachines",
        ]
    } else {
        &["/usr/lib/jvm", "/usr/java", "/opt/java", "/opt/jdk"]
    };
    roots.iter().map(PathBuf::from).collect()
}

/// Parse the quoted version out of `java -version` output.
///
/// Handles `java version "1.8.0_292"` and
/// `openjdk version "17.0.1" 2021-10-19 LTS`.
fn parse_java_version(output: &str) -> Option<(String, Version)> {
    let start = output.find("version \"")? + "version \"".len();
    let rest = &output[start..];
    let end = rest.find('"')?;
    let raw = &rest[..end];

    let version = parse_version_string(raw)?;
    Some((raw.to_string(), version))
}

fn parse_version_string(raw: &str) -> Option<Version> {
    let parts: Vec<&str> = raw.split('.').collect();

    // legacy 1.x.y_zz means Java x
    if parts.first() == Some(&"1") && parts.len() >= 2 {
        let major = parts[1].parse().ok()?;
        let minor = parts
            .get(2)
            .and_then(|p| p.split('_').next())
            .and_then(|p| p.parse().ok())
            .unwrap_or(0);
        return Some(Version::new(major, minor, 0));
    }

    let clean = |part: &str| -> Option<u64> {
        let trimmed: String = part
            .chars()
            .take_while(|c| c.is_ascii_digit())
            .collect();
        trimmed.parse().ok()
    };

    let major = clean(parts.first()?)?;
    let minor = parts.get(1).and_then(|p| clean(p)).unwrap_or(0);
    let patch = parts.get(2).and_then(|p| clean(p)).unwrap_or(0);
    Some(Version::new(major, minor, patch))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_legacy_java_8() {
        let output = "java version \"1.8.0_292\"\nJava(TM) SE Runtime Environment";
        let (raw, version) = parse_java_version(output).unwrap();
        assert_eq!(raw, "1.8.0_292");
        assert_eq!(version.major, 8);
    }

    #[test]
    fn parses_modern_openjdk() {
        let output = "openjdk version \"17.0.1\" 2021-10-19 LTS\nOpenJDK Runtime Environment";
        let (raw, version) = parse_java_version(output).unwrap();
        assert_eq!(raw, "17.0.1");
        assert_eq!(version, Version::new(17, 0, 1));
    }

    #[test]
    fn parses_version_with_build_suffix() {
        let version = parse_version_string("21.0.2+13").unwrap();
        assert_eq!(version, Version::new(21, 0, 2));

        let version = parse_version_string("17.0.1-ea").unwrap();
        assert_eq!(version, Version::new(17, 0, 1));
    }

    #[test]
    fn parses_bare_major() {
        let version = parse_version_string("21").unwrap();
        assert_eq!(version.major, 21);
    }

    #[test]
    fn rejects_garbage() {
        assert!(parse_java_version("no version here").is_none());
        assert!(parse_version_string("abc").is_none());
    }

    #[tokio::test]
    async fn probe_rejects_nonexistent_executable() {
        let detector = Detector::new();
        assert!(matches!(
            detector.probe(Path::new("/nonexistent/bin/java")).await,
            Err(McinitError::JavaInvalid(_))
        ));
    }
}
