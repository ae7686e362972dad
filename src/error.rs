//! Error types for mcinit
//!
//! All modules use `McinitResult<T>` as their return type.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for mcinit operations
pub type McinitResult<T> = Result<T, McinitError>;

/// All errors that can occur in mcinit
#[derive(Error, Debug)]
pub enum McinitError {
    // Provider errors
    #[error("Unknown server type: {0}")]
    ProviderNotFound(String),

    #[error("{0} has no download API - manual download required")]
    NotSupported(String),

    #[error("Upstream API request failed: {url}: {reason}")]
    UpstreamUnavailable { url: String, reason: String },

    #[error("Version not found upstream: {version}")]
    VersionNotFound { version: String },

    #[error("No builds available for version {version}")]
    NoBuildsAvailable { version: String },

    // Download / cache errors
    #[error("Download failed with HTTP status {status}")]
    DownloadFailed { status: u16 },

    #[error("Checksum mismatch: expected {expected}, got {actual}")]
    ChecksumMismatch { expected: String, actual: String },

    #[error("Unsupported checksum algorithm: {0}")]
    UnsupportedAlgorithm(String),

    #[error("Unsupported platform: no cache directory available on this OS")]
    PlatformUnsupported,

    #[error("Cached artifact metadata not found: {0}")]
    CacheMetadataNotFound(PathBuf),

    // Lifecycle errors
    #[error("Server is already running")]
    AlreadyRunning,

    #[error("Server is not running")]
    NotRunning,

    #[error("Server process exited with status {0}")]
    ServerExited(i32),

    #[error("Server state not found")]
    StateNotFound,

    #[error("Interrupted")]
    Interrupted,

    // Configuration errors
    #[error("Configuration file not found: {0}")]
    ConfigNotFound(PathBuf),

    #[error("Invalid configuration at {path}: {reason}")]
    ConfigInvalid { path: PathBuf, reason: String },

    #[error("Server already initialized (mcinit.json exists)")]
    AlreadyInitialized,

    // Java errors
    #[error("No Java installation found")]
    JavaNotFound,

    #[error("Java {0} not found on this system")]
    JavaVersionNotFound(u64),

    #[error("Not a valid Java executable: {0}")]
    JavaInvalid(PathBuf),

    #[error("Java {required} or higher required, found Java {found}")]
    JavaTooOld { required: u64, found: u64 },

    // Flag errors
    #[error("Unknown JVM flags preset: {0}")]
    UnknownPreset(String),

    #[error("Invalid JVM flag: {0} (flags must start with - or --)")]
    InvalidFlag(String),

    // Path errors
    #[error("Server jar not found: {0}")]
    JarNotFound(PathBuf),

    #[error("Log file not found: {0}")]
    LogNotFound(PathBuf),

    #[error("Not a git repository")]
    NotAGitRepo,

    // IO errors
    #[error("IO error: {context}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    // Serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // General errors
    #[error("Internal error: {0}")]
    Internal(String),
}

impl McinitError {
    /// Create an IO error with context
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    /// Get actionable hint for the error
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            Self::NotRunning => Some("Run: mcinit start"),
            Self::AlreadyRunning => Some("Run: mcinit status"),
            Self::ConfigNotFound(_) => Some("Run: mcinit init --type paper --mc <version>"),
            Self::StateNotFound => Some("Run: mcinit start"),
            Self::JavaNotFound => Some("Install a JDK or set java.path in mcinit.json"),
            Self::AlreadyInitialized => Some("Remove mcinit.json or choose another --path"),
            _ => None,
        }
    }
}
