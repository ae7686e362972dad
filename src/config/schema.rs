//! mcinit.json schema

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::{McinitError, McinitResult};
use crate::flags::FlagsPreset;

/// The mcinit.json configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Config {
    /// Config schema version
    pub version: String,

    pub server: ServerSection,
    pub java: JavaSection,
    pub jvm: JvmSection,
    pub server_config: ServerProps,
    pub eula: EulaSection,
    pub paths: PathsSection,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Server identity and artifact provenance
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ServerSection {
    #[serde(rename = "type")]
    pub server_type: String,

    pub minecraft_version: String,

    /// Build identifier, or "latest"; empty for sources without builds
    #[serde(skip_serializing_if = "String::is_empty")]
    pub build: String,

    /// Jar path relative to the server directory
    pub jar_path: String,

    pub name: String,

    #[serde(skip_serializing_if = "String::is_empty")]
    pub download_url: String,

    #[serde(skip_serializing_if = "String::is_empty")]
    pub sha256: String,

    #[serde(skip_serializing_if = "String::is_empty")]
    pub sha1: String,
}

/// Java installation selection
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct JavaSection {
    /// Requested version: "auto", a major number, or ignored when path is set
    pub version: String,

    /// Executable path, or "auto" to detect
    pub path: String,

    #[serde(skip_serializing_if = "String::is_empty")]
    pub detected_version: String,
}

/// JVM heap and flag configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct JvmSection {
    pub xms: String,
    pub xmx: String,
    pub flags: FlagsPreset,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub custom_flags: Vec<String>,
}

/// server.properties essentials
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ServerProps {
    pub port: u16,
    pub nogui: bool,
    pub max_players: u32,
    pub online_mode: bool,
    pub difficulty: String,
}

/// EULA acceptance record
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EulaSection {
    pub accepted: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub accepted_at: Option<DateTime<Utc>>,
}

/// Directory layout
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PathsSection {
    pub server_dir: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub cache_dir: String,
}

impl Default for Config {
    fn default() -> Self {
        let now = Utc::now();
        Self {
            version: "1.0.0".to_string(),
            server: ServerSection::default(),
            java: JavaSection::default(),
            jvm: JvmSection::default(),
            server_config: ServerProps::default(),
            eula: EulaSection::default(),
            paths: PathsSection::default(),
            created_at: now,
            updated_at: now,
        }
    }
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            server_type: "paper".to_string(),
            minecraft_version: String::new(),
            build: "latest".to_string(),
            jar_path: "server.jar".to_string(),
            name: "dev-server".to_string(),
            download_url: String::new(),
            sha256: String::new(),
            sha1: String::new(),
        }
    }
}

impl Default for JavaSection {
    fn default() -> Self {
        Self {
            version: "auto".to_string(),
            path: "auto".to_string(),
            detected_version: String::new(),
        }
    }
}

impl Default for JvmSection {
    fn default() -> Self {
        Self {
            xms: "2G".to_string(),
            xmx: "4G".to_string(),
            flags: FlagsPreset::Aikar,
            custom_flags: Vec::new(),
        }
    }
}

impl Default for ServerProps {
    fn default() -> Self {
        Self {
            port: 25565,
            nogui: true,
            max_players: 20,
            online_mode: false,
            difficulty: "easy".to_string(),
        }
    }
}

impl Default for EulaSection {
    fn default() -> Self {
        Self {
            accepted: false,
            accepted_at: None,
        }
    }
}

impl Default for PathsSection {
    fn default() -> Self {
        Self {
            server_dir: ".".to_string(),
            cache_dir: String::new(),
        }
    }
}

impl Config {
    /// Validate required fields and ranges
    pub fn validate(&self, path: &std::path::Path) -> McinitResult<()> {
        let invalid = |reason: &str| McinitError::ConfigInvalid {
            path: PathBuf::from(path),
            reason: reason.to_string(),
        };

        if self.server.server_type.is_empty() {
            return Err(invalid("server.type is required"));
        }
        if self.server.minecraft_version.is_empty() {
            return Err(invalid("server.minecraftVersion is required"));
        }
        if self.server.jar_path.is_empty() {
            return Err(invalid("server.jarPath is required"));
        }
        if self.jvm.xmx.is_empty() {
            return Err(invalid("jvm.xmx is required"));
        }
        if self.server_config.port == 0 {
            return Err(invalid("serverConfig.port must be between 1 and 65535"));
        }

        Ok(())
    }
}
