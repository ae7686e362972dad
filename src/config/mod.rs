//! Configuration management
//!
//! Each server directory carries an `mcinit.json` describing the server
//! type, artifact provenance, Java selection, and JVM settings.

pub mod schema;

pub use schema::Config;

use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::debug;

use crate::error::{McinitError, McinitResult};

/// Config file name inside a server directory
pub const CONFIG_FILE: &str = "mcinit.json";

/// Path of the config file for a server directory
pub fn config_path(server_dir: &Path) -> PathBuf {
    server_dir.join(CONFIG_FILE)
}

/// Load a configuration from a file
pub async fn load(path: &Path) -> McinitResult<Config> {
    let data = match fs::read_to_string(path).await {
        Ok(data) => data,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(McinitError::ConfigNotFound(path.to_path_buf()));
        }
        Err(e) => return Err(McinitError::io(format!("reading {}", path.display()), e)),
    };

    let cfg: Config = serde_json::from_str(&data).map_err(|e| McinitError::ConfigInvalid {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;

    cfg.validate(path)?;
    debug!("Loaded config from {}", path.display());
    Ok(cfg)
}

/// Save a configuration to a file, updating its timestamp
pub async fn save(cfg: &mut Config, path: &Path) -> McinitResult<()> {
    cfg.updated_at = chrono::Utc::now();

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .await
            .map_err(|e| McinitError::io(format!("creating {}", parent.display()), e))?;
    }

    let data = serde_json::to_string_pretty(cfg)?;
    fs::write(path, data)
        .await
        .map_err(|e| McinitError::io(format!("writing {}", path.display()), e))?;

    debug!("Saved config to {}", path.display());
    Ok(())
}

/// Check if a configuration file exists
pub fn exists(path: &Path) -> bool {
    path.exists()
}
