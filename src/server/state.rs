//! Durable server process state
//!
//! Two files under `<serverDir>/.mcinit/`: a structured `state.json`
//! and a plain-text `pid` marker. The tool keeps no process handle
//! between invocations, so these files are the sole source of truth
//! for "is a server running". The PID marker is separate so liveness
//! checks never parse JSON.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::fs;

use crate::error::{McinitError, McinitResult};

/// Directory holding runtime state inside a server directory
pub const STATE_DIR: &str = ".mcinit";

/// Server process status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProcessStatus {
    Running,
    Stopped,
    Crashed,
}

/// Runtime state record for a server process
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessState {
    pub pid: u32,
    pub start_time: DateTime<Utc>,
    pub status: ProcessStatus,
}

impl ProcessState {
    pub fn running(pid: u32) -> Self {
        Self {
            pid,
            start_time: Utc::now(),
            status: ProcessStatus::Running,
        }
    }

    /// Time since the process started; zero when unknown
    pub fn uptime(&self) -> chrono::Duration {
        let now = Utc::now();
        if self.start_time > now {
            return chrono::Duration::zero();
        }
        now - self.start_time
    }

    /// Human-readable uptime, e.g. "1h 4m 12s"
    pub fn format_uptime(&self) -> String {
        let total = self.uptime().num_seconds().max(0);
        let hours = total / 3600;
        let minutes = (total % 3600) / 60;
        let seconds = total % 60;

        if hours > 0 {
            format!("{}h {}m {}s", hours, minutes, seconds)
        } else if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}s", seconds)
        }
    }
}

/// Manages the state record and PID marker for one server directory
#[derive(Debug, Clone)]
pub struct StateFile {
    state_path: PathBuf,
    pid_path: PathBuf,
}

impl StateFile {
    pub fn new(server_dir: &Path) -> Self {
        let dir = server_dir.join(STATE_DIR);
        Self {
            state_path: dir.join("state.json"),
            pid_path: dir.join("pid"),
        }
    }

    /// Write both the state record and the PID marker
    pub async fn save(&self, state: &ProcessState) -> McinitResult<()> {
        if let Some(parent) = self.state_path.parent() {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| McinitError::io(format!("creating {}", parent.display()), e))?;
        }

        let data = serde_json::to_string_pretty(state)?;
        fs::write(&self.state_path, data)
            .await
            .map_err(|e| McinitError::io(format!("writing {}", self.state_path.display()), e))?;

        fs::write(&self.pid_path, format!("{}\n", state.pid))
            .await
            .map_err(|e| McinitError::io(format!("writing {}", self.pid_path.display()), e))?;

        Ok(())
    }

    /// Load the structured state record
    pub async fn load(&self) -> McinitResult<ProcessState> {
        let data = match fs::read_to_string(&self.state_path).await {
            Ok(data) => data,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(McinitError::StateNotFound);
            }
            Err(e) => {
                return Err(McinitError::io(
                    format!("reading {}", self.state_path.display()),
                    e,
                ));
            }
        };
        Ok(serde_json::from_str(&data)?)
    }

    /// Read the PID marker without touching the state record
    pub async fn read_pid(&self) -> McinitResult<u32> {
        let data = match fs::read_to_string(&self.pid_path).await {
            Ok(data) => data,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(McinitError::StateNotFound);
            }
            Err(e) => {
                return Err(McinitError::io(
                    format!("reading {}", self.pid_path.display()),
                    e,
                ));
            }
        };

        data.trim()
            .parse()
            .map_err(|_| McinitError::Internal(format!("malformed PID file: {:?}", data.trim())))
    }

    /// Remove both files, tolerating either being absent
    pub async fn clear(&self) -> McinitResult<()> {
        for path in [&self.state_path, &self.pid_path] {
            match fs::remove_file(path).await {
                Ok(()) => {}
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => {
                    return Err(McinitError::io(format!("removing {}", path.display()), e));
                }
            }
        }
        Ok(())
    }

    /// True if either file exists
    pub fn exists(&self) -> bool {
        self.state_path.exists() || self.pid_path.exists()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn save_load_roundtrip() {
        let temp = TempDir::new().unwrap();
        let state_file = StateFile::new(temp.path());

        let state = ProcessState::running(4242);
        state_file.save(&state).await.unwrap();

        let loaded = state_file.load().await.unwrap();
        assert_eq!(loaded.pid, 4242);
        assert_eq!(loaded.status, ProcessStatus::Running);
    }

    #[tokio::test]
    async fn pid_marker_is_plain_text() {
        let temp = TempDir::new().unwrap();
        let state_file = StateFile::new(temp.path());

        state_file.save(&ProcessState::running(777)).await.unwrap();

        assert_eq!(state_file.read_pid().await.unwrap(), 777);
        let raw = std::fs::read_to_string(temp.path().join(STATE_DIR).join("pid")).unwrap();
        assert_eq!(raw, "777\n");
    }

    #[tokio::test]
    async fn load_missing_is_state_not_found() {
        let temp = TempDir::new().unwrap();
        let state_file = StateFile::new(temp.path());

        assert!(matches!(
            state_file.load().await,
            Err(McinitError::StateNotFound)
        ));
        assert!(matches!(
            state_file.read_pid().await,
            Err(McinitError::StateNotFound)
        ));
        assert!(!state_file.exists());
    }

    #[tokio::test]
    async fn clear_tolerates_partial_absence() {
        let temp = TempDir::new().unwrap();
        let state_file = StateFile::new(temp.path());

        state_file.save(&ProcessState::running(1)).await.unwrap();
        std::fs::remove_file(temp.path().join(STATE_DIR).join("pid")).unwrap();

        state_file.clear().await.unwrap();
        assert!(!state_file.exists());
        // clearing again is a no-op
        state_file.clear().await.unwrap();
    }

    #[test]
    fn uptime_formatting() {
        let mut state = ProcessState::running(1);
        state.start_time = Utc::now() - chrono::Duration::seconds(3725);
        assert_eq!(state.format_uptime(), "1h 2m 5s");

        state.start_time = Utc::now() - chrono::Duration::seconds(42);
        assert_eq!(state.format_uptime(), "42s");

        // a start time in the future clamps to zero
        state.start_time = Utc::now() + chrono::Duration::seconds(60);
        assert_eq!(state.format_uptime(), "0s");
    }

    #[test]
    fn state_serializes_camel_case() {
        let state = ProcessState::running(9);
        let json = serde_json::to_string(&state).unwrap();
        assert!(json.contains("\"startTime\""));
        assert!(json.contains("\"status\":\"running\""));
    }
}
