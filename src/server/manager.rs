//! Server lifecycle management
//!
//! Thin composition over configuration, Java resolution, flag
//! building, and the process supervisor.

use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::config::{self, Config};
use crate::error::{McinitError, McinitResult};
use crate::flags;
use crate::java::{Detector, Installation};
use crate::server::process::Process;
use crate::server::state::ProcessState;

pub struct Manager {
    server_dir: PathBuf,
    process: Process,
    config: Option<Config>,
}

impl Manager {
    pub fn new(server_dir: impl AsRef<Path>) -> McinitResult<Self> {
        let server_dir = std::path::absolute(server_dir.as_ref())
            .map_err(|e| McinitError::io("resolving server directory", e))?;
        let process = Process::new(&server_dir);
        Ok(Self {
            server_dir,
            process,
            config: None,
        })
    }

    /// Load mcinit.json from the server directory
    pub async fn load_config(&mut self) -> McinitResult<()> {
        let path = config::config_path(&self.server_dir);
        self.config = Some(config::load(&path).await?);
        Ok(())
    }

    fn config(&self) -> McinitResult<&Config> {
        self.config
            .as_ref()
            .ok_or_else(|| McinitError::ConfigNotFound(config::config_path(&self.server_dir)))
    }

    /// Start the server; `extra_args` are appended to the preset flags
    pub async fn start(&mut self, background: bool, extra_args: &str) -> McinitResult<()> {
        if self.config.is_none() {
            self.load_config().await?;
        }

        if self.process.is_running().await {
            return Err(McinitError::AlreadyRunning);
        }

        let java = self.resolve_java().await?;
        let jvm_args = self.build_jvm_args(extra_args)?;

        let cfg = self.config()?;
        let jar = self.server_dir.join(&cfg.server.jar_path);
        if !jar.exists() {
            return Err(McinitError::JarNotFound(jar));
        }

        info!("Starting server in {}", self.server_dir.display());
        self.process.start(&java, &jar, &jvm_args, background).await
    }

    pub async fn stop(&self, force: bool) -> McinitResult<()> {
        self.process.stop(force).await
    }

    /// Stop (gracefully, if running), debounce, then start again.
    /// The wait lets the OS release the bound port before rebinding.
    pub async fn restart(&mut self, background: bool, wait_seconds: u64) -> McinitResult<()> {
        if self.process.is_running().await {
            self.stop(false).await?;
        }

        if wait_seconds > 0 {
            debug!("Waiting {}s before restart", wait_seconds);
            tokio::time::sleep(std::time::Duration::from_secs(wait_seconds)).await;
        }

        self.start(background, "").await
    }

    pub async fn is_running(&self) -> bool {
        self.process.is_running().await
    }

    /// Current state record with derived uptime
    pub async fn status(&self) -> McinitResult<ProcessState> {
        self.process.state().await
    }

    pub fn server_dir(&self) -> &Path {
        &self.server_dir
    }

    /// Resolve the Java executable: explicit path, then explicit major
    /// version, then best available. Each step only falls through when
    /// it was not explicitly requested.
    async fn resolve_java(&self) -> McinitResult<PathBuf> {
        let cfg = self.config()?;
        let detector = Detector::new();

        if !cfg.java.path.is_empty() && cfg.java.path != "auto" {
            return Ok(PathBuf::from(&cfg.java.path));
        }

        if !cfg.java.version.is_empty() && cfg.java.version != "auto" {
            let major: u64 = cfg.java.version.parse().map_err(|_| {
                McinitError::ConfigInvalid {
                    path: config::config_path(&self.server_dir),
                    reason: format!("java.version is not a major version: {}", cfg.java.version),
                }
            })?;
            let inst = detector.find_by_major(major).await?;
            return Ok(inst.path);
        }

        let inst: Installation = detector.find_best().await?;
        debug!("Using Java {} at {}", inst.raw_version, inst.path.display());
        Ok(inst.path)
    }

    fn build_jvm_args(&self, extra_args: &str) -> McinitResult<Vec<String>> {
        let cfg = self.config()?;
        let mut args = flags::build_flags(
            cfg.jvm.flags,
            &cfg.jvm.xms,
            &cfg.jvm.xmx,
            &cfg.jvm.custom_flags,
        )?;

        if !extra_args.is_empty() {
            let extra = flags::parse_extra_flags(extra_args);
            flags::validate_flags(&extra)?;
            args.extend(extra);
        }

        Ok(args)
    }
}
