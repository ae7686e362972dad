//! Server process supervision
//!
//! Spawns the JVM in its own process group, pipes its output, and
//! persists a state record the moment the OS hands back a PID. Stop
//! requests try SIGTERM against the group first and escalate to
//! SIGKILL after a bounded wait.
//!
//! In background mode the child is spawned with `kill_on_drop(false)`
//! and survives the CLI's exit; the in-process exit watcher is
//! best-effort, and any state file it did not get to clear is
//! reconciled by the liveness probe on the next invocation.

use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::process::Command;
use tokio::time::Instant;
use tracing::{debug, warn};

use crate::error::{McinitError, McinitResult};
use crate::server::state::{ProcessState, StateFile};

/// How long a graceful stop waits before escalating to a hard kill
const GRACEFUL_TIMEOUT: Duration = Duration::from_secs(30);

/// How long a hard kill waits for the process to disappear
const KILL_TIMEOUT: Duration = Duration::from_secs(10);

/// Liveness poll interval during stop
const POLL_INTERVAL: Duration = Duration::from_millis(500);

/// Supervises the server process for one server directory
pub struct Process {
    server_dir: PathBuf,
    state_file: StateFile,
    graceful_timeout: Duration,
}

impl Process {
    pub fn new(server_dir: impl Into<PathBuf>) -> Self {
        let server_dir = server_dir.into();
        let state_file = StateFile::new(&server_dir);
        Self {
            server_dir,
            state_file,
            graceful_timeout: GRACEFUL_TIMEOUT,
        }
    }

    #[cfg(test)]
    fn with_graceful_timeout(mut self, timeout: Duration) -> Self {
        self.graceful_timeout = timeout;
        self
    }

    /// Start the server as `java <jvm_args...> -jar <jar> nogui`.
    ///
    /// Foreground mode blocks until the child exits and surfaces a
    /// non-zero exit status. Background mode returns once the PID is
    /// durably recorded.
    pub async fn start(
        &self,
        java: &Path,
        jar: &Path,
        jvm_args: &[String],
        background: bool,
    ) -> McinitResult<()> {
        if self.is_running().await {
            return Err(McinitError::AlreadyRunning);
        }

        let mut cmd = Command::new(java);
        cmd.args(jvm_args)
            .arg("-jar")
            .arg(jar)
            .arg("nogui")
            .current_dir(&self.server_dir)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(false);

        // Own process group: signaling the server never signals the tool,
        // and the child outlives a background launcher.
        #[cfg(unix)]
        cmd.process_group(0);

        let mut child = cmd
            .spawn()
            .map_err(|e| McinitError::io(format!("spawning {}", java.display()), e))?;

        let pid = child
            .id()
            .ok_or_else(|| McinitError::Internal("child exited before PID was read".to_string()))?;
        debug!("Spawned server process, pid {}", pid);

        // State is written only after the OS confirms the handle exists.
        // If it cannot be recorded, the child must not be left orphaned
        // with no PID on disk to find it by.
        if let Err(e) = self.state_file.save(&ProcessState::running(pid)).await {
            let _ = child.kill().await;
            return Err(e);
        }

        if let Some(stdout) = child.stdout.take() {
            tokio::spawn(pipe_lines(stdout, tokio::io::stdout()));
        }
        if let Some(stderr) = child.stderr.take() {
            tokio::spawn(pipe_lines(stderr, tokio::io::stderr()));
        }

        if background {
            let state_file = self.state_file.clone();
            tokio::spawn(async move {
                let _ = child.wait().await;
                let _ = state_file.clear().await;
            });
            return Ok(());
        }

        let status = child
            .wait()
            .await
            .map_err(|e| McinitError::io("waiting for server process", e))?;
        self.state_file.clear().await?;

        if !status.success() {
            return Err(McinitError::ServerExited(status.code().unwrap_or(-1)));
        }
        Ok(())
    }

    /// Stop the server.
    ///
    /// Graceful mode signals the process group with SIGTERM and polls
    /// liveness until the process is gone or the timeout elapses, then
    /// escalates to SIGKILL. Force mode skips straight to SIGKILL.
    /// The graceful wait is interruptible with Ctrl-C.
    pub async fn stop(&self, force: bool) -> McinitResult<()> {
        let pid = self
            .state_file
            .read_pid()
            .await
            .map_err(|_| McinitError::NotRunning)?;

        if !platform::pid_alive(pid) {
            // stale record from a crash or an exited background server
            self.state_file.clear().await?;
            return Err(McinitError::NotRunning);
        }

        if force {
            return self.kill(pid).await;
        }

        platform::terminate(pid, false)?;
        debug!("Sent terminate signal to pid {}", pid);

        let deadline = Instant::now() + self.graceful_timeout;
        loop {
            tokio::select! {
                _ = tokio::time::sleep(POLL_INTERVAL) => {
                    if !platform::pid_alive(pid) {
                        self.state_file.clear().await?;
                        return Ok(());
                    }
                    if Instant::now() >= deadline {
                        warn!("Graceful shutdown timed out, escalating to kill");
                        return self.kill(pid).await;
                    }
                }
                _ = tokio::signal::ctrl_c() => {
                    return Err(McinitError::Interrupted);
                }
            }
        }
    }

    async fn kill(&self, pid: u32) -> McinitResult<()> {
        platform::terminate(pid, true)?;

        let deadline = Instant::now() + KILL_TIMEOUT;
        while Instant::now() < deadline {
            if !platform::pid_alive(pid) {
                break;
            }
            tokio::time::sleep(POLL_INTERVAL).await;
        }

        self.state_file.clear().await?;
        Ok(())
    }

    /// Best-effort liveness check: a PID marker exists and a process
    /// with that PID answers a signal-0 probe. The OS can recycle a
    /// PID after exit, so a recycled process may be misreported as
    /// ours; accepted limitation.
    pub async fn is_running(&self) -> bool {
        match self.state_file.read_pid().await {
            Ok(pid) => platform::pid_alive(pid),
            Err(_) => false,
        }
    }

    /// Current state record
    pub async fn state(&self) -> McinitResult<ProcessState> {
        self.state_file.load().await
    }

    pub fn server_dir(&self) -> &Path {
        &self.server_dir
    }
}

/// Copy child output to the tool's output, line by line
async fn pipe_lines<R, W>(reader: R, mut writer: W)
where
    R: tokio::io::AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut lines = BufReader::new(reader).lines();
    while let Ok(Some(line)) = lines.next_line().await {
        if writer.write_all(line.as_bytes()).await.is_err() {
            break;
        }
        if writer.write_all(b"\n").await.is_err() {
            break;
        }
    }
}

#[cfg(unix)]
mod platform {
    use crate::error::{McinitError, McinitResult};

    /// Signal-0 probe; does not disturb the process
    pub fn pid_alive(pid: u32) -> bool {
        unsafe { libc::kill(pid as libc::pid_t, 0) == 0 }
    }

    /// SIGTERM or SIGKILL against the server's process group, falling
    /// back to the single process when the group id is stale
    pub fn terminate(pid: u32, force: bool) -> McinitResult<()> {
        let sig = if force { libc::SIGKILL } else { libc::SIGTERM };

        if unsafe { libc::killpg(pid as libc::pid_t, sig) } == 0 {
            return Ok(());
        }
        let group_err = std::io::Error::last_os_error();

        if unsafe { libc::kill(pid as libc::pid_t, sig) } == 0 {
            return Ok(());
        }
        Err(McinitError::io(format!("signaling pid {}", pid), group_err))
    }
}

#[cfg(windows)]
mod platform {
    use crate::error::{McinitError, McinitResult};
    use std::process::Command;

    pub fn pid_alive(pid: u32) -> bool {
        Command::new("tasklist")
            .args(["/FI", &format!("PID eq {}", pid), "/NH"])
            .output()
            .map(|out| String::from_utf8_lossy(&out.stdout).contains(&pid.to_string()))
            .unwrap_or(false)
    }

    /// taskkill with /T takes the whole process tree; /F makes it unconditional
    pub fn terminate(pid: u32, force: bool) -> McinitResult<()> {
        let pid_arg = pid.to_string();
        let mut args = vec!["/PID", pid_arg.as_str(), "/T"];
        if force {
            args.push("/F");
        }
        let status = Command::new("taskkill")
            .args(&args)
            .status()
            .map_err(|e| McinitError::io("running taskkill", e))?;
        if status.success() {
            Ok(())
        } else {
            Err(McinitError::Internal(format!(
                "taskkill exited with {}",
                status.code().unwrap_or(-1)
            )))
        }
    }
}
