//! Startup script generation
//!
//! Writes `start.sh`, `start.ps1`, and `start.cmd` into the server
//! directory so the server can be launched without mcinit installed.

use std::path::{Path, PathBuf};
use tokio::fs;

use crate::error::{McinitError, McinitResult};

pub struct ScriptGenerator {
    server_dir: PathBuf,
}

impl ScriptGenerator {
    pub fn new(server_dir: impl Into<PathBuf>) -> Self {
        Self {
            server_dir: server_dir.into(),
        }
    }

    /// Generate all startup scripts (Unix + Windows)
    pub async fn generate_all(
        &self,
        java: &Path,
        jar: &str,
        jvm_flags: &[String],
    ) -> McinitResult<()> {
        self.write_script("start.sh", unix_script(java, jar, jvm_flags), true)
            .await?;
        self.write_script("start.ps1", powershell_script(java, jar, jvm_flags), false)
            .await?;
        self.write_script("start.cmd", cmd_script(java, jar, jvm_flags), false)
            .await?;
        Ok(())
    }

    async fn write_script(&self, name: &str, content: String, executable: bool) -> McinitResult<()> {
        let path = self.server_dir.join(name);
        fs::write(&path, content)
            .await
            .map_err(|e| McinitError::io(format!("writing {}", path.display()), e))?;

        #[cfg(unix)]
        if executable {
            use std::os::unix::fs::PermissionsExt;
            let perms = std::fs::Permissions::from_mode(0o755);
            std::fs::set_permissions(&path, perms)
                .map_err(|e| McinitError::io(format!("chmod {}", path.display()), e))?;
        }
        #[cfg(not(unix))]
        let _ = executable;

        Ok(())
    }
}

fn unix_script(java: &Path, jar: &str, jvm_flags: &[String]) -> String {
    format!(
        "#!/usr/bin/env sh\n\
         # Generated by mcinit\n\
         cd \"$(dirname \"$0\")\"\n\
         exec \"{}\" {} -jar \"{}\" nogui\n",
        java.display(),
        jvm_flags.join(" "),
        jar
    )
}

fn powershell_script(java: &Path, jar: &str, jvm_flags: &[String]) -> String {
    format!(
        "# Generated by mcinit\n\
         Set-Location -Path $PSScriptRoot\n\
         & \"{}\" {} -jar \"{}\" nogui\n",
        java.display(),
        jvm_flags.join(" "),
        jar
    )
}

fn cmd_script(java: &Path, jar: &str, jvm_flags: &[String]) -> String {
    format!(
        "@echo off\r\n\
         rem Generated by mcinit\r\n\
         cd /d \"%~dp0\"\r\n\
         \"{}\" {} -jar \"{}\" nogui\r\n",
        java.display(),
        jvm_flags.join(" "),
        jar
    )
}
