//! .gitignore integration for generated server directories

use std::path::{Path, PathBuf};
use tokio::fs;

use crate::error::{McinitError, McinitResult};

/// Walk up from `start` to the repository root (the directory holding `.git`)
pub fn find_git_root(start: &Path) -> McinitResult<PathBuf> {
    let mut current = std::path::absolute(start)
        .map_err(|e| McinitError::io("resolving path", e))?;

    loop {
        if current.join(".git").exists() {
            return Ok(current);
        }
        if !current.pop() {
            return Err(McinitError::NotAGitRepo);
        }
    }
}

pub fn is_in_git_repo(path: &Path) -> bool {
    find_git_root(path).is_ok()
}

/// Append `path_to_ignore` to the repo's .gitignore if not already present
pub async fn add_to_gitignore(repo_root: &Path, path_to_ignore: &str) -> McinitResult<()> {
    let gitignore = repo_root.join(".gitignore");
    let normalized = path_to_ignore.trim_start_matches("./");

    let existing = match fs::read_to_string(&gitignore).await {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => String::new(),
        Err(e) => {
            return Err(McinitError::io(format!("reading {}", gitignore.display()), e));
        }
    };

    let already_listed = existing.lines().any(|line| {
        let trimmed = line.trim();
        trimmed == normalized || trimmed == format!("./{}", normalized)
    });
    if already_listed {
        return Ok(());
    }

    let mut updated = existing;
    if !updated.is_empty() && !updated.ends_with('\n') {
        updated.push('\n');
    }
    updated.push_str(&format!("\n# mcinit server\n{}\n", normalized));

    fs::write(&gitignore, updated)
        .await
        .map_err(|e| McinitError::io(format!("writing {}", gitignore.display()), e))
}
