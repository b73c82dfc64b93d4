// grit: Git checkout manager with a self-update engine
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Git backend abstraction layer.
//!
//! ```text
//! GitQuery (read)     --> GixBackend (pure Rust gix)
//! GitMutation (write) --> ShellBackend (git CLI)
//! ```

use std::path::Path;

use tracing::trace;

use crate::error::{GitError, GixError, GritResult};

// --- Query Trait (Read-only operations) ---

/// Read-only git query operations.
pub trait GitQuery {
    /// Check if path is inside a git work tree.
    fn is_git_repo(path: &Path) -> bool;

    /// Get current branch name (None if HEAD is detached).
    ///
    /// # Errors
    ///
    /// Returns a `GitError` if repository discovery or head resolution fails.
    fn current_branch(path: &Path) -> GritResult<Option<String>>;
}

// --- Mutation Trait (Write operations) ---

/// Git operations that touch the network or modify repository state.
pub trait GitMutation {
    /// Clone `url` into `dest`, which must not exist yet.
    ///
    /// # Errors
    ///
    /// Returns a `GitError` if the clone operation fails or the destination path is invalid.
    fn clone(url: &str, dest: &Path) -> GritResult<()>;

    /// Set a repository-local git config value.
    ///
    /// # Errors
    ///
    /// Returns a `GitError` if the config value cannot be set.
    fn set_config(repo_path: &Path, key: &str, value: &str) -> GritResult<()>;

    /// True when `url` answers as a git repository.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if git cannot be executed.
    fn remote_exists(url: &str) -> GritResult<bool>;
}

// --- GixBackend Implementation (Pure Rust) ---

/// Pure Rust git backend using gix.
pub struct GixBackend;

impl GitQuery for GixBackend {
    fn is_git_repo(path: &Path) -> bool {
        gix::discover(path).is_ok()
    }

    fn current_branch(path: &Path) -> GritResult<Option<String>> {
        let repo =
            gix::discover(path).map_err(|e| GitError::Gix(GixError::Discover(Box::new(e))))?;
        let head = repo
            .head_name()
            .map_err(|e| GitError::Gix(GixError::Head(e)))?;
        Ok(head.map(|name| name.shorten().to_string()))
    }
}

// --- ShellBackend Implementation (Git CLI) ---

/// Shell-based git backend using git CLI.
pub struct ShellBackend;

impl ShellBackend {
    fn command(args: &[&str], cwd: &Path) -> std::io::Result<std::process::Output> {
        trace!(?args, cwd = %cwd.display(), "running git");
        std::process::Command::new("git")
            .args(args)
            .current_dir(cwd)
            .env("GCM_INTERACTIVE", "never")
            .env("GIT_TERMINAL_PROMPT", "0")
            .output()
            .map_err(|e| std::io::Error::new(e.kind(), format!("failed to execute git: {e}")))
    }

    /// Execute a git command. Sets `GCM_INTERACTIVE=never` and `GIT_TERMINAL_PROMPT=0`.
    pub(crate) fn git_command(args: &[&str], cwd: &Path) -> GritResult<String> {
        let output = Self::command(args, cwd)?;

        if !output.status.success() {
            return Err(GitError::CommandFailed {
                command: format!("git {}", args.join(" ")),
                message: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            }
            .into());
        }
        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }
}

impl GitMutation for ShellBackend {
    fn clone(url: &str, dest: &Path) -> GritResult<()> {
        let dest_str = dest.to_str().ok_or_else(|| GitError::CloneFailed {
            url: url.to_string(),
            message: "invalid destination path".to_string(),
        })?;
        let parent = dest.parent().unwrap_or_else(|| Path::new("."));

        Self::git_command(&["clone", "--quiet", url, dest_str], parent).map_err(|e| {
            GitError::CloneFailed {
                url: url.to_string(),
                message: e.to_string(),
            }
        })?;
        Ok(())
    }

    fn set_config(repo_path: &Path, key: &str, value: &str) -> GritResult<()> {
        Self::git_command(&["config", key, value], repo_path)?;
        Ok(())
    }

    fn remote_exists(url: &str) -> GritResult<bool> {
        let cwd = std::env::temp_dir();
        let output = Self::command(&["ls-remote", "--quiet", url, "HEAD"], &cwd)?;
        Ok(output.status.success())
    }
}
