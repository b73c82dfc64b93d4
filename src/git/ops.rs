// grit: Git checkout manager with a self-update engine
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Higher-level git workflows built from query and command operations.
//!
//! ```text
//! clone_repository(url, dest)
//!   dest is a repo? --> AlreadyExists
//!   mkdir -p parent
//!   git clone       --> fail: remove dest (if we created it)
//!   setup_tracking  --> branch.<b>.remote / branch.<b>.merge
//! ```

use std::path::Path;

use tracing::{debug, info, warn};

use super::cmd::{clone, set_config};
use super::query::{current_branch, is_git_repo};
use crate::error::{FsError, GritResult};

/// What [`clone_repository`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloneStatus {
    Cloned,
    /// A repository was already present at the destination.
    AlreadyExists,
}

/// Clones `url` into `dest` and configures upstream tracking for the
/// checked-out branch.
///
/// # Errors
///
/// Returns an error if the parent directory cannot be created, the clone
/// fails (a directory created by the attempt is removed), or tracking cannot
/// be configured.
pub fn clone_repository(url: &str, dest: &Path) -> GritResult<CloneStatus> {
    if dest.join(".git").exists() && is_git_repo(dest) {
        info!(dest = %dest.display(), "repository already cloned");
        return Ok(CloneStatus::AlreadyExists);
    }

    if let Some(parent) = dest.parent() {
        std::fs::create_dir_all(parent).map_err(|source| FsError::IoError {
            path: parent.display().to_string(),
            source,
        })?;
    }

    let existed = dest.exists();
    debug!(url, dest = %dest.display(), "cloning");
    if let Err(e) = clone(url, dest) {
        if !existed
            && let Err(cleanup) = std::fs::remove_dir_all(dest)
            && cleanup.kind() != std::io::ErrorKind::NotFound
        {
            warn!(dest = %dest.display(), error = %cleanup, "failed to remove partial clone");
        }
        return Err(e);
    }

    setup_tracking(dest)?;
    Ok(CloneStatus::Cloned)
}

/// Points the current branch at `origin` so plain `git pull` works.
///
/// Does nothing when HEAD is detached.
///
/// # Errors
///
/// Returns an error if HEAD cannot be read or git config cannot be written.
pub fn setup_tracking(repo: &Path) -> GritResult<()> {
    let Some(branch) = current_branch(repo)? else {
        debug!(repo = %repo.display(), "detached HEAD, not setting up tracking");
        return Ok(());
    };

    set_config(repo, &format!("branch.{branch}.remote"), "origin")?;
    set_config(
        repo,
        &format!("branch.{branch}.merge"),
        &format!("refs/heads/{branch}"),
    )?;
    debug!(repo = %repo.display(), branch, "tracking configured");
    Ok(())
}
