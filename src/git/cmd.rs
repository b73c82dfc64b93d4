// grit: Git checkout manager with a self-update engine
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Git command operations using shell backend.
//!
//! ```text
//! cmd.rs --> ShellBackend --> git (credential helpers, ssh config)
//! ```

use std::path::Path;

use super::backend::{GitMutation, ShellBackend};
use crate::error::GritResult;

/// Clone a repository.
///
/// # Errors
///
/// Returns a `GitError` if the clone operation fails or the destination path is invalid.
pub fn clone(url: &str, dest: &Path) -> GritResult<()> {
    ShellBackend::clone(url, dest)
}

/// Set git config value.
///
/// # Errors
///
/// Returns a `GitError` if the config value cannot be set.
pub fn set_config(repo_path: &Path, key: &str, value: &str) -> GritResult<()> {
    ShellBackend::set_config(repo_path, key, value)
}

/// Check whether `url` is a reachable git repository.
///
/// # Errors
///
/// Returns an error if git cannot be executed.
pub fn remote_exists(url: &str) -> GritResult<bool> {
    ShellBackend::remote_exists(url)
}
