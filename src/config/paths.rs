// grit: Git checkout manager with a self-update engine
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Well-known locations.
//!
//! ```text
//! ~/.grit.toml   default config file (optional)
//! ~/grit/        default clone root
//! ```

use std::path::{Component, Path, PathBuf};

/// File name of the per-user config file.
pub const CONFIG_FILE_NAME: &str = ".grit.toml";

/// Directory under the home directory that holds clones by default.
pub const CLONE_ROOT_NAME: &str = "grit";

/// Returns `~/.grit.toml`, or `.grit.toml` when there is no home directory.
#[must_use]
pub fn default_config_path() -> PathBuf {
    dirs::home_dir().map_or_else(
        || PathBuf::from(CONFIG_FILE_NAME),
        |home| home.join(CONFIG_FILE_NAME),
    )
}

/// Returns `~/grit`, or `grit` when there is no home directory.
#[must_use]
pub fn default_clone_root() -> PathBuf {
    dirs::home_dir().map_or_else(
        || PathBuf::from(CLONE_ROOT_NAME),
        |home| home.join(CLONE_ROOT_NAME),
    )
}

/// Expands a leading `~` to the home directory.
///
/// Paths that do not start with `~`, or that name another user's home
/// (`~alice/...`), are returned unchanged.
#[must_use]
pub fn expand_home(path: &Path) -> PathBuf {
    let mut components = path.components();
    match components.next() {
        Some(Component::Normal(first)) if first == "~" => {
            let Some(home) = dirs::home_dir() else {
                return path.to_path_buf();
            };
            let rest = components.as_path();
            if rest.as_os_str().is_empty() {
                home
            } else {
                home.join(rest)
            }
        }
        _ => path.to_path_buf(),
    }
}
