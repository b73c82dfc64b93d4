// grit: Git checkout manager with a self-update engine
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Replaces the running executable with a staged one.
//!
//! ```text
//! slots (same directory):
//!   current  /usr/local/bin/grit
//!   staged   /usr/local/bin/grit.<latest>
//!   backup   /usr/local/bin/grit.<running>.backup
//!
//! 0. stale backup?  remove it      fail --> StaleBackup   (nothing moved)
//! 1. current -> backup             fail --> Swap          (nothing moved)
//! 2. staged  -> current            fail --> backup -> current
//!                                             ok   --> Swap
//!                                             fail --> FatalSwap
//! 3. remove backup                 fail --> warn, report stray backup
//! ```
//!
//! Renames within one directory are atomic, so `current` is always either
//! the old or the new executable except between steps 1 and 2.

use std::path::{Path, PathBuf};

use semver::Version;
use tracing::{debug, error, warn};

use crate::error::{UpdateError, UpdateResult};

/// Paths taking part in a swap.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BinarySlots {
    pub current: PathBuf,
    pub staged: PathBuf,
    pub backup: PathBuf,
}

impl BinarySlots {
    /// Derives staged and backup paths next to `current`.
    #[must_use]
    pub fn new(current: PathBuf, latest: &Version, running: &Version) -> Self {
        let staged = suffixed(&current, &format!(".{latest}"));
        let backup = suffixed(&current, &format!(".{running}.backup"));
        Self {
            current,
            staged,
            backup,
        }
    }

    /// Directory holding all three slots.
    #[must_use]
    pub fn dir(&self) -> &Path {
        self.current
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."))
    }
}

fn suffixed(path: &Path, suffix: &str) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(suffix);
    PathBuf::from(name)
}

/// The filesystem operations a swap performs.
pub trait SlotFs {
    fn rename(&self, from: &Path, to: &Path) -> std::io::Result<()>;
    fn remove_file(&self, path: &Path) -> std::io::Result<()>;

    fn exists(&self, path: &Path) -> bool {
        path.symlink_metadata().is_ok()
    }
}

/// [`SlotFs`] backed by `std::fs`.
#[derive(Debug, Default, Clone, Copy)]
pub struct StdFs;

impl SlotFs for StdFs {
    fn rename(&self, from: &Path, to: &Path) -> std::io::Result<()> {
        std::fs::rename(from, to)
    }

    fn remove_file(&self, path: &Path) -> std::io::Result<()> {
        std::fs::remove_file(path)
    }
}

/// What a successful swap left behind.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SwapReport {
    /// Backup that could not be deleted after the new executable went live.
    pub stray_backup: Option<PathBuf>,
}

/// Installs `slots.staged` as `slots.current`.
///
/// # Errors
///
/// - `StaleBackup` / `Swap`: the previous executable is still at `current`.
/// - `FatalSwap`: `current` may be missing; the error names the backup path.
pub fn swap(slots: &BinarySlots, fs: &dyn SlotFs) -> UpdateResult<SwapReport> {
    let BinarySlots {
        current,
        staged,
        backup,
    } = slots;

    if fs.exists(backup) {
        warn!(backup = %backup.display(), "removing backup left by an earlier update");
        fs.remove_file(backup)
            .map_err(|source| UpdateError::StaleBackup {
                backup: backup.clone(),
                source,
            })?;
    }

    debug!(from = %current.display(), to = %backup.display(), "moving current executable aside");
    fs.rename(current, backup)
        .map_err(|source| UpdateError::Swap {
            current: current.clone(),
            staged: staged.clone(),
            source,
        })?;

    debug!(from = %staged.display(), to = %current.display(), "installing staged executable");
    if let Err(install_error) = fs.rename(staged, current) {
        warn!(error = %install_error, "install failed, restoring previous executable");
        return match fs.rename(backup, current) {
            Ok(()) => Err(UpdateError::Swap {
                current: current.clone(),
                staged: staged.clone(),
                source: install_error,
            }),
            Err(restore_error) => {
                error!(
                    backup = %backup.display(),
                    current = %current.display(),
                    error = %restore_error,
                    "failed to restore previous executable"
                );
                Err(UpdateError::FatalSwap {
                    current: current.clone(),
                    backup: backup.clone(),
                    install_error,
                    restore_error,
                })
            }
        };
    }

    match fs.remove_file(backup) {
        Ok(()) => Ok(SwapReport::default()),
        Err(e) => {
            warn!(
                backup = %backup.display(),
                error = %e,
                "new version installed but the backup could not be removed"
            );
            Ok(SwapReport {
                stray_backup: Some(backup.clone()),
            })
        }
    }
}
