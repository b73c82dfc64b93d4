// grit: Git checkout manager with a self-update engine
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

use std::path::{Path, PathBuf};

use tracing::trace;

/// Removes a file on drop unless [`PartialFileGuard::keep`] was called.
///
/// Covers downloads and staged executables on every early-return path,
/// including cancellation, where the owning future is simply dropped.
#[derive(Debug)]
pub struct PartialFileGuard {
    path: PathBuf,
    keep: bool,
}

impl PartialFileGuard {
    #[must_use]
    pub const fn new(path: PathBuf) -> Self {
        Self { path, keep: false }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Leave the file in place when the guard drops.
    pub const fn keep(&mut self) {
        self.keep = true;
    }
}

impl Drop for PartialFileGuard {
    fn drop(&mut self) {
        if !self.keep && std::fs::remove_file(&self.path).is_ok() {
            trace!(path = %self.path.display(), "removed partial file");
        }
    }
}
