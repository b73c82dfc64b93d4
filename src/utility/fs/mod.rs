// grit: Git checkout manager with a self-update engine
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Filesystem helpers.
//!
//! ```text
//! guard:  PartialFileGuard   remove-on-drop unless keep()
//! probe:  probe_writable()   create + drop a temp file in a directory
//! ```

mod guard;

use std::path::Path;

pub use guard::PartialFileGuard;

/// Checks that new files can be created in `dir`.
///
/// The probe file is removed before returning.
///
/// # Errors
///
/// Returns the I/O error from creating the probe file.
pub fn probe_writable(dir: &Path) -> std::io::Result<()> {
    tempfile::Builder::new()
        .prefix(".grit-probe-")
        .tempfile_in(dir)
        .map(drop)
}

#[cfg(test)]
mod tests;
