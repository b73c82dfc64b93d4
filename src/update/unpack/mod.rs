// grit: Git checkout manager with a self-update engine
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Extracts the single executable from a release archive.
//!
//! ```text
//! .tar.gz | .tgz --> GzDecoder --+
//! .tar ------------------------- +--> tar entries --+
//! .zip --> ZipArchive entries ----------------------+
//!                                                   v
//!                           regular file named <bin>[.exe] or mode & 0o111
//!                                                   |
//!                     0 --> Unpack  |  >1 --> Unpack  |  1 --> temp file
//!                                                   v
//!                         chmod 0755, persist over destination
//! ```
//!
//! The temp file lives next to the destination, so the final persist is a
//! same-directory rename and the destination is either absent or complete.

use std::fs::File;
use std::io::{Read, Seek, Write};
use std::path::{Path, PathBuf};

use flate2::read::GzDecoder;
use tracing::debug;

use crate::error::{UpdateError, UpdateResult};

/// Archive formats release assets may use.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArchiveFormat {
    TarGz,
    Tar,
    Zip,
}

impl ArchiveFormat {
    /// Detects the format from a file name, ignoring case.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        let ends_with_ci = |suffix: &str| {
            name.len() >= suffix.len()
                && name.is_char_boundary(name.len() - suffix.len())
                && name[name.len() - suffix.len()..].eq_ignore_ascii_case(suffix)
        };

        if ends_with_ci(".tar.gz") || ends_with_ci(".tgz") {
            Some(Self::TarGz)
        } else if ends_with_ci(".tar") {
            Some(Self::Tar)
        } else if ends_with_ci(".zip") {
            Some(Self::Zip)
        } else {
            None
        }
    }

    /// Detects the format from the final component of `path`.
    #[must_use]
    pub fn from_path(path: &Path) -> Option<Self> {
        Self::from_name(path.file_name()?.to_str()?)
    }
}

/// Extracts the executable named `binary_name` from `archive` to `destination`.
///
/// An entry qualifies when it is a regular file whose base name is
/// `binary_name` or `binary_name.exe`, or when it carries an executable mode
/// bit. Exactly one entry must qualify.
///
/// # Errors
///
/// Returns `Unpack` for unknown formats, corrupt archives, zero or several
/// candidate executables, and write failures. The destination is untouched
/// on error.
pub fn unpack(archive: &Path, destination: &Path, binary_name: &str) -> UpdateResult<()> {
    let format = ArchiveFormat::from_path(archive)
        .ok_or_else(|| UpdateError::unpack(archive, "unsupported archive format"))?;
    let parent = destination
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));

    let file = File::open(archive)
        .map_err(|e| UpdateError::unpack(archive, format!("failed to open: {e}")))?;
    let mut staged = tempfile::Builder::new()
        .prefix(".grit-unpack-")
        .tempfile_in(parent)
        .map_err(|e| {
            UpdateError::unpack(
                archive,
                format!("failed to create a temp file in {}: {e}", parent.display()),
            )
        })?;

    let matcher = ExecutableMatcher::new(binary_name);
    let entry = match format {
        ArchiveFormat::TarGz => {
            extract_tar(GzDecoder::new(file), archive, &matcher, staged.as_file_mut())
        }
        ArchiveFormat::Tar => extract_tar(file, archive, &matcher, staged.as_file_mut()),
        ArchiveFormat::Zip => extract_zip(file, archive, &matcher, staged.as_file_mut()),
    }?;
    debug!(
        archive = %archive.display(),
        entry = %entry.display(),
        destination = %destination.display(),
        "executable extracted"
    );

    staged
        .as_file_mut()
        .flush()
        .and_then(|()| set_executable(staged.path()))
        .map_err(|e| UpdateError::unpack(archive, format!("failed to finalize: {e}")))?;
    staged.persist(destination).map_err(|e| {
        UpdateError::unpack(
            archive,
            format!("failed to write {}: {}", destination.display(), e.error),
        )
    })?;

    Ok(())
}

struct ExecutableMatcher {
    plain: String,
    windows: String,
}

impl ExecutableMatcher {
    fn new(binary_name: &str) -> Self {
        Self {
            plain: binary_name.to_string(),
            windows: format!("{binary_name}.exe"),
        }
    }

    fn is_candidate(&self, path: &Path, mode: Option<u32>) -> bool {
        let named = path
            .file_name()
            .and_then(|name| name.to_str())
            .is_some_and(|name| name == self.plain || name.eq_ignore_ascii_case(&self.windows));
        named || mode.is_some_and(|m| m & 0o111 != 0)
    }
}

fn more_than_one(archive: &Path, first: &Path, second: &Path) -> UpdateError {
    UpdateError::unpack(
        archive,
        format!(
            "archive contains more than one executable ({}, {})",
            first.display(),
            second.display()
        ),
    )
}

fn extract_tar<R: Read>(
    reader: R,
    archive: &Path,
    matcher: &ExecutableMatcher,
    out: &mut File,
) -> UpdateResult<PathBuf> {
    let corrupt = |e: std::io::Error| UpdateError::unpack(archive, format!("corrupt archive: {e}"));

    let mut tar = tar::Archive::new(reader);
    let mut found: Option<PathBuf> = None;

    for entry in tar.entries().map_err(corrupt)? {
        let mut entry = entry.map_err(corrupt)?;
        if !entry.header().entry_type().is_file() {
            continue;
        }

        let path = entry.path().map_err(corrupt)?.into_owned();
        let mode = entry.header().mode().ok();
        if !matcher.is_candidate(&path, mode) {
            continue;
        }
        if let Some(first) = &found {
            return Err(more_than_one(archive, first, &path));
        }

        std::io::copy(&mut entry, out).map_err(corrupt)?;
        found = Some(path);
    }

    found.ok_or_else(|| UpdateError::unpack(archive, "archive contains no executable"))
}

fn extract_zip<R: Read + Seek>(
    reader: R,
    archive: &Path,
    matcher: &ExecutableMatcher,
    out: &mut File,
) -> UpdateResult<PathBuf> {
    let corrupt = |e: &dyn std::fmt::Display| {
        UpdateError::unpack(archive, format!("corrupt archive: {e}"))
    };

    let mut zip = zip::ZipArchive::new(reader).map_err(|e| corrupt(&e))?;
    let mut found: Option<(usize, PathBuf)> = None;

    // Locate first so a second candidate fails before anything is written.
    for index in 0..zip.len() {
        let entry = zip.by_index(index).map_err(|e| corrupt(&e))?;
        if !entry.is_file() {
            continue;
        }
        let Some(path) = entry.enclosed_name() else {
            continue;
        };
        if !matcher.is_candidate(&path, entry.unix_mode()) {
            continue;
        }
        if let Some((_, first)) = &found {
            return Err(more_than_one(archive, first, &path));
        }
        found = Some((index, path));
    }

    let (index, path) =
        found.ok_or_else(|| UpdateError::unpack(archive, "archive contains no executable"))?;
    let mut entry = zip.by_index(index).map_err(|e| corrupt(&e))?;
    std::io::copy(&mut entry, out).map_err(|e| corrupt(&e))?;

    Ok(path)
}

#[cfg(unix)]
fn set_executable(path: &Path) -> std::io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o755))
}

#[cfg(not(unix))]
fn set_executable(_path: &Path) -> std::io::Result<()> {
    Ok(())
}
