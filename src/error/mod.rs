// grit: Git checkout manager with a self-update engine
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Error handling module.
//!
//! ```text
//!              GritError (~24 bytes)
//!                     |
//!   +------+------+---+---+------+------+
//!   |      |      |       |      |      |
//!   v      v      v       v      v      v
//! Update  Git    Cfg  Endpoint  Fs    Io
//!  Box    Box    Box    Box     Box   Box
//!
//! Sub-errors (unboxed internally):
//!   Update   Resolve, VersionParse, AssetNotFound, Download,
//!            Unpack, Permission, Staging, StaleBackup, Swap, FatalSwap,
//!            OlderRelease, Cancelled, TimedOut
//!   Resolve  ReleaseNotFound, Http, Request, Index
//!   Git      Gix, CommandFailed, CloneFailed
//!   Config   MissingKey, InvalidValue
//!   Endpoint Template, InvalidUrl, NotSsh
//!   Fs       IoError
//!
//! All variants boxed => GritError fits in 24 bytes.
//! ```

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::update::Phase;

/// Convenience alias for `anyhow::Result`.
pub type Result<T> = anyhow::Result<T>;

/// Result type using [`GritError`].
pub type GritResult<T> = std::result::Result<T, GritError>;

/// Result type using [`UpdateError`].
pub type UpdateResult<T> = std::result::Result<T, UpdateError>;

/// Top-level application error type.
///
/// All sub-errors are boxed to keep this enum at ~24 bytes on the stack.
#[derive(Debug, Error)]
pub enum GritError {
    /// Self-update failed.
    #[error("self-update error: {0}")]
    Update(#[from] Box<UpdateError>),

    /// Git operation failed.
    #[error("git error: {0}")]
    Git(#[from] Box<GitError>),

    /// Configuration error.
    #[error("config error: {0}")]
    Config(#[from] Box<ConfigError>),

    /// Endpoint template or URL error.
    #[error("endpoint error: {0}")]
    Endpoint(#[from] Box<EndpointError>),

    /// Filesystem error.
    #[error("filesystem error: {0}")]
    Fs(#[from] Box<FsError>),

    /// I/O error.
    #[error("io error: {0}")]
    Io(Box<std::io::Error>),
}

// --- From implementations for boxing ---

/// Macro to generate `From` implementations that box the source error.
macro_rules! impl_from_boxed {
    ($($error:ty => $variant:ident),+ $(,)?) => {
        $(
            impl From<$error> for GritError {
                fn from(err: $error) -> Self {
                    GritError::$variant(Box::new(err))
                }
            }
        )+
    };
}

impl_from_boxed! {
    UpdateError => Update,
    GitError => Git,
    ConfigError => Config,
    EndpointError => Endpoint,
    FsError => Fs,
    std::io::Error => Io,
}

// --- Update Errors ---

/// Self-update errors.
///
/// Everything except [`UpdateError::Swap`] and [`UpdateError::FatalSwap`] is
/// raised before the running executable has been touched.
#[derive(Debug, Error)]
pub enum UpdateError {
    /// The release index could not be queried or had no eligible release.
    #[error(transparent)]
    Resolve(#[from] ResolveError),

    /// A release tag is not a semantic version.
    #[error("release tag '{tag}' is not a valid version: {source}")]
    VersionParse {
        tag: String,
        #[source]
        source: semver::Error,
    },

    /// The release has no artifact for this platform.
    #[error("release {tag} has no asset for {platform}")]
    AssetNotFound { tag: String, platform: String },

    /// The asset could not be downloaded.
    #[error("failed to download {url}: {message}")]
    Download { url: String, message: String },

    /// The archive could not be unpacked into a single executable.
    #[error("failed to unpack {}: {message}", .archive.display())]
    Unpack { archive: PathBuf, message: String },

    /// The executable's directory is not writable.
    #[error(
        "permission denied writing to {}; re-run as a user that owns the grit executable",
        .dir.display()
    )]
    Permission { dir: PathBuf },

    /// A temporary file next to the executable could not be created.
    #[error("failed to prepare {} for the update: {source}", .dir.display())]
    Staging {
        dir: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The swap failed and the original executable is in place.
    #[error(
        "failed to install {} over {} ({source}); {} still holds the previous version",
        .staged.display(),
        .current.display(),
        .current.display()
    )]
    Swap {
        current: PathBuf,
        staged: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A backup left by an earlier run could not be cleared.
    #[error("stale backup {} could not be removed: {source}", .backup.display())]
    StaleBackup {
        backup: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The swap failed and restoring the original executable failed too.
    #[error(
        "failed to install the new version ({install_error}) and failed to restore the previous \
         version ({restore_error}); the previous executable is at {}, move it back with: mv '{}' '{}'",
        .backup.display(),
        .backup.display(),
        .current.display()
    )]
    FatalSwap {
        current: PathBuf,
        backup: PathBuf,
        install_error: std::io::Error,
        restore_error: std::io::Error,
    },

    /// The newest published release is older than the running version.
    #[error(
        "latest published release ({latest}) is older than the current version ({running}), \
         use --force to downgrade"
    )]
    OlderRelease {
        latest: semver::Version,
        running: semver::Version,
    },

    /// The operation was cancelled before the executable was touched.
    #[error("self-update cancelled while {phase}")]
    Cancelled { phase: Phase },

    /// The deadline elapsed before the executable was touched.
    #[error("self-update timed out after {timeout:?} while {phase}")]
    TimedOut {
        phase: Phase,
        timeout: std::time::Duration,
    },
}

impl UpdateError {
    /// Returns true when the running executable may be missing and the user
    /// has to restore it by hand.
    #[must_use]
    pub const fn is_fatal(&self) -> bool {
        matches!(self, Self::FatalSwap { .. })
    }

    pub(crate) fn download(url: &str, message: impl Into<String>) -> Self {
        Self::Download {
            url: url.to_string(),
            message: message.into(),
        }
    }

    pub(crate) fn unpack(archive: &Path, message: impl Into<String>) -> Self {
        Self::Unpack {
            archive: archive.to_path_buf(),
            message: message.into(),
        }
    }

    /// `Permission` for `PermissionDenied`, `Staging` for any other failure.
    pub(crate) fn staging(dir: &Path, source: std::io::Error) -> Self {
        if source.kind() == std::io::ErrorKind::PermissionDenied {
            Self::Permission {
                dir: dir.to_path_buf(),
            }
        } else {
            Self::Staging {
                dir: dir.to_path_buf(),
                source,
            }
        }
    }
}

// --- Resolve Errors ---

/// Release index errors.
#[derive(Debug, Error)]
pub enum ResolveError {
    /// No release survived filtering.
    #[error("no published release found{}", pre_release_hint(.pre_release_excluded))]
    ReleaseNotFound { pre_release_excluded: bool },

    /// HTTP error response from the index.
    #[error("release index returned http {status}: {url}")]
    Http { status: u16, url: String },

    /// Error from reqwest library.
    #[error("failed to query release index: {0}")]
    Request(#[from] reqwest::Error),

    /// The index answered with something unusable.
    #[error("invalid release index response: {message}")]
    Index { message: String },
}

const fn pre_release_hint(excluded: &bool) -> &'static str {
    if *excluded { ", try --pre-release" } else { "" }
}

// --- Gix Errors ---

/// Wrapper for gix-specific errors.
#[derive(Debug, Error)]
pub enum GixError {
    /// Failed to discover repository from path.
    #[error("failed to discover repository: {0}")]
    Discover(#[from] Box<gix::discover::Error>),

    /// Failed to get HEAD reference.
    #[error("failed to get head reference: {0}")]
    Head(#[from] gix::reference::find::existing::Error),
}

// --- Git Errors ---

/// Git operation errors.
#[derive(Debug, Error)]
pub enum GitError {
    /// Git command execution failed.
    #[error("git command failed: {command} - {message}")]
    CommandFailed { command: String, message: String },

    /// Error from gix library.
    #[error("gix error: {0}")]
    Gix(#[from] GixError),

    /// Clone operation failed.
    #[error("failed to clone {url}: {message}")]
    CloneFailed { url: String, message: String },
}

// --- Config Errors ---

/// Configuration-related errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Missing required configuration key.
    #[error("missing required config key '{key}' in section '[{section}]'")]
    MissingKey { section: String, key: String },

    /// Invalid configuration value.
    #[error("invalid value for '{key}' in section '[{section}]': {message}")]
    InvalidValue {
        section: String,
        key: String,
        message: String,
    },
}

// --- Endpoint Errors ---

/// Endpoint template and URL errors.
#[derive(Debug, Error)]
pub enum EndpointError {
    /// The template uses an unsupported action or is malformed.
    #[error("invalid endpoint template '{template}': {message}")]
    Template { template: String, message: String },

    /// The resolved URL is not a git URL.
    #[error("invalid git url '{url}': {message}")]
    InvalidUrl { url: String, message: String },

    /// SCP conversion requested for a non-SSH endpoint.
    #[error("not an SSH endpoint: {0}")]
    NotSsh(String),
}

// --- Filesystem Errors ---

/// Filesystem operation errors.
#[derive(Debug, Error)]
pub enum FsError {
    /// General I/O error.
    #[error("I/O error on '{path}': {source}")]
    IoError {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

#[cfg(test)]
mod tests;
