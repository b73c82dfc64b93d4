// grit: Git checkout manager with a self-update engine
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Self-update engine.
//!
//! ```text
//!            +----------- timeout + cancellation -----------+
//!            |                                              |
//! Resolving --> Comparing --> Downloading --> Unpacking ----+--> Swapping
//! find_latest   same: UpToDate  ByteFetcher    unpack()         swap()
//!               older: refuse   ProgressSink   -> staged slot   (atomic,
//!               (unless force)                                   never
//!                                                               interrupted)
//!
//! Everything left of Swapping writes only to temporary paths; the running
//! executable changes in swap() alone.
//! ```

pub mod download;
pub mod github;
pub mod release;
pub mod swap;
pub mod unpack;
pub mod version;

#[cfg(test)]
pub(crate) mod test_support;

use std::cell::Cell;
use std::cmp::Ordering;
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use bon::Builder;
use semver::Version;
use tempfile::TempDir;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::error::{UpdateError, UpdateResult};
use crate::utility::fs::{PartialFileGuard, probe_writable};
use download::{ByteFetcher, Platform, ProgressSink, download, select_asset};
use release::{ReleaseSource, find_latest};
use swap::{BinarySlots, SlotFs, StdFs, swap};
use unpack::unpack;
use version::compare;

/// Default overall deadline for everything before the swap.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Stage of a self-update run, used in cancellation and timeout messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Resolving,
    Comparing,
    Downloading,
    Unpacking,
    Swapping,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Resolving => "resolving the latest release",
            Self::Comparing => "comparing versions",
            Self::Downloading => "downloading",
            Self::Unpacking => "unpacking",
            Self::Swapping => "installing",
        })
    }
}

/// Per-run switches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UpdateOptions {
    /// Consider pre-releases when resolving the latest release.
    pub allow_pre_release: bool,
    /// Install even when the latest release is the same or older.
    pub force: bool,
    /// Deadline covering resolve, download and unpack.
    pub timeout: Duration,
}

impl Default for UpdateOptions {
    fn default() -> Self {
        Self {
            allow_pre_release: false,
            force: false,
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

/// How the installed version relates to the one that was running.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VersionChange {
    Upgraded { from: Version, to: Version },
    Downgraded { from: Version, to: Version },
    /// Same version string.
    Reinstalled { version: Version },
    /// Same precedence, different build metadata.
    ReinstalledAs { version: Version, installed: Version },
}

impl VersionChange {
    fn classify(running: &Version, installed: &Version) -> Self {
        match compare(installed, running) {
            Ordering::Greater => Self::Upgraded {
                from: running.clone(),
                to: installed.clone(),
            },
            Ordering::Less => Self::Downgraded {
                from: running.clone(),
                to: installed.clone(),
            },
            Ordering::Equal if running == installed => Self::Reinstalled {
                version: running.clone(),
            },
            Ordering::Equal => Self::ReinstalledAs {
                version: running.clone(),
                installed: installed.clone(),
            },
        }
    }
}

impl fmt::Display for VersionChange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Upgraded { from, to } => write!(f, "upgraded from version {from} to {to}"),
            Self::Downgraded { from, to } => write!(f, "downgraded from version {from} to {to}"),
            Self::Reinstalled { version } => write!(f, "reinstalled version {version}"),
            Self::ReinstalledAs { version, installed } => {
                write!(f, "reinstalled version {version} as {installed}")
            }
        }
    }
}

/// Result of a completed run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateOutcome {
    /// Nothing was downloaded or changed.
    UpToDate { version: Version },
    Installed {
        change: VersionChange,
        /// Backup of the previous executable that could not be deleted.
        stray_backup: Option<PathBuf>,
    },
}

impl fmt::Display for UpdateOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UpToDate { version } => write!(f, "current version ({version}) is up to date"),
            Self::Installed { change, .. } => change.fmt(f),
        }
    }
}

/// Everything verified and staged, ready for the swap.
struct Staged {
    installed: Version,
    slots: BinarySlots,
    guard: PartialFileGuard,
}

enum Prepared {
    UpToDate,
    Staged(Staged),
}

/// Drives one self-update run.
///
/// ```ignore
/// let outcome = Updater::builder()
///     .source(&github)
///     .fetcher(&http)
///     .running(version::running_version()?)
///     .current_exe(std::env::current_exe()?)
///     .build()
///     .run(&UpdateOptions::default(), &NoProgress)
///     .await?;
/// ```
#[derive(Builder)]
pub struct Updater<'a> {
    source: &'a dyn ReleaseSource,
    fetcher: &'a dyn ByteFetcher,
    /// Version of the executable being replaced.
    running: Version,
    /// Absolute path of the executable being replaced.
    #[builder(into)]
    current_exe: PathBuf,
    #[builder(default = Platform::current())]
    platform: Platform,
    /// Base name of the executable inside release archives.
    #[builder(into, default = env!("CARGO_PKG_NAME").to_owned())]
    binary_name: String,
    #[builder(default = &StdFs as &dyn SlotFs)]
    fs: &'a dyn SlotFs,
    #[builder(default)]
    cancel: CancellationToken,
}

impl Updater<'_> {
    /// Runs resolve, compare, download, unpack and swap.
    ///
    /// # Errors
    ///
    /// Every [`UpdateError`] variant except `FatalSwap` leaves the executable
    /// at `current_exe` untouched. `Cancelled` and `TimedOut` are only raised
    /// before the swap starts.
    pub async fn run(
        &self,
        options: &UpdateOptions,
        sink: &dyn ProgressSink,
    ) -> UpdateResult<UpdateOutcome> {
        let phase = Cell::new(Phase::Resolving);

        let prepared = tokio::select! {
            biased;
            () = self.cancel.cancelled() => {
                return Err(UpdateError::Cancelled { phase: phase.get() });
            }
            result = tokio::time::timeout(options.timeout, self.prepare(options, sink, &phase)) => {
                result.map_err(|_| UpdateError::TimedOut {
                    phase: phase.get(),
                    timeout: options.timeout,
                })??
            }
        };

        let Staged {
            installed,
            slots,
            mut guard,
        } = match prepared {
            Prepared::UpToDate => {
                return Ok(UpdateOutcome::UpToDate {
                    version: self.running.clone(),
                });
            }
            Prepared::Staged(staged) => staged,
        };

        // Last exit point that leaves the executable alone.
        if self.cancel.is_cancelled() {
            return Err(UpdateError::Cancelled { phase: phase.get() });
        }

        phase.set(Phase::Swapping);
        info!(
            current = %slots.current.display(),
            staged = %slots.staged.display(),
            "swapping executables"
        );
        let report = swap(&slots, self.fs)?;
        guard.keep();

        Ok(UpdateOutcome::Installed {
            change: VersionChange::classify(&self.running, &installed),
            stray_backup: report.stray_backup,
        })
    }

    async fn prepare(
        &self,
        options: &UpdateOptions,
        sink: &dyn ProgressSink,
        phase: &Cell<Phase>,
    ) -> UpdateResult<Prepared> {
        phase.set(Phase::Resolving);
        let latest = find_latest(self.source, options.allow_pre_release).await?;
        info!(tag = %latest.release.tag, version = %latest.version, "latest release resolved");

        phase.set(Phase::Comparing);
        match compare(&latest.version, &self.running) {
            Ordering::Equal if !options.force => {
                debug!(running = %self.running, "already up to date");
                return Ok(Prepared::UpToDate);
            }
            Ordering::Less if !options.force => {
                return Err(UpdateError::OlderRelease {
                    latest: latest.version,
                    running: self.running.clone(),
                });
            }
            _ => {}
        }

        let asset = select_asset(&latest.release, &self.platform)?;
        let slots = BinarySlots::new(self.current_exe.clone(), &latest.version, &self.running);
        let workdir = create_workdir(slots.dir().to_path_buf()).await?;

        phase.set(Phase::Downloading);
        sink.on_start(&latest.version, asset);
        let archive = download(self.fetcher, asset, workdir.path(), sink).await;
        sink.on_finish();
        let archive = archive?;

        phase.set(Phase::Unpacking);
        let (_workdir, binary) = unpack_in(workdir, archive, self.binary_name.clone()).await?;
        std::fs::rename(&binary, &slots.staged).map_err(|e| UpdateError::staging(slots.dir(), e))?;
        let guard = PartialFileGuard::new(slots.staged.clone());

        Ok(Prepared::Staged(Staged {
            installed: latest.version,
            slots,
            guard,
        }))
    }
}

/// Probes `dir` and creates the work directory on the blocking pool.
///
/// If the caller stops waiting, the directory is dropped, and removed, by the
/// blocking task itself.
async fn create_workdir(dir: PathBuf) -> UpdateResult<TempDir> {
    let joined = dir.clone();
    tokio::task::spawn_blocking(move || {
        let created = probe_writable(&dir).and_then(|()| {
            tempfile::Builder::new()
                .prefix(".grit-update-")
                .tempdir_in(&dir)
        });
        created.map_err(|e| {
            debug!(dir = %dir.display(), error = %e, "cannot stage next to the executable");
            UpdateError::staging(&dir, e)
        })
    })
    .await
    .map_err(|e| UpdateError::staging(&joined, std::io::Error::other(e)))?
}

/// Extracts the executable from `archive` into `workdir` on the blocking
/// pool. The work directory moves into the task, so an abandoned extraction
/// still cleans up after itself.
async fn unpack_in(
    workdir: TempDir,
    archive: PathBuf,
    binary_name: String,
) -> UpdateResult<(TempDir, PathBuf)> {
    let failed = archive.clone();
    tokio::task::spawn_blocking(move || {
        let binary = workdir.path().join(&binary_name);
        debug!(archive = %archive.display(), binary = %binary.display(), "unpacking");
        unpack(&archive, &binary, &binary_name)?;
        Ok((workdir, binary))
    })
    .await
    .map_err(|e| UpdateError::unpack(&failed, format!("unpacking task failed: {e}")))?
}
