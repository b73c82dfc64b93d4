// grit: Git checkout manager with a self-update engine
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Published releases and latest-release resolution.
//!
//! ```text
//! ReleaseSource::releases()        (GitHub, fixtures, ...)
//!        |
//!        v
//!   drop drafts
//!   drop pre-releases   (unless --pre-release)
//!        |
//!        v
//!   parse_tag()  -- malformed tag --> VersionParse
//!        |
//!        v
//!   max by precedence  -- nothing left --> ReleaseNotFound
//! ```

use futures_util::future::BoxFuture;
use semver::Version;
use tracing::{debug, trace};

use crate::error::{ResolveError, UpdateResult};
use crate::update::version::{compare, parse_tag};

/// A downloadable artifact attached to a release.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Asset {
    pub name: String,
    /// Declared size in bytes, 0 when the index does not say.
    pub size: u64,
    pub url: String,
}

/// A published release as reported by the index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Release {
    pub tag: String,
    pub pre_release: bool,
    pub draft: bool,
    pub assets: Vec<Asset>,
}

/// The release chosen for installation along with its parsed version.
#[derive(Debug, Clone)]
pub struct ResolvedRelease {
    pub release: Release,
    pub version: Version,
}

/// Lists the releases published for this program.
///
/// Implementations perform the network query; selection happens in
/// [`find_latest`] so every source gets the same filtering rules.
pub trait ReleaseSource {
    /// Fetch every release the index knows about, in any order.
    fn releases(&self) -> BoxFuture<'_, UpdateResult<Vec<Release>>>;
}

/// Queries `source` and returns the greatest eligible release.
///
/// # Errors
///
/// Propagates source errors, `VersionParse` for an eligible release with a
/// malformed tag, and `ReleaseNotFound` when no release is eligible.
pub async fn find_latest(
    source: &dyn ReleaseSource,
    allow_pre_release: bool,
) -> UpdateResult<ResolvedRelease> {
    let releases = source.releases().await?;
    debug!(count = releases.len(), allow_pre_release, "release index fetched");
    select_latest(releases, allow_pre_release)
}

/// Pure selection step of [`find_latest`].
///
/// Ties on precedence keep the first release in index order.
///
/// # Errors
///
/// See [`find_latest`].
pub fn select_latest(
    releases: Vec<Release>,
    allow_pre_release: bool,
) -> UpdateResult<ResolvedRelease> {
    let mut best: Option<ResolvedRelease> = None;

    for release in releases {
        if release.draft {
            trace!(tag = %release.tag, "skipping draft release");
            continue;
        }
        if release.pre_release && !allow_pre_release {
            trace!(tag = %release.tag, "skipping pre-release");
            continue;
        }

        let version = parse_tag(&release.tag)?;
        let replace = best
            .as_ref()
            .is_none_or(|current| compare(&version, &current.version).is_gt());
        if replace {
            best = Some(ResolvedRelease { release, version });
        }
    }

    best.ok_or_else(|| {
        ResolveError::ReleaseNotFound {
            pre_release_excluded: !allow_pre_release,
        }
        .into()
    })
}

#[cfg(test)]
mod tests;
