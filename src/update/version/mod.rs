// grit: Git checkout manager with a self-update engine
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Version model for release tags.
//!
//! ```text
//! "v1.2.3-rc.1" --> trim 'v' --> semver::Version
//! precedence:  major > minor > patch > pre-release
//!              1.0.0-rc.1 < 1.0.0, build metadata ignored
//! ```

use std::cmp::Ordering;

use semver::Version;

use crate::error::{UpdateError, UpdateResult};

/// Parses a release tag (`1.2.3`, `v1.2.3`, `v2.0.0-beta.1`) into a version.
///
/// # Errors
///
/// Returns `UpdateError::VersionParse` if the tag is not a semantic version.
pub fn parse_tag(tag: &str) -> UpdateResult<Version> {
    let trimmed = tag.trim();
    let bare = trimmed
        .strip_prefix('v')
        .or_else(|| trimmed.strip_prefix('V'))
        .unwrap_or(trimmed);

    Version::parse(bare).map_err(|source| UpdateError::VersionParse {
        tag: tag.to_string(),
        source,
    })
}

/// Orders two versions by semantic-version precedence.
///
/// Build metadata does not take part, so `2.0.0+r1` and `2.0.0+r2` are equal.
#[must_use]
pub fn compare(a: &Version, b: &Version) -> Ordering {
    a.major
        .cmp(&b.major)
        .then_with(|| a.minor.cmp(&b.minor))
        .then_with(|| a.patch.cmp(&b.patch))
        .then_with(|| a.pre.cmp(&b.pre))
}

/// The version compiled into this binary.
///
/// # Errors
///
/// Returns `UpdateError::VersionParse` if the package version is malformed,
/// which only happens for hand-edited builds.
pub fn running_version() -> UpdateResult<Version> {
    parse_tag(env!("CARGO_PKG_VERSION"))
}
