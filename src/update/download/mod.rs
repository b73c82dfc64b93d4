// grit: Git checkout manager with a self-update engine
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Asset selection and streaming download.
//!
//! ```text
//! Release.assets --select_asset(platform)--> Asset
//!                                              |
//!                     ByteFetcher::fetch(url)  v
//!   chunk --> write --> received += len --> ProgressSink(received, total)
//!     |
//!     +-- stream error --> Download, partial file removed
//!
//! total = asset.size, else Content-Length, else 0 (unknown)
//! ```

use std::fmt;
use std::path::{Path, PathBuf};

use bytes::Bytes;
use futures_util::StreamExt;
use futures_util::future::BoxFuture;
use futures_util::stream::BoxStream;
use semver::Version;
use tokio::io::AsyncWriteExt;
use tracing::{debug, trace};

use crate::error::{UpdateError, UpdateResult};
use crate::update::release::{Asset, Release};
use crate::update::unpack::ArchiveFormat;
use crate::utility::fs::PartialFileGuard;

/// Operating system and CPU architecture an asset must be built for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Platform {
    os: &'static str,
    arch: &'static str,
}

impl Platform {
    /// Platform of the running binary, in `std::env::consts` terms.
    #[must_use]
    pub const fn current() -> Self {
        Self::new(std::env::consts::OS, std::env::consts::ARCH)
    }

    #[must_use]
    pub const fn new(os: &'static str, arch: &'static str) -> Self {
        Self { os, arch }
    }

    #[must_use]
    pub const fn os(&self) -> &'static str {
        self.os
    }

    #[must_use]
    pub const fn arch(&self) -> &'static str {
        self.arch
    }

    fn os_aliases(&self) -> &'static [&'static str] {
        match self.os {
            "linux" => &["linux"],
            "macos" | "darwin" => &["darwin", "macos"],
            "windows" => &["windows"],
            "freebsd" => &["freebsd"],
            _ => &[],
        }
    }

    fn arch_aliases(&self) -> &'static [&'static str] {
        match self.arch {
            "x86_64" | "amd64" => &["amd64", "x86_64"],
            "aarch64" | "arm64" => &["arm64", "aarch64"],
            "x86" | "i686" | "386" => &["386", "i686"],
            _ => &[],
        }
    }

    /// True when `name` carries an `<os>-<arch>` or `<os>_<arch>` marker for
    /// this platform and a supported archive extension. The arch must end at
    /// a delimiter.
    #[must_use]
    pub fn matches(&self, name: &str) -> bool {
        let lower = name.to_ascii_lowercase();
        if ArchiveFormat::from_name(&lower).is_none() {
            return false;
        }

        let os_aliases = match self.os_aliases() {
            [] => std::slice::from_ref(&self.os),
            aliases => aliases,
        };
        let arch_aliases = match self.arch_aliases() {
            [] => std::slice::from_ref(&self.arch),
            aliases => aliases,
        };

        os_aliases.iter().any(|os| {
            arch_aliases.iter().any(|arch| {
                contains_token(&lower, &format!("{os}-{arch}"))
                    || contains_token(&lower, &format!("{os}_{arch}"))
            })
        })
    }
}

/// True when `token` occurs in `name` followed by `.`, `-`, `_` or the end,
/// so `linux-arm` does not match `linux-arm64`.
fn contains_token(name: &str, token: &str) -> bool {
    name.match_indices(token).any(|(start, _)| {
        matches!(
            name[start + token.len()..].chars().next(),
            None | Some('.' | '-' | '_')
        )
    })
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.os, self.arch)
    }
}

/// Picks the first asset of `release` built for `platform`.
///
/// # Errors
///
/// Returns `AssetNotFound` when no asset matches.
pub fn select_asset<'r>(release: &'r Release, platform: &Platform) -> UpdateResult<&'r Asset> {
    release
        .assets
        .iter()
        .find(|asset| platform.matches(&asset.name))
        .ok_or_else(|| UpdateError::AssetNotFound {
            tag: release.tag.clone(),
            platform: platform.to_string(),
        })
}

/// An open response body.
pub struct FetchResponse {
    /// Length announced by the server, if any.
    pub content_length: Option<u64>,
    pub chunks: BoxStream<'static, UpdateResult<Bytes>>,
}

/// Opens a byte stream for a URL.
pub trait ByteFetcher {
    fn fetch<'a>(&'a self, url: &'a str) -> BoxFuture<'a, UpdateResult<FetchResponse>>;
}

/// Receives download progress.
///
/// `received` strictly increases between calls; `total` is 0 when unknown and
/// never changes during one download.
pub trait ProgressSink {
    fn on_progress(&self, received: u64, total: u64);

    /// Called once before the first byte, with the version being fetched.
    fn on_start(&self, _version: &Version, _asset: &Asset) {}

    /// Called once after the last byte has been written.
    fn on_finish(&self) {}
}

impl<F> ProgressSink for F
where
    F: Fn(u64, u64),
{
    fn on_progress(&self, received: u64, total: u64) {
        self(received, total);
    }
}

/// A sink that discards progress.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoProgress;

impl ProgressSink for NoProgress {
    fn on_progress(&self, _received: u64, _total: u64) {}
}

/// File name used for the downloaded asset inside `dest_dir`.
///
/// Only the final path component of the asset name is kept.
fn download_file_name(asset: &Asset) -> String {
    Path::new(&asset.name)
        .file_name()
        .and_then(|name| name.to_str())
        .map_or_else(|| "grit-download".to_string(), str::to_string)
}

/// Streams `asset` into `dest_dir` and returns the written path.
///
/// The file keeps the asset's name so the unpacker can detect the format.
///
/// # Errors
///
/// Returns `Download` for transport or write failures; the partial file is
/// removed before returning.
pub async fn download(
    fetcher: &dyn ByteFetcher,
    asset: &Asset,
    dest_dir: &Path,
    sink: &dyn ProgressSink,
) -> UpdateResult<PathBuf> {
    let url = asset.url.as_str();
    let output = dest_dir.join(download_file_name(asset));

    let response = fetcher.fetch(url).await?;
    let total = match asset.size {
        0 => response.content_length.unwrap_or(0),
        declared => declared,
    };
    debug!(url, total, output = %output.display(), "downloading asset");

    let mut file = tokio::fs::File::create(&output).await.map_err(|e| {
        UpdateError::download(url, format!("failed to create {}: {e}", output.display()))
    })?;
    let mut guard = PartialFileGuard::new(output.clone());

    let mut chunks = response.chunks;
    let mut received: u64 = 0;
    while let Some(chunk) = chunks.next().await {
        let chunk = chunk?;
        if chunk.is_empty() {
            continue;
        }

        file.write_all(&chunk).await.map_err(|e| {
            UpdateError::download(url, format!("failed to write {}: {e}", output.display()))
        })?;
        received += chunk.len() as u64;
        trace!(received, total, "chunk written");
        sink.on_progress(received, total);
    }

    file.flush().await.map_err(|e| {
        UpdateError::download(url, format!("failed to flush {}: {e}", output.display()))
    })?;
    drop(file);

    if total != 0 && received != total {
        return Err(UpdateError::download(
            url,
            format!("expected {total} bytes, received {received}"),
        ));
    }

    guard.keep();
    Ok(output)
}
