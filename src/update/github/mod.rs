// grit: Git checkout manager with a self-update engine
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! GitHub releases as a [`ReleaseSource`].
//!
//! ```text
//! GET {api_url}/repos/{owner}/{repo}/releases?per_page=100
//!   [{ tag_name, prerelease, draft, assets: [{ name, size, browser_download_url }] }]
//!   Link: <...&page=2>; rel="next"   --> GET, until no rel="next"
//! ```

use futures_util::FutureExt;
use futures_util::future::BoxFuture;
use reqwest::Client;
use reqwest::header::{ACCEPT, HeaderMap, LINK};
use serde::Deserialize;
use tracing::debug;

use crate::error::{ResolveError, UpdateResult};
use crate::net::global_client;
use crate::update::release::{Asset, Release, ReleaseSource};

/// Public GitHub API root.
pub const DEFAULT_API_URL: &str = "https://api.github.com";

#[derive(Debug, Deserialize)]
struct GithubRelease {
    tag_name: String,
    #[serde(default)]
    prerelease: bool,
    #[serde(default)]
    draft: bool,
    #[serde(default)]
    assets: Vec<GithubAsset>,
}

#[derive(Debug, Deserialize)]
struct GithubAsset {
    name: String,
    #[serde(default)]
    size: u64,
    browser_download_url: String,
}

impl From<GithubRelease> for Release {
    fn from(release: GithubRelease) -> Self {
        Self {
            tag: release.tag_name,
            pre_release: release.prerelease,
            draft: release.draft,
            assets: release
                .assets
                .into_iter()
                .map(|asset| Asset {
                    name: asset.name,
                    size: asset.size,
                    url: asset.browser_download_url,
                })
                .collect(),
        }
    }
}

/// Releases of one GitHub repository.
#[derive(Debug, Clone)]
pub struct GithubReleases {
    client: Client,
    api_url: String,
    repository: String,
}

impl GithubReleases {
    /// `repository` is `owner/name`; `api_url` allows GitHub Enterprise or a
    /// local mock.
    #[must_use]
    pub fn new(api_url: impl Into<String>, repository: impl Into<String>) -> Self {
        Self {
            client: global_client().clone(),
            api_url: api_url.into(),
            repository: repository.into(),
        }
    }

    /// URL of the release listing.
    #[must_use]
    pub fn releases_url(&self) -> String {
        format!(
            "{}/repos/{}/releases?per_page=100",
            self.api_url.trim_end_matches('/'),
            self.repository.trim_matches('/')
        )
    }

    /// Reads every page of the listing, following `Link: rel="next"`.
    async fn fetch(&self) -> UpdateResult<Vec<Release>> {
        let mut releases = Vec::new();
        let mut next = Some(self.releases_url());

        while let Some(url) = next {
            let (page, following) = self.fetch_page(url).await?;
            releases.extend(page.into_iter().map(Release::from));
            next = following;
        }

        debug!(count = releases.len(), "release index read");
        Ok(releases)
    }

    async fn fetch_page(&self, url: String) -> UpdateResult<(Vec<GithubRelease>, Option<String>)> {
        debug!(%url, "querying release index");

        let response = self
            .client
            .get(&url)
            .header(ACCEPT, "application/vnd.github+json")
            .send()
            .await
            .map_err(ResolveError::Request)?;

        let status = response.status();
        if !status.is_success() {
            return Err(ResolveError::Http {
                status: status.as_u16(),
                url,
            }
            .into());
        }

        let next = next_page(response.headers());
        let body = response.text().await.map_err(ResolveError::Request)?;
        let page = serde_json::from_str(&body).map_err(|e| ResolveError::Index {
            message: e.to_string(),
        })?;

        Ok((page, next))
    }
}

/// Target of the `rel="next"` entry of a `Link` header.
fn next_page(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(LINK)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(','))
        .find_map(|link| {
            let (target, params) = link.trim().split_once(';')?;
            let is_next = params
                .split(';')
                .any(|param| matches!(param.trim(), "rel=\"next\"" | "rel=next"));
            is_next.then(|| target.trim().trim_start_matches('<').trim_end_matches('>').to_string())
        })
}

impl ReleaseSource for GithubReleases {
    fn releases(&self) -> BoxFuture<'_, UpdateResult<Vec<Release>>> {
        self.fetch().boxed()
    }
}
