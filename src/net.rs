// grit: Git checkout manager with a self-update engine
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! HTTP plumbing for the self-update engine.
//!
//! ```text
//! global_client()   OnceLock, connection pool, keep-alive
//!        |
//!        v
//! HttpFetcher  --impl ByteFetcher-->  bytes_stream()
//!
//! TerminalProgress  --impl ProgressSink-->
//!     Bar      downloading version 2.0.0 [=====>    ] 5MB/10MB
//!     Spinner  downloading version 2.0.0 * 5MB  (size unknown)
//! ```

use std::sync::OnceLock;

use futures_util::future::BoxFuture;
use futures_util::{FutureExt, StreamExt, TryStreamExt};
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use reqwest::Client;
use reqwest::header::ACCEPT;
use semver::Version;

use crate::error::{UpdateError, UpdateResult};
use crate::update::download::{ByteFetcher, FetchResponse, ProgressSink};
use crate::update::release::Asset;

/// Global HTTP client, initialized once and shared by every request.
/// Falls back to a basic client if custom configuration fails.
pub(crate) fn global_client() -> &'static Client {
    static CLIENT: OnceLock<Client> = OnceLock::new();
    CLIENT.get_or_init(|| {
        Client::builder()
            .user_agent(format!("grit/{}", env!("CARGO_PKG_VERSION")))
            .build()
            .unwrap_or_else(|_| Client::new())
    })
}

/// Pre-validated progress bar style for known sizes.
fn bar_style() -> ProgressStyle {
    static STYLE: OnceLock<ProgressStyle> = OnceLock::new();
    STYLE
        .get_or_init(|| {
            ProgressStyle::with_template(
                "{msg} [{wide_bar:.cyan/blue}] {bytes}/{total_bytes} @ {binary_bytes_per_sec} ({eta})",
            )
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("#>-")
        })
        .clone()
}

/// Pre-validated spinner style for unknown sizes.
fn spinner_style() -> ProgressStyle {
    static STYLE: OnceLock<ProgressStyle> = OnceLock::new();
    STYLE
        .get_or_init(|| {
            ProgressStyle::with_template("{spinner:.green} {msg} {bytes} @ {binary_bytes_per_sec}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner())
                .tick_chars("⠁⠂⠄⡀⢀⠠⠐⠈ ")
        })
        .clone()
}

/// Streams response bodies with reqwest.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl Default for HttpFetcher {
    fn default() -> Self {
        Self::new()
    }
}

impl HttpFetcher {
    #[must_use]
    pub fn new() -> Self {
        Self {
            client: global_client().clone(),
        }
    }

    async fn open(&self, url: &str) -> UpdateResult<FetchResponse> {
        let response = self
            .client
            .get(url)
            .header(ACCEPT, "application/octet-stream")
            .send()
            .await
            .map_err(|e| UpdateError::download(url, e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(UpdateError::download(
                url,
                format!("http {}", status.as_u16()),
            ));
        }

        let content_length = response.content_length();
        let owned_url = url.to_string();
        let chunks = response
            .bytes_stream()
            .map_err(move |e| UpdateError::download(&owned_url, e.to_string()))
            .boxed();

        Ok(FetchResponse {
            content_length,
            chunks,
        })
    }
}

impl ByteFetcher for HttpFetcher {
    fn fetch<'a>(&'a self, url: &'a str) -> BoxFuture<'a, UpdateResult<FetchResponse>> {
        self.open(url).boxed()
    }
}

/// Progress bar drawn to stdout.
///
/// Created lazily in `on_start`; a spinner replaces the bar when the total
/// size is unknown.
#[derive(Debug, Default)]
pub struct TerminalProgress {
    bar: OnceLock<ProgressBar>,
    hidden: bool,
}

impl TerminalProgress {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A sink that tracks progress without drawing anything.
    #[must_use]
    pub fn hidden() -> Self {
        Self {
            bar: OnceLock::new(),
            hidden: true,
        }
    }

    fn draw_target(&self) -> ProgressDrawTarget {
        if self.hidden {
            ProgressDrawTarget::hidden()
        } else {
            ProgressDrawTarget::stdout()
        }
    }
}

impl ProgressSink for TerminalProgress {
    fn on_start(&self, version: &Version, asset: &Asset) {
        let bar = if asset.size == 0 {
            let pb = ProgressBar::with_draw_target(None, self.draw_target());
            pb.set_style(spinner_style());
            pb
        } else {
            let pb = ProgressBar::with_draw_target(Some(asset.size), self.draw_target());
            pb.set_style(bar_style());
            pb
        };
        bar.set_message(format!("downloading version {version}"));
        let _ = self.bar.set(bar);
    }

    fn on_progress(&self, received: u64, total: u64) {
        if let Some(pb) = self.bar.get() {
            if total != 0 && pb.length() != Some(total) {
                pb.set_length(total);
                pb.set_style(bar_style());
            }
            pb.set_position(received);
        }
    }

    fn on_finish(&self) {
        if let Some(pb) = self.bar.get() {
            pb.finish_and_clear();
        }
    }
}

