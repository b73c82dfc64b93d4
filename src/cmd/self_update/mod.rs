// grit: Git checkout manager with a self-update engine
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Self-update command implementation.
//!
//! ```text
//! GithubReleases(update.api_url, update.repository)
//! HttpFetcher, TerminalProgress
//! Ctrl-C --> CancellationToken
//!        |
//!        v
//! Updater::run --> "upgraded from version 1.0.0 to 1.1.0"
//! ```

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::cli::self_update::SelfUpdateArgs;
use crate::config::Config;
use crate::config::types::UpdateConfig;
use crate::error::Result;
use crate::net::{HttpFetcher, TerminalProgress};
use crate::update::github::GithubReleases;
use crate::update::version::running_version;
use crate::update::{UpdateOptions, Updater};

/// Main handler for the self-update command.
///
/// # Errors
///
/// Returns an error if the executable cannot be located or the update fails.
/// Only a fatal swap failure leaves the executable missing; its message
/// names the backup to restore.
pub async fn run_self_update_command(args: &SelfUpdateArgs, config: &Config) -> Result<()> {
    let options = update_options(args, &config.update);
    let source = GithubReleases::new(&config.update.api_url, &config.update.repository);
    let fetcher = HttpFetcher::new();
    let running = running_version()?;
    let current_exe = current_exe()?;
    debug!(
        exe = %current_exe.display(),
        running = %running,
        repository = %config.update.repository,
        "starting self-update"
    );

    let cancel = CancellationToken::new();
    let watcher = {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                cancel.cancel();
            }
        })
    };

    let updater = Updater::builder()
        .source(&source)
        .fetcher(&fetcher)
        .running(running)
        .current_exe(current_exe)
        .cancel(cancel)
        .build();

    println!("searching for the latest release");
    let outcome = updater.run(&options, &TerminalProgress::new()).await;
    watcher.abort();

    println!("{}", outcome?);
    Ok(())
}

/// Options for one run: `--timeout` wins over `update.timeout`.
#[must_use]
pub fn update_options(args: &SelfUpdateArgs, config: &UpdateConfig) -> UpdateOptions {
    UpdateOptions {
        allow_pre_release: args.pre_release,
        force: args.force,
        timeout: args
            .timeout
            .map_or_else(|| config.timeout(), Duration::from_secs),
    }
}

/// Absolute path of the running executable with symlinks resolved, so the
/// swap replaces the real file rather than a link to it.
fn current_exe() -> Result<PathBuf> {
    let exe = std::env::current_exe().context("failed to locate the running executable")?;
    exe.canonicalize()
        .with_context(|| format!("failed to resolve {}", exe.display()))
}
