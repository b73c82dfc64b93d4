// grit: Git checkout manager with a self-update engine
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Self-update command arguments.

use clap::Args;

/// Arguments for the `self-update` command.
#[derive(Debug, Clone, Default, Args)]
pub struct SelfUpdateArgs {
    /// Consider pre-releases when looking for the latest version.
    #[arg(long = "pre-release")]
    pub pre_release: bool,

    /// Install the latest release even if it is the same as or older than
    /// the running version.
    #[arg(short = 'f', long)]
    pub force: bool,

    /// Seconds allowed for everything before the executable is replaced
    /// (default: update.timeout from the config).
    #[arg(long, value_name = "SECS", value_parser = clap::value_parser!(u64).range(1..))]
    pub timeout: Option<u64>,
}
