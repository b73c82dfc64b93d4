// grit: Git checkout manager with a self-update engine
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Clone command arguments.
//!
//! ```text
//! clone <slug-or-url>
//!   --source NAME   resolve the slug through one configured source
//!   --target DIR    clone here instead of <root>/<host>/<slug>
//!   --golang        clone under $GOPATH/src/<host>/<slug>
//! ```

use clap::Args;
use std::path::PathBuf;

/// Arguments for the `clone` command.
#[derive(Debug, Clone, Args)]
pub struct CloneArgs {
    /// Repository slug (`owner/name`) or git URL.
    #[arg(value_name = "SLUG-OR-URL")]
    pub repository: String,

    /// Resolve the slug with this source only instead of probing all of them.
    #[arg(short = 's', long = "source", value_name = "NAME")]
    pub source: Option<String>,

    /// Directory to clone into.
    #[arg(short = 't', long = "target", value_name = "DIR", conflicts_with = "golang")]
    pub target: Option<PathBuf>,

    /// Clone into the Go workspace ($GOPATH/src).
    #[arg(short = 'g', long = "golang")]
    pub golang: bool,
}
