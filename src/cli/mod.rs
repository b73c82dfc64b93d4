// grit: Git checkout manager with a self-update engine
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! CLI module for grit using clap derive.
//!
//! # Command Structure
//!
//! ```text
//! grit [global options] <command>
//! version
//! self-update [--pre-release] [--force] [--timeout SECS]
//! clone <slug-or-url> [--source NAME] [--target DIR | --golang]
//! config show
//! ```

pub mod clone;
pub mod global;
pub mod self_update;


use crate::cli::clone::CloneArgs;
use crate::cli::global::GlobalOptions;
use crate::cli::self_update::SelfUpdateArgs;
use clap::{Args, Parser, Subcommand};

/// Git checkout manager.
///
/// Keeps local clones of remote repositories in a predictable layout, and
/// keeps itself up to date.
#[derive(Debug, Parser)]
#[command(
    name = "grit",
    author,
    version,
    about = "Keeps local checkouts of remote git repositories organised",
    long_about = "grit Copyright (C) 2026 Romeo Ahmed\n\
                  This program comes with ABSOLUTELY NO WARRANTY\n\
                  This is free software, and you are welcome to redistribute it\n\
                  under certain conditions; see LICENSE for details.\n\n\
                  Keeps local checkouts of remote git repositories organised.\n\n\
                  `grit clone owner/name` finds the repository on one of the\n\
                  configured sources and clones it under <root>/<host>/owner/name.\n\
                  `grit self-update` replaces the running executable with the\n\
                  latest published release.",
    after_help = "CONFIG FILE:\n\n\
                  By default, grit reads ~/.grit.toml if it exists. --config\n\
                  replaces it with another file, which must exist. Environment\n\
                  variables of the form GRIT_<SECTION>__<KEY> override both,\n\
                  e.g. GRIT_UPDATE__TIMEOUT=30."
)]
pub struct Cli {
    /// Global options shared by all commands
    #[command(flatten)]
    pub global: GlobalOptions,

    /// Command to execute
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Shows the version.
    #[command(visible_alias = "-v")]
    Version,

    /// Replaces grit with the latest published release.
    #[command(name = "self-update")]
    SelfUpdate(SelfUpdateArgs),

    /// Clones a repository into its place under the clone root.
    Clone(CloneArgs),

    /// Inspects the configuration.
    Config(ConfigArgs),
}

/// Arguments for the `config` command.
#[derive(Debug, Clone, Args)]
pub struct ConfigArgs {
    /// Config subcommand.
    #[command(subcommand)]
    pub subcommand: ConfigSubcommand,
}

/// Config subcommands.
#[derive(Debug, Clone, Subcommand)]
pub enum ConfigSubcommand {
    /// Prints the config file in use and the effective configuration.
    Show,
}

/// Parses command-line arguments.
#[must_use]
pub fn parse() -> Cli {
    Cli::parse()
}

/// Parses command-line arguments from an iterator.
pub fn parse_from<I, T>(iter: I) -> Cli
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    Cli::parse_from(iter)
}

/// Tries to parse command-line arguments, returning an error on failure.
///
/// # Errors
///
/// Returns a `clap::Error` if the arguments are invalid or if help/version information
/// was requested.
pub fn try_parse() -> Result<Cli, clap::Error> {
    Cli::try_parse()
}
