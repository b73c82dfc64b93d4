// grit: Git checkout manager with a self-update engine
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Config-related commands for grit.

use std::path::Path;

use crate::cli::{ConfigArgs, ConfigSubcommand};
use crate::config::Config;
use crate::error::Result;

/// Run the config command.
///
/// `file` is the config file that was read, or the default location when
/// none was found.
///
/// # Errors
///
/// Returns an error if the configuration cannot be rendered as TOML.
pub fn run_config_command(args: &ConfigArgs, config: &Config, file: &Path) -> Result<()> {
    match args.subcommand {
        ConfigSubcommand::Show => {
            print!("{}", render_show(config, file)?);
            Ok(())
        }
    }
}

fn render_show(config: &Config, file: &Path) -> Result<String> {
    let note = if file.exists() { "" } else { " (not found, using defaults)" };
    Ok(format!(
        "Config file: {}{note}\n\n{}",
        file.display(),
        config.to_toml()?
    ))
}
