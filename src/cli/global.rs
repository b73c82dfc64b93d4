// grit: Git checkout manager with a self-update engine
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Global CLI options available for all commands.
//!
//! ```text
//! --config FILE      ← replaces ~/.grit.toml (must exist)
//! --log-level N      ← Console verbosity (0-6 or a name)
//! --file-log-level   ← File verbosity (defaults to --log-level)
//! --log-file FILE    ← Enables the file log
//!
//! Precedence: GRIT_* env > --config / ~/.grit.toml > defaults
//! ```

use clap::Args;
use std::path::PathBuf;

use crate::logging::{LogConfig, LogLevel};

/// Global options available for all commands.
#[derive(Debug, Clone, Default, Args)]
pub struct GlobalOptions {
    /// Configuration file to load instead of ~/.grit.toml.
    #[arg(short = 'c', long = "config", value_name = "FILE", global = true)]
    pub config: Option<PathBuf>,

    /// Console log level: 0-6 or silent, error, warn, info, debug, trace, dump.
    #[arg(short = 'l', long = "log-level", value_name = "LEVEL", global = true)]
    pub log_level: Option<LogLevel>,

    /// File log level, defaults to --log-level.
    #[arg(long = "file-log-level", value_name = "LEVEL", global = true)]
    pub file_log_level: Option<LogLevel>,

    /// Path to log file.
    #[arg(long = "log-file", value_name = "FILE", global = true)]
    pub log_file: Option<PathBuf>,
}

impl GlobalOptions {
    /// Logging configuration for these options.
    ///
    /// The console defaults to warnings only; the file level falls back to the
    /// console level.
    #[must_use]
    pub fn log_config(&self) -> LogConfig {
        LogConfig::builder()
            .maybe_console_level(self.log_level)
            .maybe_file_level(self.file_log_level)
            .maybe_log_file(self.log_file.clone())
            .build()
    }
}
