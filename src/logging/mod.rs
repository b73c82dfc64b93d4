// grit: Git checkout manager with a self-update engine
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Logging setup on top of `tracing`.
//!
//! ```text
//! init_logging(&LogConfig)
//!   registry
//!   +-- stderr layer      console_level, no timestamps
//!   +-- file layer        file_level, plain text (only with --log-file)
//!          |
//!          v
//!   LogGuard  flushes the file writer on drop
//! ```
//!
//! Levels `0..=5` filter grit's own events and keep dependencies at `warn`.
//! Level 6 (`dump`) lets `reqwest`/`hyper` through as well.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use anyhow::Context;
use bon::Builder;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{
    EnvFilter, Layer, Registry, fmt as tfmt, layer::SubscriberExt, util::SubscriberInitExt,
};

use crate::error::Result;

/// Verbosity, given on the command line as `0..=6` or by name.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    Silent,
    Error,
    #[default]
    Warn,
    Info,
    Debug,
    Trace,
    /// Trace, dependencies included.
    Dump,
}

impl LogLevel {
    const ALL: [Self; 7] = [
        Self::Silent,
        Self::Error,
        Self::Warn,
        Self::Info,
        Self::Debug,
        Self::Trace,
        Self::Dump,
    ];

    const fn name(self) -> &'static str {
        match self {
            Self::Silent => "silent",
            Self::Error => "error",
            Self::Warn => "warn",
            Self::Info => "info",
            Self::Debug => "debug",
            Self::Trace => "trace",
            Self::Dump => "dump",
        }
    }

    /// `EnvFilter` directives for this level.
    #[must_use]
    pub const fn directives(self) -> &'static str {
        match self {
            Self::Silent => "off",
            Self::Error => "error",
            Self::Warn => "warn",
            Self::Info => "warn,grit=info",
            Self::Debug => "warn,grit=debug",
            Self::Trace => "warn,grit=trace",
            Self::Dump => "trace",
        }
    }

    fn filter(self) -> EnvFilter {
        EnvFilter::new(self.directives())
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let s = s.trim();
        let by_number = s
            .parse::<usize>()
            .ok()
            .and_then(|n| Self::ALL.get(n).copied());
        by_number
            .or_else(|| {
                Self::ALL
                    .into_iter()
                    .find(|level| level.name().eq_ignore_ascii_case(s))
            })
            .ok_or_else(|| {
                let names: Vec<_> = Self::ALL.iter().map(|level| level.name()).collect();
                format!(
                    "unknown log level '{s}', expected 0-6 or one of: {}",
                    names.join(", ")
                )
            })
    }
}

/// What [`init_logging`] installs.
#[derive(Debug, Clone, Default, Builder)]
pub struct LogConfig {
    #[builder(default)]
    console_level: LogLevel,
    /// Falls back to `console_level`.
    file_level: Option<LogLevel>,
    #[builder(into)]
    log_file: Option<PathBuf>,
}

impl LogConfig {
    #[must_use]
    pub const fn console_level(&self) -> LogLevel {
        self.console_level
    }

    #[must_use]
    pub fn file_level(&self) -> LogLevel {
        self.file_level.unwrap_or(self.console_level)
    }

    #[must_use]
    pub fn log_file(&self) -> Option<&Path> {
        self.log_file.as_deref()
    }
}

/// Keeps the file writer alive; pending lines are flushed on drop.
pub struct LogGuard {
    _file: Option<WorkerGuard>,
}

/// Installs the global subscriber.
///
/// # Errors
///
/// Returns an error if the log file or its directory cannot be created.
pub fn init_logging(config: &LogConfig) -> Result<LogGuard> {
    let console = tfmt::layer()
        .with_writer(std::io::stderr)
        .without_time()
        .with_target(false)
        .with_filter(config.console_level().filter());

    let (file, guard) = match config.log_file() {
        Some(path) => {
            let (layer, guard) = file_layer(path, config.file_level())?;
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry().with(file).with(console).init();

    Ok(LogGuard { _file: guard })
}

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

fn file_layer(path: &Path, level: LogLevel) -> Result<(BoxedLayer, WorkerGuard)> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("failed to create log directory {}", dir.display()))?;
    }
    let file = std::fs::File::create(path)
        .with_context(|| format!("failed to create log file {}", path.display()))?;
    let (writer, guard) = tracing_appender::non_blocking(file);

    let layer = tfmt::layer()
        .with_writer(writer)
        .with_ansi(false)
        .with_filter(level.filter())
        .boxed();
    Ok((layer, guard))
}
