// grit: Git checkout manager with a self-update engine
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Layered configuration loading.
//!
//! ```text
//! built-in [clone.sources] github
//!   < TOML file (required or optional)
//!   < TOML strings
//!   < <PREFIX>_<SECTION>__<KEY> environment variables
//!        |
//!        v
//!    build() --> Config (home expanded, validated)
//! ```

use std::path::{Path, PathBuf};

use config::builder::DefaultState;
use config::{ConfigBuilder, Environment, File, FileFormat};

use super::Config;
use super::types::{DEFAULT_SOURCE_NAME, DEFAULT_SOURCE_TEMPLATE};
use crate::error::Result;

/// Collects configuration sources; later sources win.
pub struct ConfigLoader {
    builder: ConfigBuilder<DefaultState>,
    env_prefix: Option<String>,
    file: Option<PathBuf>,
}

impl ConfigLoader {
    /// A loader holding only the built-in `github` source, so that
    /// `[clone.sources]` tables add to it instead of replacing it.
    #[must_use]
    pub fn new() -> Self {
        let defaults =
            format!("[clone.sources]\n{DEFAULT_SOURCE_NAME} = \"{DEFAULT_SOURCE_TEMPLATE}\"\n");
        Self {
            builder: config::Config::builder().add_source(File::from_str(&defaults, FileFormat::Toml)),
            env_prefix: None,
            file: None,
        }
    }

    /// Reads `path` on [`build`](Self::build); a missing file is an error.
    #[must_use]
    pub fn add_toml_file(self, path: impl AsRef<Path>) -> Self {
        self.add_file(path.as_ref(), true)
    }

    /// Like [`add_toml_file`](Self::add_toml_file), but a missing file is
    /// skipped.
    #[must_use]
    pub fn add_toml_file_optional(self, path: impl AsRef<Path>) -> Self {
        self.add_file(path.as_ref(), false)
    }

    fn add_file(mut self, path: &Path, required: bool) -> Self {
        self.builder = self.builder.add_source(
            File::from(path)
                .format(FileFormat::Toml)
                .required(required),
        );
        if required || path.exists() {
            self.file = Some(path.to_path_buf());
        }
        self
    }

    #[must_use]
    pub fn add_toml_str(mut self, content: &str) -> Self {
        self.builder = self
            .builder
            .add_source(File::from_str(content, FileFormat::Toml));
        self
    }

    /// Reads `<prefix>_<section>__<key>` variables last.
    #[must_use]
    pub fn with_env_prefix(mut self, prefix: &str) -> Self {
        self.env_prefix = Some(prefix.to_string());
        self
    }

    /// The file that supplies values, if any was added and found.
    #[must_use]
    pub fn file_in_use(&self) -> Option<&Path> {
        self.file.as_deref()
    }

    /// Merges every source into a [`Config`].
    ///
    /// # Errors
    ///
    /// Returns an error if a required file is missing, a file is not valid
    /// TOML, a value has the wrong type or fails validation, or an unknown
    /// key is present.
    pub fn build(self) -> Result<Config> {
        let builder = match &self.env_prefix {
            Some(prefix) => self.builder.add_source(
                Environment::with_prefix(prefix)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            ),
            None => self.builder,
        };
        let mut config: Config = builder.build()?.try_deserialize()?;
        config.resolve_and_validate()?;
        Ok(config)
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}
