// grit: Git checkout manager with a self-update engine
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Configuration management for grit.
//!
//! # Configuration Hierarchy
//!
//! ```text
//! Priority (low → high)
//! 1. defaults
//! 2. ~/.grit.toml (optional) or --config FILE (required)
//! 3. GRIT_* env vars
//! ```
//!
//! # Environment Variable Mapping
//!
//! Sections and keys are separated by a double underscore so that keys
//! containing `_` stay addressable:
//!
//! ```text
//! GRIT_CLONE__ROOT=/src          → clone.root = "/src"
//! GRIT_UPDATE__API_URL=http://.. → update.api_url = "http://.."
//! GRIT_UPDATE__TIMEOUT=30        → update.timeout = 30
//! ```
//!
//! # Sources
//!
//! ```toml
//! [clone.sources]
//! work = "https://git.example.com/{{slug}}.git"
//! ```
//!
//! Entries are merged with the built-in `github` source.

pub mod loader;
pub mod paths;
pub mod types;


use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::Result;

use loader::ConfigLoader;
use types::{CloneConfig, UpdateConfig};

/// Prefix of the environment variables read by [`Config::load`].
pub const ENV_PREFIX: &str = "GRIT";

/// Complete application configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Clone settings.
    pub clone: CloneConfig,
    /// Self-update settings.
    pub update: UpdateConfig,
}

impl Config {
    /// Create a new configuration builder.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use grit::config::Config;
    ///
    /// let config = Config::builder()
    ///     .add_toml_file_optional("/home/me/.grit.toml")
    ///     .with_env_prefix("GRIT")
    ///     .build()?;
    /// # Ok::<(), anyhow::Error>(())
    /// ```
    #[must_use]
    pub fn builder() -> ConfigLoader {
        ConfigLoader::new()
    }

    /// Load configuration from a single TOML file (simple API).
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, contains invalid TOML, or
    /// does not match the `Config` structure.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::builder().add_toml_file(path).build()
    }

    /// Load configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the content is not valid TOML or does not match the
    /// `Config` structure.
    pub fn parse(content: &str) -> Result<Self> {
        Self::builder().add_toml_str(content).build()
    }

    /// Loader for the command line: `explicit` is required when given,
    /// otherwise `~/.grit.toml` is read if it exists. `GRIT_*` variables
    /// apply on top.
    #[must_use]
    pub fn loader(explicit: Option<&Path>) -> ConfigLoader {
        let loader = match explicit {
            Some(path) => ConfigLoader::new().add_toml_file(path),
            None => ConfigLoader::new().add_toml_file_optional(paths::default_config_path()),
        };
        loader.with_env_prefix(ENV_PREFIX)
    }

    /// Shorthand for `Config::loader(explicit).build()`.
    ///
    /// # Errors
    ///
    /// See [`ConfigLoader::build`].
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        Self::loader(explicit).build()
    }

    /// Expand `~` in paths and check every value.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` for a malformed endpoint template, a repository
    /// that is not `owner/name`, a non-HTTP API URL or a zero timeout.
    pub fn resolve_and_validate(&mut self) -> Result<()> {
        self.clone.resolve();
        self.clone.validate()?;
        self.update.validate()?;
        Ok(())
    }

    /// Renders the effective configuration as TOML.
    ///
    /// # Errors
    ///
    /// Returns an error if a value cannot be represented in TOML.
    pub fn to_toml(&self) -> Result<String> {
        Ok(toml::to_string(self)?)
    }
}
