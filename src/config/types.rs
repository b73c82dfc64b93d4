// grit: Git checkout manager with a self-update engine
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Configuration sections.
//!
//! ```text
//! Config
//!   clone   root, sources (name -> endpoint template)
//!   update  repository, api_url, timeout
//! ```

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::Duration;

use super::paths::{default_clone_root, expand_home};
use crate::endpoint::EndpointTemplate;
use crate::error::ConfigError;
use crate::update::DEFAULT_TIMEOUT;
use crate::update::github::DEFAULT_API_URL;

/// Name of the source configured out of the box.
pub const DEFAULT_SOURCE_NAME: &str = "github";

/// Template of the source configured out of the box.
pub const DEFAULT_SOURCE_TEMPLATE: &str = "git@github.com:{{slug}}.git";

/// Repository whose releases feed `grit self-update`.
pub const DEFAULT_UPDATE_REPOSITORY: &str = "jmalloc/grit";

/// Settings for `grit clone`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CloneConfig {
    /// Directory under which clones are laid out as `host/owner/name`.
    pub root: PathBuf,
    /// Named endpoint templates, tried in name order when probing.
    pub sources: BTreeMap<String, EndpointTemplate>,
}

impl Default for CloneConfig {
    fn default() -> Self {
        Self {
            root: default_clone_root(),
            sources: BTreeMap::from([(
                DEFAULT_SOURCE_NAME.to_string(),
                EndpointTemplate::new(DEFAULT_SOURCE_TEMPLATE),
            )]),
        }
    }
}

impl CloneConfig {
    /// Looks up a source by name.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` naming the known sources when
    /// `name` is not configured.
    pub fn source(&self, name: &str) -> Result<&EndpointTemplate, ConfigError> {
        self.sources.get(name).ok_or_else(|| {
            let known = self.sources.keys().cloned().collect::<Vec<_>>().join(", ");
            ConfigError::InvalidValue {
                section: "clone.sources".to_string(),
                key: name.to_string(),
                message: format!("unknown source, expected one of: {known}"),
            }
        })
    }

    pub(super) fn resolve(&mut self) {
        self.root = expand_home(&self.root);
    }

    pub(super) fn validate(&self) -> Result<(), ConfigError> {
        if self.sources.is_empty() {
            return Err(ConfigError::MissingKey {
                section: "clone".to_string(),
                key: "sources".to_string(),
            });
        }

        for (name, template) in &self.sources {
            template
                .validate()
                .map_err(|e| ConfigError::InvalidValue {
                    section: "clone.sources".to_string(),
                    key: name.clone(),
                    message: e.to_string(),
                })?;
        }

        Ok(())
    }
}

/// Settings for `grit self-update`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct UpdateConfig {
    /// GitHub repository (`owner/name`) that publishes grit releases.
    pub repository: String,
    /// Base URL of the GitHub REST API.
    pub api_url: String,
    /// Deadline in seconds for everything before the swap.
    pub timeout: u64,
}

impl Default for UpdateConfig {
    fn default() -> Self {
        Self {
            repository: DEFAULT_UPDATE_REPOSITORY.to_string(),
            api_url: DEFAULT_API_URL.to_string(),
            timeout: DEFAULT_TIMEOUT.as_secs(),
        }
    }
}

impl UpdateConfig {
    /// The configured deadline.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout)
    }

    pub(super) fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |key: &str, message: String| ConfigError::InvalidValue {
            section: "update".to_string(),
            key: key.to_string(),
            message,
        };

        match self.repository.split_once('/') {
            Some((owner, name)) if !owner.is_empty() && !name.is_empty() && !name.contains('/') => {}
            _ => {
                return Err(invalid(
                    "repository",
                    format!("expected 'owner/name', got '{}'", self.repository),
                ));
            }
        }

        if !self.api_url.starts_with("http://") && !self.api_url.starts_with("https://") {
            return Err(invalid(
                "api_url",
                format!("expected an http(s) URL, got '{}'", self.api_url),
            ));
        }

        if self.timeout == 0 {
            return Err(invalid("timeout", "must be at least 1 second".to_string()));
        }

        Ok(())
    }
}
