// git-clone-rs: Git repository sync for Kubernetes init containers
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Configuration management.
//!
//! # Configuration Hierarchy
//!
//! ```text
//! Priority (low -> high)
//! 1. defaults
//! 2. git-clone.toml (cwd, optional)
//! 3. --config FILE (repeatable)
//! 4. GCO_* env vars
//! 5. --set section/key=value
//! 6. checkout flags and GIT_USER / GIT_TOKEN / GIT_REVISION
//! ```
//!
//! # Environment Variable Mapping
//!
//! ```text
//! GCO_CHECKOUT__REVISION=v1.2.0      -> checkout.revision = "v1.2.0"
//! GCO_CHECKOUT__CLEAN_WORKSPACE=true -> checkout.clean_workspace = true
//! GCO_LOG__LEVEL=debug               -> log.level = debug
//! ```

pub mod loader;
pub mod types;


use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{ConfigError, Result};

pub use loader::ConfigLoader;
pub use types::{CheckoutDefaults, LogSettings};

/// Default configuration file, looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "git-clone.toml";

/// Prefix of configuration environment variables.
pub const ENV_PREFIX: &str = "GCO";

/// Complete application configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub checkout: CheckoutDefaults,
    pub log: LogSettings,
}

impl Config {
    /// Create a new configuration builder.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use git_clone_rs::config::Config;
    ///
    /// let config = Config::builder()
    ///     .add_toml_file_optional("git-clone.toml")
    ///     .with_env_prefix("GCO")
    ///     .build()?;
    /// # Ok::<(), anyhow::Error>(())
    /// ```
    #[must_use]
    pub fn builder() -> ConfigLoader {
        ConfigLoader::new()
    }

    /// Load configuration from a single TOML file.
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

    /// Check values serde cannot check on its own.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` for an empty revision or username.
    pub fn validate(&self) -> std::result::Result<(), ConfigError> {
        let empty = |key: &str| ConfigError::InvalidValue {
            section: "checkout".to_string(),
            key: key.to_string(),
            message: "must not be empty".to_string(),
        };

        if self.checkout.revision.trim().is_empty() {
            return Err(empty("revision"));
        }
        if self.checkout.username.is_empty() {
            return Err(empty("username"));
        }
        Ok(())
    }
}
