// git-clone-rs: Git repository sync for Kubernetes init containers
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Configuration sections.
//!
//! ```text
//! [checkout]  defaults for `checkout` flags not given on the command line
//! [log]       console/file logging
//! ```

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::logging::{LogFormat, LogLevel};
use crate::sync::{DEFAULT_REVISION, DEFAULT_USERNAME};

/// Defaults for the `checkout` command.
///
/// There is no token field: tokens come from `--token` or `GIT_TOKEN` only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CheckoutDefaults {
    /// Target directory.
    pub path: PathBuf,
    pub username: String,
    pub revision: String,
    /// Remove all remotes after syncing.
    pub clean_remotes: bool,
    /// Reset and clean the working tree before checkout.
    pub clean_workspace: bool,
    pub bare: bool,
    /// Log uid, directory listings and mounts before syncing.
    pub inspect: bool,
}

impl Default for CheckoutDefaults {
    fn default() -> Self {
        Self {
            path: PathBuf::from("."),
            username: DEFAULT_USERNAME.to_string(),
            revision: DEFAULT_REVISION.to_string(),
            clean_remotes: true,
            clean_workspace: false,
            bare: false,
            inspect: true,
        }
    }
}

/// Logging options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LogSettings {
    /// Console log level (0-5).
    pub level: LogLevel,
    /// File log level (0-5).
    pub file_level: LogLevel,
    /// Log file; no file logging when unset.
    pub file: Option<PathBuf>,
    pub format: LogFormat,
    /// ANSI colors on the console.
    pub color: bool,
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            level: LogLevel::INFO,
            file_level: LogLevel::TRACE,
            file: None,
            format: LogFormat::Text,
            color: true,
        }
    }
}
