// git-clone-rs: Git repository sync for Kubernetes init containers
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Checkout command arguments.
//!
//! ```text
//! checkout <URL>
//!   -p/--path            [checkout] path
//!   -U/--username        GIT_USER      [checkout] username
//!   -t/--token           GIT_TOKEN
//!   -r/--rev             GIT_REVISION  [checkout] revision
//!   --clean-remotes      [checkout] clean_remotes
//!   --clean-workspace    [checkout] clean_workspace
//!   --bare               [checkout] bare
//!   --no-inspect         [checkout] inspect = false
//! ```
//!
//! Every option left unset falls back to the configuration file value.

use clap::{Args, ValueEnum};
use std::path::PathBuf;

/// How the sync result is reported on stdout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Log line only.
    #[default]
    Text,
    /// Log line plus the result as JSON on stdout.
    Json,
}

/// Arguments for the `checkout` command.
#[derive(Clone, Args)]
pub struct CheckoutArgs {
    /// Repository URL (https://, http://, ssh://, scp-style or local path).
    #[arg(value_name = "URL")]
    pub url: String,

    /// Target path [default: .]
    #[arg(short = 'p', long, value_name = "DIR")]
    pub path: Option<PathBuf>,

    /// Basic auth username [default: __token__]
    #[arg(short = 'U', long, value_name = "USER", env = "GIT_USER")]
    pub username: Option<String>,

    /// Basic auth token or password; empty means anonymous.
    #[arg(
        short = 't',
        long,
        value_name = "TOKEN",
        env = "GIT_TOKEN",
        hide_env_values = true
    )]
    pub token: Option<String>,

    /// Revision: branch, tag, commit or full reference [default: main]
    #[arg(short = 'r', long = "rev", value_name = "REV", env = "GIT_REVISION")]
    pub revision: Option<String>,

    /// Delete all remotes afterwards so the token does not stay on disk [default: true]
    #[arg(long = "clean-remotes", value_name = "BOOL")]
    pub clean_remotes: Option<bool>,

    /// Reset tracked files and delete untracked files before checkout.
    #[arg(
        long = "clean-workspace",
        value_name = "BOOL",
        num_args = 0..=1,
        require_equals = true,
        default_missing_value = "true"
    )]
    pub clean_workspace: Option<bool>,

    /// Clone as a bare repository.
    #[arg(
        long,
        value_name = "BOOL",
        num_args = 0..=1,
        require_equals = true,
        default_missing_value = "true"
    )]
    pub bare: Option<bool>,

    /// Result output on stdout.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub output: OutputFormat,

    /// Skip logging the uid, directory listings and mount points.
    #[arg(long = "no-inspect")]
    pub no_inspect: bool,
}

impl std::fmt::Debug for CheckoutArgs {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CheckoutArgs")
            .field("url", &self.url)
            .field("path", &self.path)
            .field("username", &self.username)
            .field("token", &self.token.as_ref().map(|_| "***"))
            .field("revision", &self.revision)
            .field("clean_remotes", &self.clean_remotes)
            .field("clean_workspace", &self.clean_workspace)
            .field("bare", &self.bare)
            .field("output", &self.output)
            .field("no_inspect", &self.no_inspect)
            .finish()
    }
}
