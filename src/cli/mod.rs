// git-clone-rs: Git repository sync for Kubernetes init containers
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! CLI module using clap derive.
//!
//! # Command Structure
//!
//! ```text
//! git-clone-operator [global options] <command>
//! checkout <URL> [-p DIR] [-U USER] [-t TOKEN] [-r REV] ...
//! version
//! ```

pub mod checkout;
pub mod global;


use crate::cli::checkout::CheckoutArgs;
use crate::cli::global::GlobalOptions;
use clap::{Parser, Subcommand};

/// Keeps a directory in sync with a remote git repository.
#[derive(Debug, Parser)]
#[command(
    name = "git-clone-operator",
    author,
    version,
    about = "Clone or update a git repository at a given revision",
    long_about = "git-clone-rs Copyright (C) 2026 Romeo Ahmed\n\
                  This program comes with ABSOLUTELY NO WARRANTY\n\
                  This is free software, and you are welcome to redistribute it\n\
                  under certain conditions; see LICENSE for details.\n\n\
                  Clones a repository into an empty path, or fetches and checks out\n\
                  the requested revision in an existing one. Meant to run as an\n\
                  init container in front of the application that uses the files.",
    after_help = "CONFIG FILES:\n\n\
                  `git-clone.toml` in the working directory is loaded if present\n\
                  (disable with --no-default-config). Files given with --config\n\
                  are loaded after it, in order. GCO_SECTION__KEY environment\n\
                  variables and --set overrides come last."
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
    Version,

    /// Clones or updates a repository.
    Checkout(CheckoutArgs),
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
