// git-clone-rs: Git repository sync for Kubernetes init containers
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Error handling module.
//!
//! ```text
//!                 SyncError (stage-classified)
//!                         |
//!   +------+------+-------+------+------+------+------+
//!   |      |      |       |      |      |      |      |
//!   v      v      v       v      v      v      v      v
//! Invalid Valid. Open   Fetch Checkout Pull  Clone Cleanup
//!  Url    Failed Failed Failed Failed Failed Failed Failed
//!   |             \______________|______________/
//!   v                            v
//! url::ParseError         Box<GitError>
//!                   CommandFailed, Gix, GitNotFound, Io
//!
//! ConfigError   InvalidValue, MissingKey   (config + logging)
//! ```
//!
//! Library operations return typed errors; the binary layer wraps them in
//! [`anyhow`] with context and prints the whole chain.

use std::path::PathBuf;
use thiserror::Error;

/// Convenience alias for `anyhow::Result`.
pub type Result<T> = anyhow::Result<T>;

/// Result type for git backend operations.
pub type GitResult<T> = std::result::Result<T, GitError>;

// --- Sync Errors ---

/// Errors of the repository synchronization engine.
///
/// Every variant names the stage that failed and carries the underlying
/// cause as its source. Sources are boxed to keep the enum small.
#[derive(Debug, Error)]
pub enum SyncError {
    /// The remote URL could not be parsed for credential injection.
    #[error("cannot parse git url '{url}'")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    /// The request is missing a required value.
    #[error("validation failed: {message}")]
    ValidationFailed { message: String },

    /// An existing path could not be opened as a repository.
    #[error("cannot open git repository at '{}'", path.display())]
    OpenFailed {
        path: PathBuf,
        #[source]
        source: Box<GitError>,
    },

    /// Fetching from the remote failed.
    #[error("cannot fetch from remote '{remote}'")]
    FetchFailed {
        remote: String,
        #[source]
        source: Box<GitError>,
    },

    /// The revision could not be materialized in the working tree.
    #[error("cannot {stage} '{revision}'")]
    CheckoutFailed {
        stage: &'static str,
        revision: String,
        #[source]
        source: Box<GitError>,
    },

    /// Fast-forward pull failed.
    #[error("cannot pull branch '{branch}'")]
    PullFailed {
        branch: String,
        #[source]
        source: Box<GitError>,
    },

    /// Fresh clone failed, including target directory creation.
    #[error("cannot clone into '{}'", path.display())]
    CloneFailed {
        path: PathBuf,
        #[source]
        source: Box<GitError>,
    },

    /// Removing a remote failed. Collected, never fatal.
    #[error("cannot remove remote '{remote}'")]
    CleanupFailed {
        remote: String,
        #[source]
        source: Box<GitError>,
    },
}

impl SyncError {
    /// Short stable name of the error kind, used as a structured log field.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::InvalidUrl { .. } => "InvalidUrl",
            Self::ValidationFailed { .. } => "ValidationFailed",
            Self::OpenFailed { .. } => "OpenFailed",
            Self::FetchFailed { .. } => "FetchFailed",
            Self::CheckoutFailed { .. } => "CheckoutFailed",
            Self::PullFailed { .. } => "PullFailed",
            Self::CloneFailed { .. } => "CloneFailed",
            Self::CleanupFailed { .. } => "CleanupFailed",
        }
    }
}

// --- Gix Errors ---

/// Wrapper for gix-specific errors.
///
/// Large error types are boxed to keep enum size manageable.
#[derive(Debug, Error)]
pub enum GixError {
    /// Failed to open repository.
    #[error("failed to open repository: {0}")]
    Open(#[from] Box<gix::open::Error>),

    /// Failed to get HEAD reference.
    #[error("failed to get head reference: {0}")]
    Head(#[from] gix::reference::find::existing::Error),

    /// Failed to peel HEAD to a commit id.
    #[error("failed to resolve head commit: {0}")]
    HeadId(#[from] Box<gix::reference::head_id::Error>),

    /// Failed to list or read references.
    #[error("failed to read references: {0}")]
    References(Box<dyn std::error::Error + Send + Sync + 'static>),
}

// --- Git Errors ---

/// Git operation errors.
#[derive(Debug, Error)]
pub enum GitError {
    /// No `git` executable on `PATH`.
    #[error("git executable not found: {0}")]
    GitNotFound(#[from] which::Error),

    /// Git command could not be spawned.
    #[error("failed to execute git: {0}")]
    Spawn(#[source] std::io::Error),

    /// Git command execution failed.
    #[error("git command failed: {command} - {message}")]
    CommandFailed { command: String, message: String },

    /// Error from gix library.
    #[error("gix error: {0}")]
    Gix(#[from] GixError),

    /// Filesystem error around the repository.
    #[error("I/O error on '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Path cannot be passed to git as UTF-8.
    #[error("invalid path: {0}")]
    InvalidPath(String),
}

impl From<Box<gix::open::Error>> for GitError {
    fn from(err: Box<gix::open::Error>) -> Self {
        Self::Gix(GixError::Open(err))
    }
}

// --- Config Errors ---

/// Configuration-related errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Missing required configuration key.
    #[error("missing required config key '{key}' in section '[{section}]'")]
    MissingKey { section: String, key: String },

    /// Invalid configuration value.
    #[error("invalid value for '{key}' in section '[{section}]': {message}")]
    InvalidValue {
        section: String,
        key: String,
        message: String,
    },
}

#[cfg(test)]
mod tests;
