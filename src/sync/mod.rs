// git-clone-rs: Git repository sync for Kubernetes init containers
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Repository synchronization engine.
//!
//! ```text
//!   SyncRequest --> inject_credentials --> SyncState::Entry
//!                                               |
//!                          SyncEngine::step (one state per call)
//!                                               |
//!                         +---------------------+---------------------+
//!                         v                                           v
//!                       Done                                       Failed
//!                         |                                           |
//!                  read HEAD, SyncOutcome           best-effort remote cleanup,
//!                                                    SyncError to the caller
//! ```
//!
//! The engine is configured only through [`SyncRequest`]; it reads no
//! environment variables. Reads go through [`GitQuery`], writes through
//! [`GitMutation`].

pub mod state;

use bon::Builder;
use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::error::{GitError, GitResult, SyncError};
use crate::git::backend::{GitMutation, GitQuery, GixBackend, ShellBackend};
use crate::git::credentials::inject_credentials;
use crate::git::locator::locate_repository;
use crate::git::remote::{FetchStatus, ORIGIN, RemoteCleanup, cleanup_remotes, ensure_and_fetch};
use crate::git::revision::{ResolvedRevision, resolve_revision};
use crate::git::workspace::clean_workspace;
use state::SyncState;

/// Username used when a token is given without one.
pub const DEFAULT_USERNAME: &str = "__token__";

/// Revision synced when none is given.
pub const DEFAULT_REVISION: &str = "main";

/// Reference name reported for a detached HEAD.
pub const DETACHED_HEAD: &str = "HEAD";

// --- Request ---

/// Everything one sync run needs.
#[derive(Clone, Builder)]
pub struct SyncRequest {
    /// Repository URL without credentials.
    #[builder(into, setters(name = with_remote_url))]
    remote_url: String,

    #[builder(into, setters(name = with_username), default = DEFAULT_USERNAME.to_string())]
    username: String,

    /// Empty means anonymous access.
    #[builder(into, setters(name = with_token), default)]
    token: String,

    #[builder(into, setters(name = with_target_path), default = PathBuf::from("."))]
    target_path: PathBuf,

    /// Branch, tag, commit hash or full reference name.
    #[builder(into, setters(name = with_revision), default = DEFAULT_REVISION.to_string())]
    revision: String,

    /// Reset tracked files and delete untracked ones before checkout.
    #[builder(setters(name = with_clean_workspace), default = false)]
    clean_workspace: bool,

    /// Remove every remote once the sync finished.
    #[builder(setters(name = with_cleanup_remotes_after), default = true)]
    cleanup_remotes_after: bool,

    /// Clone without a working tree.
    #[builder(setters(name = with_treat_as_bare), default = false)]
    treat_as_bare: bool,
}

impl SyncRequest {
    #[must_use]
    pub fn remote_url(&self) -> &str {
        &self.remote_url
    }

    #[must_use]
    pub fn username(&self) -> &str {
        &self.username
    }

    #[must_use]
    pub fn token(&self) -> &str {
        &self.token
    }

    #[must_use]
    pub fn target_path(&self) -> &Path {
        &self.target_path
    }

    #[must_use]
    pub fn revision(&self) -> &str {
        &self.revision
    }

    #[must_use]
    pub const fn clean_workspace(&self) -> bool {
        self.clean_workspace
    }

    #[must_use]
    pub const fn cleanup_remotes_after(&self) -> bool {
        self.cleanup_remotes_after
    }

    #[must_use]
    pub const fn treat_as_bare(&self) -> bool {
        self.treat_as_bare
    }

    /// Check required values.
    ///
    /// # Errors
    ///
    /// Returns `SyncError::ValidationFailed` naming the first missing value.
    pub fn validate(&self) -> Result<(), SyncError> {
        let missing = [
            ("url", self.remote_url.trim().is_empty()),
            ("username", self.username.is_empty()),
            ("revision", self.revision.trim().is_empty()),
            ("path", self.target_path.as_os_str().is_empty()),
        ]
        .into_iter()
        .find_map(|(name, missing)| missing.then_some(name));

        match missing {
            Some(name) => Err(SyncError::ValidationFailed {
                message: format!("{name} must not be empty"),
            }),
            None => Ok(()),
        }
    }
}

impl fmt::Debug for SyncRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SyncRequest")
            .field("remote_url", &self.remote_url)
            .field("username", &self.username)
            .field("token", &if self.token.is_empty() { "" } else { "***" })
            .field("target_path", &self.target_path)
            .field("revision", &self.revision)
            .field("clean_workspace", &self.clean_workspace)
            .field("cleanup_remotes_after", &self.cleanup_remotes_after)
            .field("treat_as_bare", &self.treat_as_bare)
            .finish()
    }
}

// --- Outcome ---

/// Where the repository ended up.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SyncResult {
    /// Full reference HEAD points at, or `HEAD` when detached.
    pub head_reference: String,
    pub head_commit: String,
}

/// Which of the two flows ran.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncFlow {
    Cloned,
    Updated,
}

/// Outcome of the fast-forward pull.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PullStatus {
    UpToDate,
    FastForwarded { from: String, to: String },
}

impl PullStatus {
    #[must_use]
    pub const fn is_up_to_date(&self) -> bool {
        matches!(self, Self::UpToDate)
    }
}

/// Full report of a successful sync.
#[derive(Debug)]
pub struct SyncOutcome {
    pub result: SyncResult,
    pub flow: SyncFlow,
    /// `None` for a fresh clone.
    pub fetch: Option<FetchStatus>,
    /// `None` unless a branch was checked out in a working tree.
    pub pull: Option<PullStatus>,
    /// `None` when remote cleanup was not requested.
    pub remotes: Option<RemoteCleanup>,
    /// Names of the states the run went through, in order.
    pub visited: Vec<&'static str>,
}

/// Mutable bookkeeping of one run.
struct SyncRun<'a> {
    request: &'a SyncRequest,
    url: String,
    bare: bool,
    repository_exists: bool,
    flow: SyncFlow,
    fetch: Option<FetchStatus>,
    pull: Option<PullStatus>,
    remotes: Option<RemoteCleanup>,
    visited: Vec<&'static str>,
}

impl SyncRun<'_> {
    fn path(&self) -> &Path {
        self.request.target_path()
    }

    /// State that follows the last content-changing step.
    const fn finishing_state(&self) -> SyncState {
        if self.request.cleanup_remotes_after {
            SyncState::RemovingRemotes
        } else {
            SyncState::Done
        }
    }
}

// --- Engine ---

/// Drives one [`SyncRequest`] through the state machine.
#[derive(Debug, Clone)]
pub struct SyncEngine<Q = GixBackend, M = ShellBackend> {
    query: Q,
    git: M,
}

impl SyncEngine {
    /// Engine with the gix reader and the git CLI found on `PATH`.
    ///
    /// # Errors
    ///
    /// Returns `GitError::GitNotFound` if `git` is not installed.
    pub fn new() -> GitResult<Self> {
        Ok(Self::with_backends(GixBackend, ShellBackend::new()?))
    }
}

impl<Q: GitQuery, M: GitMutation> SyncEngine<Q, M> {
    pub const fn with_backends(query: Q, git: M) -> Self {
        Self { query, git }
    }

    /// Bring `request.target_path` to `request.revision`.
    ///
    /// Once a repository exists on disk, a failure still triggers remote
    /// cleanup (if requested) before the error is returned.
    ///
    /// # Errors
    ///
    /// Returns the `SyncError` of the first failing stage.
    pub fn sync(&self, request: &SyncRequest) -> Result<SyncOutcome, SyncError> {
        request.validate()?;
        let url = inject_credentials(request.remote_url(), request.username(), request.token())?;

        let mut run = SyncRun {
            request,
            url,
            bare: request.treat_as_bare(),
            repository_exists: false,
            flow: SyncFlow::Cloned,
            fetch: None,
            pull: None,
            remotes: None,
            visited: Vec::new(),
        };

        let mut state = SyncState::Entry;
        while !state.is_terminal() {
            run.visited.push(state.name());
            debug!(state = %state, "sync step");
            state = self
                .step(&mut run, state)
                .unwrap_or_else(SyncState::Failed);
        }
        run.visited.push(state.name());

        match state {
            SyncState::Failed(error) => Err(self.abort(&run, error)),
            _ => self.finish(run),
        }
    }

    /// Execute `state` and return its successor.
    fn step(&self, run: &mut SyncRun<'_>, state: SyncState) -> Result<SyncState, SyncError> {
        let next = match state {
            SyncState::Entry => match locate_repository(run.path()) {
                Some(layout) => {
                    info!(path = %run.path().display(), "Found existing repository");
                    SyncState::ExistingRepo(layout)
                }
                None => {
                    info!(path = %run.path().display(), "No local repository found, doing clone");
                    SyncState::NoLocalRepo
                }
            },

            SyncState::NoLocalRepo => {
                if !run.path().exists() {
                    info!(path = %run.path().display(), "Directory does not exist, creating");
                    std::fs::create_dir_all(run.path()).map_err(|source| {
                        SyncError::CloneFailed {
                            path: run.path().to_path_buf(),
                            source: Box::new(GitError::Io {
                                path: run.path().display().to_string(),
                                source,
                            }),
                        }
                    })?;
                }
                SyncState::Cloning
            }

            SyncState::Cloning => {
                info!(path = %run.path().display(), bare = run.bare, "Cloning repository");
                self.git
                    .clone_into(&run.url, run.path(), run.bare)
                    .map_err(|source| SyncError::CloneFailed {
                        path: run.path().to_path_buf(),
                        source: Box::new(source),
                    })?;
                run.repository_exists = true;
                run.flow = SyncFlow::Cloned;
                run.finishing_state()
            }

            SyncState::ExistingRepo(layout) => {
                let bare = self.query.open_repository(run.path()).map_err(|source| {
                    SyncError::OpenFailed {
                        path: run.path().to_path_buf(),
                        source: Box::new(source),
                    }
                })?;
                if bare != layout.is_bare() {
                    debug!(?layout, bare, "repository config overrides the directory layout");
                }
                if bare != run.request.treat_as_bare() {
                    debug!(bare, "existing repository layout takes precedence");
                }
                run.bare = bare;
                run.repository_exists = true;
                run.flow = SyncFlow::Updated;
                SyncState::Fetching
            }

            SyncState::Fetching => {
                let status =
                    ensure_and_fetch(&self.query, &self.git, run.path(), ORIGIN, &run.url, run.bare)?;
                run.fetch = Some(status);
                match (run.request.clean_workspace(), run.bare) {
                    (true, false) => SyncState::Cleaning,
                    (true, true) => {
                        debug!("bare repository has no workspace to clean");
                        SyncState::ResolvingRevision
                    }
                    (false, _) => SyncState::ResolvingRevision,
                }
            }

            SyncState::Cleaning => {
                clean_workspace(&self.git, run.path())?;
                SyncState::ResolvingRevision
            }

            SyncState::ResolvingRevision => SyncState::CheckingOut(resolve_revision(
                &self.query,
                run.path(),
                run.request.revision(),
            )),

            SyncState::CheckingOut(resolved) => {
                info!(revision = %resolved, "Checking out");
                self.check_out(run, &resolved)?;
                match resolved {
                    ResolvedRevision::Branch { name } if !run.bare => SyncState::Pulling(name),
                    _ => run.finishing_state(),
                }
            }

            SyncState::Pulling(branch) => {
                run.pull = Some(self.pull(run.path(), &branch)?);
                run.finishing_state()
            }

            SyncState::RemovingRemotes => {
                run.remotes = Some(cleanup_remotes(&self.query, &self.git, run.path()));
                SyncState::Done
            }

            terminal @ (SyncState::Done | SyncState::Failed(_)) => terminal,
        };
        Ok(next)
    }

    fn check_out(&self, run: &SyncRun<'_>, resolved: &ResolvedRevision) -> Result<(), SyncError> {
        let path = run.path();
        let result = match resolved {
            _ if run.bare => {
                self.git
                    .point_head(path, &resolved.reference_name(), resolved.is_branch())
            }
            ResolvedRevision::Branch { name } => {
                if self.query.reference_exists(path, &resolved.reference_name()) {
                    self.git.checkout_branch(path, name, None)
                } else {
                    let tracking = format!("refs/remotes/{ORIGIN}/{name}");
                    self.git.checkout_branch(path, name, Some(&tracking))
                }
            }
            _ => self.git.checkout_detached(path, &resolved.reference_name()),
        };

        result.map_err(|source| SyncError::CheckoutFailed {
            stage: "checkout",
            revision: run.request.revision().to_string(),
            source: Box::new(source),
        })
    }

    fn pull(&self, path: &Path, branch: &str) -> Result<PullStatus, SyncError> {
        let pull_failed = |source| SyncError::PullFailed {
            branch: branch.to_string(),
            source: Box::new(source),
        };

        let before = self.query.head(path).map_err(pull_failed)?.commit;
        info!(branch, "Pulling");
        self.git
            .pull_fast_forward(path, ORIGIN, branch)
            .map_err(pull_failed)?;
        let after = self.query.head(path).map_err(pull_failed)?.commit;

        if before == after {
            info!(branch, "Already up to date");
            Ok(PullStatus::UpToDate)
        } else {
            info!(branch, from = %before, to = %after, "Fast-forwarded");
            Ok(PullStatus::FastForwarded {
                from: before,
                to: after,
            })
        }
    }

    /// Read HEAD and assemble the outcome.
    fn finish(&self, run: SyncRun<'_>) -> Result<SyncOutcome, SyncError> {
        let head = match self.query.head(run.path()) {
            Ok(head) => head,
            Err(source) => {
                return Err(self.abort(
                    &run,
                    SyncError::OpenFailed {
                        path: run.path().to_path_buf(),
                        source: Box::new(source),
                    },
                ));
            }
        };

        Ok(SyncOutcome {
            result: SyncResult {
                head_reference: head
                    .reference
                    .unwrap_or_else(|| DETACHED_HEAD.to_string()),
                head_commit: head.commit,
            },
            flow: run.flow,
            fetch: run.fetch,
            pull: run.pull,
            remotes: run.remotes,
            visited: run.visited,
        })
    }

    /// Remove remotes after a failure, then hand the error back.
    fn abort(&self, run: &SyncRun<'_>, error: SyncError) -> SyncError {
        warn!(kind = error.kind(), error = %error, "sync failed");
        if run.repository_exists && run.request.cleanup_remotes_after() && run.remotes.is_none() {
            let cleanup = cleanup_remotes(&self.query, &self.git, run.path());
            debug!(
                removed = cleanup.removed.len(),
                failed = cleanup.failed.len(),
                "removed remotes after failure"
            );
        }
        error
    }
}
