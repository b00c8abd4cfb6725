// git-clone-rs: Git repository sync for Kubernetes init containers
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Remote management: ensure `origin`, fetch, and remove remotes afterwards.
//!
//! ```text
//! ensure_and_fetch
//!   remote missing     -> git remote add
//!   url differs        -> git remote set-url
//!   snapshot refs      -> git fetch --tags --force -> snapshot refs
//!   compare            -> UpToDate | Updated { changed }
//!
//! cleanup_remotes
//!   for each remote    -> git remote remove
//!   failures           -> collected, logged, never fatal
//! ```

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;
use tracing::{debug, info, warn};

use crate::error::SyncError;
use crate::git::backend::{GitMutation, GitQuery};

/// Name of the single remote the engine works with.
pub const ORIGIN: &str = "origin";

/// Refspecs that mirror branches and tags into a bare repository.
pub(crate) const MIRROR_REFSPECS: [&str; 2] = ["+refs/heads/*:refs/heads/*", "+refs/tags/*:refs/tags/*"];

const REMOTES_PREFIX: &str = "refs/remotes/";

/// Outcome of a fetch, derived from the reference store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchStatus {
    /// No reference was created or moved, apart from re-created tracking refs.
    UpToDate,
    /// References that were created or moved, by full name.
    Updated { changed: Vec<String> },
}

impl FetchStatus {
    #[must_use]
    pub const fn is_up_to_date(&self) -> bool {
        matches!(self, Self::UpToDate)
    }

    /// Compare reference snapshots taken around a fetch.
    ///
    /// Remote-tracking refs deleted by an earlier remote cleanup come back on
    /// every fetch. A new `refs/remotes/` ref pointing at a commit that some
    /// ref already pointed at therefore does not count as a change. New tags
    /// and branches always do.
    fn between(before: &BTreeMap<String, String>, after: &BTreeMap<String, String>) -> Self {
        let known: BTreeSet<&str> = before.values().map(String::as_str).collect();
        let changed: Vec<String> = after
            .iter()
            .filter(|(name, id)| match before.get(*name) {
                Some(old) => old != *id,
                None => !(name.starts_with(REMOTES_PREFIX) && known.contains(id.as_str())),
            })
            .map(|(name, _)| name.clone())
            .collect();

        if changed.is_empty() {
            Self::UpToDate
        } else {
            Self::Updated { changed }
        }
    }
}

/// Aggregate result of removing every configured remote.
#[derive(Debug, Default)]
pub struct RemoteCleanup {
    pub removed: Vec<String>,
    /// `SyncError::CleanupFailed` per remote that could not be removed.
    pub failed: Vec<SyncError>,
}

impl RemoteCleanup {
    /// True when no removal failed.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Make sure `name` points at `url`, then fetch all branches and tags.
///
/// Bare repositories fetch straight into `refs/heads/*` and `refs/tags/*`.
///
/// # Errors
///
/// Returns `SyncError::FetchFailed` if the remote cannot be configured, the
/// reference store cannot be read, or the fetch itself fails.
pub fn ensure_and_fetch<Q, M>(
    query: &Q,
    git: &M,
    repo: &Path,
    name: &str,
    url: &str,
    bare: bool,
) -> Result<FetchStatus, SyncError>
where
    Q: GitQuery,
    M: GitMutation,
{
    let fetch_failed = |source| SyncError::FetchFailed {
        remote: name.to_string(),
        source: Box::new(source),
    };

    match query.remote_url(repo, name).map_err(fetch_failed)? {
        None => {
            debug!(remote = name, "adding remote");
            git.add_remote(repo, name, url).map_err(fetch_failed)?;
        }
        Some(current) if current != url => {
            debug!(remote = name, "updating remote url");
            git.set_remote_url(repo, name, url).map_err(fetch_failed)?;
        }
        Some(_) => {}
    }

    let refspecs: &[&str] = if bare { &MIRROR_REFSPECS } else { &[] };

    let before = query.references(repo).map_err(fetch_failed)?;
    info!(remote = name, "Fetching from remote");
    git.fetch(repo, name, refspecs).map_err(fetch_failed)?;
    let after = query.references(repo).map_err(fetch_failed)?;

    let status = FetchStatus::between(&before, &after);
    match &status {
        FetchStatus::UpToDate => info!(remote = name, "Already up to date"),
        FetchStatus::Updated { changed } => {
            info!(remote = name, changed = changed.len(), "Fetched new commits");
        }
    }
    Ok(status)
}

/// Remove every configured remote, continuing past failures.
///
/// A failure to list the remotes is recorded under the name `*`.
pub fn cleanup_remotes<Q, M>(query: &Q, git: &M, repo: &Path) -> RemoteCleanup
where
    Q: GitQuery,
    M: GitMutation,
{
    let mut cleanup = RemoteCleanup::default();

    let names = match query.remote_names(repo) {
        Ok(names) => names,
        Err(source) => {
            warn!(error = %source, "cannot list remotes");
            let error = SyncError::CleanupFailed {
                remote: "*".to_string(),
                source: Box::new(source),
            };
            cleanup.failed.push(error);
            return cleanup;
        }
    };

    for name in names {
        info!(remote = %name, "Removing remote");
        match git.remove_remote(repo, &name) {
            Ok(()) => cleanup.removed.push(name),
            Err(source) => {
                warn!(remote = %name, error = %source, "cannot remove remote, continuing");
                let error = SyncError::CleanupFailed {
                    remote: name,
                    source: Box::new(source),
                };
                cleanup.failed.push(error);
            }
        }
    }
    cleanup
}

#[cfg(test)]
mod tests;
