// git-clone-rs: Git repository sync for Kubernetes init containers
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Working tree reset before checkout.

use std::path::Path;
use tracing::info;

use crate::error::SyncError;
use crate::git::backend::GitMutation;

/// Stage name reported when cleaning fails.
pub const CLEAN_STAGE: &str = "clean";

/// Discard modifications to tracked files and delete untracked files and
/// directories, leaving the working tree at the current HEAD.
///
/// Ignored files are kept.
///
/// # Errors
///
/// Returns `SyncError::CheckoutFailed` with stage `clean` if either step fails.
pub fn clean_workspace<M: GitMutation>(git: &M, repo: &Path) -> Result<(), SyncError> {
    let failed = |source| SyncError::CheckoutFailed {
        stage: CLEAN_STAGE,
        revision: "HEAD".to_string(),
        source: Box::new(source),
    };

    info!(path = %repo.display(), "Cleaning up the workspace");
    git.reset_hard(repo).map_err(failed)?;
    git.remove_untracked(repo).map_err(failed)?;
    Ok(())
}
