// git-clone-rs: Git repository sync for Kubernetes init containers
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! States of a single sync run.
//!
//! ```text
//! Entry --+--> NoLocalRepo --> Cloning ----------------------------+
//!         |                                                        |
//!         +--> ExistingRepo --> Fetching --> [Cleaning] -->        |
//!              ResolvingRevision --> CheckingOut --> [Pulling] --+ |
//!                                                                v v
//!                                            [RemovingRemotes] --> Done
//!
//! any step error --> Failed
//! ```

use std::fmt;

use crate::error::SyncError;
use crate::git::locator::RepositoryLayout;
use crate::git::revision::ResolvedRevision;

/// One state of the sync state machine.
///
/// States that need data from the previous step carry it.
#[derive(Debug)]
pub enum SyncState {
    Entry,
    NoLocalRepo,
    ExistingRepo(RepositoryLayout),
    Cloning,
    Fetching,
    Cleaning,
    ResolvingRevision,
    CheckingOut(ResolvedRevision),
    /// Fast-forward of the named branch.
    Pulling(String),
    RemovingRemotes,
    Done,
    Failed(SyncError),
}

impl SyncState {
    /// Stable state name, used in logs and in [`SyncOutcome::visited`].
    ///
    /// [`SyncOutcome::visited`]: super::SyncOutcome::visited
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Entry => "Entry",
            Self::NoLocalRepo => "NoLocalRepo",
            Self::ExistingRepo(_) => "ExistingRepo",
            Self::Cloning => "Cloning",
            Self::Fetching => "Fetching",
            Self::Cleaning => "Cleaning",
            Self::ResolvingRevision => "ResolvingRevision",
            Self::CheckingOut(_) => "CheckingOut",
            Self::Pulling(_) => "Pulling",
            Self::RemovingRemotes => "RemovingRemotes",
            Self::Done => "Done",
            Self::Failed(_) => "Failed",
        }
    }

    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Done | Self::Failed(_))
    }
}

impl fmt::Display for SyncState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ExistingRepo(layout) => write!(f, "ExistingRepo({layout:?})"),
            Self::CheckingOut(revision) => write!(f, "CheckingOut({revision})"),
            Self::Pulling(branch) => write!(f, "Pulling({branch})"),
            Self::Failed(error) => write!(f, "Failed({})", error.kind()),
            other => f.write_str(other.name()),
        }
    }
}
