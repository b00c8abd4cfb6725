// git-clone-rs: Git repository sync for Kubernetes init containers
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Revision classification.
//!
//! ```text
//! "refs/heads/x"      -> Branch x
//! "refs/tags/x"       -> Tag x
//! "refs/..."          -> Reference
//! refs/tags/<rev>     -> Tag        (checked first)
//! refs/heads/<rev>    -> Branch
//! origin/<rev>        -> Branch
//! anything else       -> Commit
//! ```
//!
//! A name that is both a tag and a branch resolves to the tag. Lookups run
//! against the local reference store after the fetch.

use std::fmt;
use std::path::Path;
use tracing::debug;

use crate::git::backend::GitQuery;
use crate::git::remote::ORIGIN;

/// A revision string classified by kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolvedRevision {
    Branch { name: String },
    Tag { name: String },
    Commit { hash: String },
    /// Explicit reference outside `refs/heads/` and `refs/tags/`.
    Reference { full_name: String },
}

impl ResolvedRevision {
    /// Full reference name, or the hash for commits.
    #[must_use]
    pub fn reference_name(&self) -> String {
        match self {
            Self::Branch { name } => format!("refs/heads/{name}"),
            Self::Tag { name } => format!("refs/tags/{name}"),
            Self::Commit { hash } => hash.clone(),
            Self::Reference { full_name } => full_name.clone(),
        }
    }

    #[must_use]
    pub const fn is_branch(&self) -> bool {
        matches!(self, Self::Branch { .. })
    }

    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Branch { .. } => "branch",
            Self::Tag { .. } => "tag",
            Self::Commit { .. } => "commit",
            Self::Reference { .. } => "reference",
        }
    }
}

impl fmt::Display for ResolvedRevision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Branch { name } | Self::Tag { name } => write!(f, "{} '{name}'", self.kind()),
            Self::Commit { hash } => write!(f, "commit '{hash}'"),
            Self::Reference { full_name } => write!(f, "reference '{full_name}'"),
        }
    }
}

/// Classify `revision` against the references of the repository at `repo`.
///
/// Never fails: a reference that cannot be looked up counts as missing, so
/// unknown names fall through to [`ResolvedRevision::Commit`] and surface as
/// a checkout failure.
pub fn resolve_revision<Q: GitQuery>(query: &Q, repo: &Path, revision: &str) -> ResolvedRevision {
    let resolved = classify(query, repo, revision);
    debug!(revision, resolved = %resolved, "resolved revision");
    resolved
}

fn classify<Q: GitQuery>(query: &Q, repo: &Path, revision: &str) -> ResolvedRevision {
    if revision.contains("refs/") {
        if let Some(name) = revision.strip_prefix("refs/heads/") {
            return ResolvedRevision::Branch {
                name: name.to_string(),
            };
        }
        if let Some(name) = revision.strip_prefix("refs/tags/") {
            return ResolvedRevision::Tag {
                name: name.to_string(),
            };
        }
        return ResolvedRevision::Reference {
            full_name: revision.to_string(),
        };
    }

    if query.reference_exists(repo, &format!("refs/tags/{revision}")) {
        return ResolvedRevision::Tag {
            name: revision.to_string(),
        };
    }

    if query.reference_exists(repo, &format!("refs/heads/{revision}"))
        || query.reference_exists(repo, &format!("refs/remotes/{ORIGIN}/{revision}"))
    {
        return ResolvedRevision::Branch {
            name: revision.to_string(),
        };
    }

    ResolvedRevision::Commit {
        hash: revision.to_string(),
    }
}
