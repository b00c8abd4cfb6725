// git-clone-rs: Git repository sync for Kubernetes init containers
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Filesystem check for an existing repository at the target path.
//!
//! Only the layout on disk is inspected. Whether the metadata is actually
//! usable is decided later, when the repository is opened.

use std::path::Path;

/// Shape of a repository found on disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RepositoryLayout {
    /// Working tree with a `.git` entry (directory or gitfile).
    WorkTree,
    /// Bare repository: `HEAD` file and `objects/` directly in the path.
    Bare,
}

impl RepositoryLayout {
    #[must_use]
    pub const fn is_bare(self) -> bool {
        matches!(self, Self::Bare)
    }
}

/// Find the repository layout at `path`, if any.
#[must_use]
pub fn locate_repository(path: &Path) -> Option<RepositoryLayout> {
    if path.join(".git").exists() {
        return Some(RepositoryLayout::WorkTree);
    }
    if path.join("HEAD").is_file() && path.join("objects").is_dir() {
        return Some(RepositoryLayout::Bare);
    }
    None
}

/// Whether `path` already holds a repository.
#[must_use]
pub fn is_existing_repository(path: &Path) -> bool {
    locate_repository(path).is_some()
}

#[cfg(test)]
mod tests {
    use super::{RepositoryLayout, is_existing_repository, locate_repository};
    use crate::git::test_utils::{init_repo_with_commit, run_git, temp_dir};

    #[test]
    fn test_missing_and_empty_paths() {
        let temp = temp_dir();
        assert_eq!(locate_repository(temp.path()), None);
        assert!(!is_existing_repository(&temp.path().join("does-not-exist")));
    }

    #[test]
    fn test_work_tree() {
        let temp = temp_dir();
        init_repo_with_commit(temp.path());
        assert_eq!(
            locate_repository(temp.path()),
            Some(RepositoryLayout::WorkTree)
        );
    }

    #[test]
    fn test_bare() {
        let temp = temp_dir();
        run_git(&["init", "-q", "--bare"], temp.path());
        let layout = locate_repository(temp.path());
        assert_eq!(layout, Some(RepositoryLayout::Bare));
        assert!(layout.is_some_and(RepositoryLayout::is_bare));
    }

    #[test]
    fn test_stray_files_are_not_a_repository() {
        let temp = temp_dir();
        std::fs::write(temp.path().join("HEAD"), "ref: refs/heads/main\n").unwrap();
        assert!(!is_existing_repository(temp.path()));

        // An empty `.git` directory is reported and left for open to reject.
        std::fs::create_dir(temp.path().join(".git")).unwrap();
        assert!(is_existing_repository(temp.path()));
    }
}
