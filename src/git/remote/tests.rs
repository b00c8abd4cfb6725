// git-clone-rs: Git repository sync for Kubernetes init containers
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

use super::{FetchStatus, ORIGIN, cleanup_remotes, ensure_and_fetch};
use crate::error::{GitError, GitResult, SyncError};
use crate::git::backend::{GitMutation, GitQuery, GixBackend, ShellBackend};
use crate::git::test_utils::{commit_file, init_repo_with_commit, run_git, temp_dir};
use std::collections::BTreeMap;
use std::path::Path;
use tempfile::TempDir;

fn shell() -> ShellBackend {
    ShellBackend::new().expect("git must be installed to run tests")
}

/// Upstream repository and a clone of it.
fn upstream_and_clone() -> (TempDir, TempDir) {
    let upstream = temp_dir();
    init_repo_with_commit(upstream.path());
    let local = temp_dir();
    run_git(
        &["clone", "-q", upstream.path().to_str().unwrap(), "."],
        local.path(),
    );
    (upstream, local)
}

fn url(dir: &TempDir) -> &str {
    dir.path().to_str().unwrap()
}

fn snapshot(entries: &[(&str, &str)]) -> BTreeMap<String, String> {
    entries
        .iter()
        .map(|(name, id)| ((*name).to_string(), (*id).to_string()))
        .collect()
}

#[test]
fn test_fetch_status_ignores_recreated_tracking_refs() {
    let before = snapshot(&[("refs/heads/main", "aaa")]);
    let after = snapshot(&[
        ("refs/heads/main", "aaa"),
        ("refs/remotes/origin/main", "aaa"),
    ]);
    assert_eq!(FetchStatus::between(&before, &after), FetchStatus::UpToDate);
}

#[test]
fn test_fetch_status_counts_new_tag_on_known_commit() {
    let before = snapshot(&[("refs/heads/main", "aaa")]);
    let after = snapshot(&[
        ("refs/heads/main", "aaa"),
        ("refs/remotes/origin/main", "aaa"),
        ("refs/tags/v1", "aaa"),
    ]);
    assert_eq!(
        FetchStatus::between(&before, &after),
        FetchStatus::Updated {
            changed: vec!["refs/tags/v1".to_string()]
        }
    );
}

#[test]
fn test_fetch_status_reports_moved_and_new_refs() {
    let before = snapshot(&[("refs/heads/main", "aaa"), ("refs/tags/v1", "aaa")]);
    let after = snapshot(&[
        ("refs/heads/main", "aaa"),
        ("refs/remotes/origin/main", "bbb"),
        ("refs/tags/v1", "ccc"),
    ]);
    assert_eq!(
        FetchStatus::between(&before, &after),
        FetchStatus::Updated {
            changed: vec![
                "refs/remotes/origin/main".to_string(),
                "refs/tags/v1".to_string()
            ]
        }
    );
}

#[test]
fn test_fetch_twice_is_up_to_date() {
    let (upstream, local) = upstream_and_clone();
    let git = shell();

    let status =
        ensure_and_fetch(&GixBackend, &git, local.path(), ORIGIN, url(&upstream), false).unwrap();
    assert!(status.is_up_to_date());
    let status =
        ensure_and_fetch(&GixBackend, &git, local.path(), ORIGIN, url(&upstream), false).unwrap();
    assert!(status.is_up_to_date());
}

#[test]
fn test_fetch_reports_new_commits() {
    let (upstream, local) = upstream_and_clone();
    let new_commit = commit_file(upstream.path(), "new.txt", "new");

    let status = ensure_and_fetch(
        &GixBackend,
        &shell(),
        local.path(),
        ORIGIN,
        url(&upstream),
        false,
    )
    .unwrap();

    assert_eq!(
        status,
        FetchStatus::Updated {
            changed: vec!["refs/remotes/origin/main".to_string()]
        }
    );
    let refs = GixBackend.references(local.path()).unwrap();
    assert_eq!(refs["refs/remotes/origin/main"], new_commit);
}

#[test]
fn test_fetch_reports_new_tag_on_existing_commit() {
    let (upstream, local) = upstream_and_clone();
    run_git(&["tag", "v1.0.0"], upstream.path());

    let status = ensure_and_fetch(
        &GixBackend,
        &shell(),
        local.path(),
        ORIGIN,
        url(&upstream),
        false,
    )
    .unwrap();

    assert_eq!(
        status,
        FetchStatus::Updated {
            changed: vec!["refs/tags/v1.0.0".to_string()]
        }
    );
}

#[test]
fn test_missing_remote_is_added() {
    let (upstream, local) = upstream_and_clone();
    run_git(&["remote", "remove", ORIGIN], local.path());

    let status = ensure_and_fetch(
        &GixBackend,
        &shell(),
        local.path(),
        ORIGIN,
        url(&upstream),
        false,
    )
    .unwrap();

    assert!(status.is_up_to_date());
    assert_eq!(
        GixBackend.remote_url(local.path(), ORIGIN).unwrap().as_deref(),
        Some(url(&upstream))
    );
    assert!(GixBackend.reference_exists(local.path(), "refs/remotes/origin/main"));
}

#[test]
fn test_changed_url_is_repointed() {
    let (_old, local) = upstream_and_clone();
    let moved = temp_dir();
    init_repo_with_commit(moved.path());

    ensure_and_fetch(
        &GixBackend,
        &shell(),
        local.path(),
        ORIGIN,
        url(&moved),
        false,
    )
    .unwrap();

    assert_eq!(
        GixBackend.remote_url(local.path(), ORIGIN).unwrap().as_deref(),
        Some(url(&moved))
    );
}

#[test]
fn test_unreachable_remote_is_fetch_failed() {
    let (_upstream, local) = upstream_and_clone();
    let gone = local.path().join("no-such-upstream");

    let err = ensure_and_fetch(
        &GixBackend,
        &shell(),
        local.path(),
        ORIGIN,
        gone.to_str().unwrap(),
        false,
    )
    .unwrap_err();

    assert!(
        matches!(&err, SyncError::FetchFailed { remote, .. } if remote == ORIGIN),
        "unexpected error: {err}"
    );
}

#[test]
fn test_bare_fetch_mirrors_branches() {
    let upstream = temp_dir();
    init_repo_with_commit(upstream.path());
    let mirror = temp_dir();
    run_git(
        &["clone", "-q", "--bare", url(&upstream), "."],
        mirror.path(),
    );
    let new_commit = commit_file(upstream.path(), "new.txt", "new");

    let status = ensure_and_fetch(
        &GixBackend,
        &shell(),
        mirror.path(),
        ORIGIN,
        url(&upstream),
        true,
    )
    .unwrap();

    assert!(!status.is_up_to_date());
    let refs = GixBackend.references(mirror.path()).unwrap();
    assert_eq!(refs["refs/heads/main"], new_commit);
    assert!(!refs.contains_key("refs/remotes/origin/main"));
}

#[test]
fn test_cleanup_removes_every_remote() {
    let (upstream, local) = upstream_and_clone();
    run_git(&["remote", "add", "mirror", url(&upstream)], local.path());

    let cleanup = cleanup_remotes(&GixBackend, &shell(), local.path());

    assert!(cleanup.is_complete());
    assert_eq!(cleanup.removed, vec!["mirror".to_string(), "origin".to_string()]);
    assert!(GixBackend.remote_names(local.path()).unwrap().is_empty());
}

#[test]
fn test_cleanup_without_remotes_is_noop() {
    let temp = temp_dir();
    init_repo_with_commit(temp.path());
    let cleanup = cleanup_remotes(&GixBackend, &shell(), temp.path());
    assert!(cleanup.removed.is_empty());
    assert!(cleanup.is_complete());
}

/// Shell backend whose `remove_remote` fails for one remote name.
struct RefusingRemoval {
    inner: ShellBackend,
    refuse: &'static str,
}

impl GitMutation for RefusingRemoval {
    fn clone_into(&self, url: &str, dest: &Path, bare: bool) -> GitResult<()> {
        GitMutation::clone_into(&self.inner, url, dest, bare)
    }
    fn add_remote(&self, repo_path: &Path, name: &str, url: &str) -> GitResult<()> {
        self.inner.add_remote(repo_path, name, url)
    }
    fn set_remote_url(&self, repo_path: &Path, name: &str, url: &str) -> GitResult<()> {
        self.inner.set_remote_url(repo_path, name, url)
    }
    fn remove_remote(&self, repo_path: &Path, name: &str) -> GitResult<()> {
        if name == self.refuse {
            return Err(GitError::CommandFailed {
                command: format!("git remote remove {name}"),
                message: "error: could not lock config file".to_string(),
            });
        }
        self.inner.remove_remote(repo_path, name)
    }
    fn fetch(&self, repo_path: &Path, remote: &str, refspecs: &[&str]) -> GitResult<()> {
        self.inner.fetch(repo_path, remote, refspecs)
    }
    fn checkout_branch(&self, repo: &Path, branch: &str, start: Option<&str>) -> GitResult<()> {
        self.inner.checkout_branch(repo, branch, start)
    }
    fn checkout_detached(&self, repo_path: &Path, what: &str) -> GitResult<()> {
        self.inner.checkout_detached(repo_path, what)
    }
    fn pull_fast_forward(&self, repo_path: &Path, remote: &str, branch: &str) -> GitResult<()> {
        self.inner.pull_fast_forward(repo_path, remote, branch)
    }
    fn reset_hard(&self, repo_path: &Path) -> GitResult<()> {
        self.inner.reset_hard(repo_path)
    }
    fn remove_untracked(&self, repo_path: &Path) -> GitResult<()> {
        self.inner.remove_untracked(repo_path)
    }
    fn point_head(&self, repo_path: &Path, target: &str, symbolic: bool) -> GitResult<()> {
        self.inner.point_head(repo_path, target, symbolic)
    }
}

#[test]
fn test_cleanup_continues_past_failures() {
    let (upstream, local) = upstream_and_clone();
    run_git(&["remote", "add", "backup", url(&upstream)], local.path());
    run_git(&["remote", "add", "mirror", url(&upstream)], local.path());
    let git = RefusingRemoval {
        inner: shell(),
        refuse: "mirror",
    };

    let cleanup = cleanup_remotes(&GixBackend, &git, local.path());

    assert_eq!(cleanup.removed, vec!["backup".to_string(), "origin".to_string()]);
    assert_eq!(cleanup.failed.len(), 1);
    insta::assert_snapshot!(cleanup.failed[0].to_string(), @"cannot remove remote 'mirror'");
    assert_eq!(cleanup.failed[0].kind(), "CleanupFailed");
    assert_eq!(
        GixBackend.remote_names(local.path()).unwrap(),
        vec!["mirror".to_string()]
    );
}
