// git-clone-rs: Git repository sync for Kubernetes init containers
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Shared helpers for git unit tests.
//!
//! Fixtures are built with shell git to avoid coupling tests to the code
//! under test.

use std::path::Path;
use std::process::Command;
use tempfile::TempDir;

pub(crate) fn temp_dir() -> TempDir {
    tempfile::tempdir().expect("failed to create temp dir")
}

/// Run git in `cwd` with a fixed identity, returning trimmed stdout.
pub(crate) fn run_git(args: &[&str], cwd: &Path) -> String {
    let output = Command::new("git")
        .args(args)
        .current_dir(cwd)
        .env("GIT_AUTHOR_NAME", "Test")
        .env("GIT_AUTHOR_EMAIL", "test@test.com")
        .env("GIT_COMMITTER_NAME", "Test")
        .env("GIT_COMMITTER_EMAIL", "test@test.com")
        .output()
        .expect("failed to run git");
    assert!(
        output.status.success(),
        "git {} failed: {}",
        args.join(" "),
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8_lossy(&output.stdout).trim().to_string()
}

/// Write `name` and commit it, returning the new commit id.
pub(crate) fn commit_file(repo: &Path, name: &str, content: &str) -> String {
    std::fs::write(repo.join(name), content).expect("failed to write file");
    run_git(&["add", name], repo);
    run_git(&["commit", "-q", "-m", &format!("add {name}")], repo);
    run_git(&["rev-parse", "HEAD"], repo)
}

/// Create a repository on branch `main` with one commit (README.md).
pub(crate) fn init_repo_with_commit(dir: &Path) -> String {
    run_git(&["init", "-q"], dir);
    run_git(&["symbolic-ref", "HEAD", "refs/heads/main"], dir);
    commit_file(dir, "README.md", "# Test")
}
