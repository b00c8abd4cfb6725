// git-clone-rs: Git repository sync for Kubernetes init containers
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Git backend abstraction layer.
//!
//! ```text
//! GitQuery (read)     --> GixBackend (pure Rust gix)
//! GitMutation (write) --> ShellBackend (git CLI)
//! ```
//!
//! Queries open the repository fresh on every call, so they always observe
//! the state left behind by the previous mutation.

use crate::error::{GitError, GitResult, GixError};
use crate::git::credentials::redact_credentials;
use crate::git::remote::{MIRROR_REFSPECS, ORIGIN};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{debug, trace};

/// Where HEAD points after a sync.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeadState {
    /// Full reference name (`refs/heads/main`), `None` when detached.
    pub reference: Option<String>,
    /// Hex commit id HEAD resolves to.
    pub commit: String,
}

// --- Query Trait (Read-only operations) ---

/// Read-only git query operations.
///
/// Implementors inspect repository state without modification.
pub trait GitQuery {
    /// Open the repository at `path` and report whether it is bare.
    ///
    /// # Errors
    ///
    /// Returns a `GitError` if the path is not a valid repository.
    fn open_repository(&self, path: &Path) -> GitResult<bool>;

    /// Get the reference HEAD points at and the commit it resolves to.
    ///
    /// # Errors
    ///
    /// Returns a `GitError` if HEAD cannot be read or is unborn.
    fn head(&self, path: &Path) -> GitResult<HeadState>;

    /// Check whether a fully qualified reference exists.
    ///
    /// Lookup failures and invalid names count as "does not exist".
    fn reference_exists(&self, path: &Path, full_name: &str) -> bool;

    /// Snapshot of every direct reference: full name to hex id.
    ///
    /// # Errors
    ///
    /// Returns a `GitError` if the reference store cannot be read.
    fn references(&self, path: &Path) -> GitResult<BTreeMap<String, String>>;

    /// Names of all configured remotes, sorted.
    ///
    /// # Errors
    ///
    /// Returns a `GitError` if the repository cannot be opened.
    fn remote_names(&self, path: &Path) -> GitResult<Vec<String>>;

    /// Configured fetch URL of a remote, `None` if the remote does not exist.
    ///
    /// # Errors
    ///
    /// Returns a `GitError` if the repository cannot be opened.
    fn remote_url(&self, path: &Path, name: &str) -> GitResult<Option<String>>;
}

// --- Mutation Trait (Write operations) ---

/// Git mutation operations that modify repository state.
pub trait GitMutation {
    /// Clone `url` into the existing directory `dest` and check out the
    /// remote's default branch.
    ///
    /// `dest` may already hold files without being a repository (a volume
    /// with `lost+found/`). Those files are left in place.
    ///
    /// # Errors
    ///
    /// Returns a `GitError` if the clone operation fails.
    fn clone_into(&self, url: &str, dest: &Path, bare: bool) -> GitResult<()>;

    /// Add a remote.
    ///
    /// # Errors
    ///
    /// Returns a `GitError` if the remote cannot be added.
    fn add_remote(&self, repo_path: &Path, name: &str, url: &str) -> GitResult<()>;

    /// Point an existing remote at a new URL.
    ///
    /// # Errors
    ///
    /// Returns a `GitError` if the URL cannot be changed.
    fn set_remote_url(&self, repo_path: &Path, name: &str, url: &str) -> GitResult<()>;

    /// Remove a remote together with its remote-tracking refs.
    ///
    /// # Errors
    ///
    /// Returns a `GitError` if the remote cannot be removed.
    fn remove_remote(&self, repo_path: &Path, name: &str) -> GitResult<()>;

    /// Fetch all branches and tags from a remote at full depth.
    ///
    /// An empty `refspecs` slice uses the remote's configured refspec.
    ///
    /// # Errors
    ///
    /// Returns a `GitError` if the fetch operation fails.
    fn fetch(&self, repo_path: &Path, remote: &str, refspecs: &[&str]) -> GitResult<()>;

    /// Force-checkout a local branch, (re)creating it at `start_point` if given.
    ///
    /// # Errors
    ///
    /// Returns a `GitError` if the checkout operation fails.
    fn checkout_branch(
        &self,
        repo_path: &Path,
        branch: &str,
        start_point: Option<&str>,
    ) -> GitResult<()>;

    /// Force-checkout a tag, commit or other ref with a detached HEAD.
    ///
    /// # Errors
    ///
    /// Returns a `GitError` if the checkout operation fails.
    fn checkout_detached(&self, repo_path: &Path, what: &str) -> GitResult<()>;

    /// Fast-forward the current branch from `remote`/`branch`.
    ///
    /// # Errors
    ///
    /// Returns a `GitError` if the pull fails or would need a merge.
    fn pull_fast_forward(&self, repo_path: &Path, remote: &str, branch: &str) -> GitResult<()>;

    /// Discard all modifications of tracked files.
    ///
    /// # Errors
    ///
    /// Returns a `GitError` if the reset fails.
    fn reset_hard(&self, repo_path: &Path) -> GitResult<()>;

    /// Remove untracked files and directories.
    ///
    /// # Errors
    ///
    /// Returns a `GitError` if the clean fails.
    fn remove_untracked(&self, repo_path: &Path) -> GitResult<()>;

    /// Point HEAD of a bare repository at a branch or at a commit.
    ///
    /// # Errors
    ///
    /// Returns a `GitError` if HEAD cannot be updated.
    fn point_head(&self, repo_path: &Path, target: &str, symbolic: bool) -> GitResult<()>;
}

// --- GixBackend Implementation (Pure Rust) ---

/// Pure Rust git backend using gix.
///
/// Provides read-only operations without spawning subprocesses.
#[derive(Debug, Clone, Copy, Default)]
pub struct GixBackend;

impl GixBackend {
    fn open(path: &Path) -> GitResult<gix::Repository> {
        gix::open(path).map_err(|e| GitError::from(Box::new(e)))
    }
}

impl GitQuery for GixBackend {
    fn open_repository(&self, path: &Path) -> GitResult<bool> {
        Ok(Self::open(path)?.is_bare())
    }

    fn head(&self, path: &Path) -> GitResult<HeadState> {
        let repo = Self::open(path)?;
        let reference = repo
            .head_name()
            .map_err(GixError::Head)?
            .map(|name| name.as_bstr().to_string());
        let commit = repo
            .head_id()
            .map_err(|e| GixError::HeadId(Box::new(e)))?
            .to_string();
        Ok(HeadState { reference, commit })
    }

    fn reference_exists(&self, path: &Path, full_name: &str) -> bool {
        let Ok(repo) = Self::open(path) else {
            return false;
        };
        matches!(repo.try_find_reference(full_name), Ok(Some(_)))
    }

    fn references(&self, path: &Path) -> GitResult<BTreeMap<String, String>> {
        let repo = Self::open(path)?;
        let platform = repo
            .references()
            .map_err(|e| GixError::References(Box::new(e)))?;
        let mut snapshot = BTreeMap::new();
        for reference in platform
            .all()
            .map_err(|e| GixError::References(Box::new(e)))?
        {
            let reference = reference.map_err(GixError::References)?;
            // Symbolic refs (refs/remotes/origin/HEAD) carry no id of their own.
            if let Some(id) = reference.target().try_id() {
                snapshot.insert(
                    reference.name().as_bstr().to_string(),
                    id.to_hex().to_string(),
                );
            }
        }
        Ok(snapshot)
    }

    fn remote_names(&self, path: &Path) -> GitResult<Vec<String>> {
        let repo = Self::open(path)?;
        Ok(repo
            .remote_names()
            .iter()
            .map(ToString::to_string)
            .collect())
    }

    fn remote_url(&self, path: &Path, name: &str) -> GitResult<Option<String>> {
        let repo = Self::open(path)?;
        let key = format!("remote.{name}.url");
        Ok(repo
            .config_snapshot()
            .string(key.as_str())
            .map(|url| url.to_string()))
    }
}

// --- ShellBackend Implementation (Git CLI) ---

/// Shell-based git backend using the git CLI.
///
/// Required for network operations (clone, fetch, pull) and working tree
/// mutation. Credentials embedded in URLs are redacted from every error.
#[derive(Debug, Clone)]
pub struct ShellBackend {
    git: PathBuf,
}

impl ShellBackend {
    /// Locate `git` on `PATH`.
    ///
    /// # Errors
    ///
    /// Returns `GitError::GitNotFound` if no git executable is available.
    pub fn new() -> GitResult<Self> {
        Ok(Self {
            git: which::which("git")?,
        })
    }

    /// Use an explicit git executable.
    #[must_use]
    pub fn with_executable(git: impl Into<PathBuf>) -> Self {
        Self { git: git.into() }
    }

    /// Execute a git command. Sets `GCM_INTERACTIVE=never` and `GIT_TERMINAL_PROMPT=0`.
    ///
    /// `safe.directory=*` is passed because the target volume is usually owned
    /// by the uid of the application container, not the init container.
    pub(crate) fn git_command(&self, args: &[&str], cwd: &Path) -> GitResult<String> {
        use std::process::Command;

        trace!(
            command = %redact_credentials(&args.join(" ")),
            cwd = %cwd.display(),
            "running git"
        );

        let output = Command::new(&self.git)
            .args(["-c", "safe.directory=*"])
            .args(args)
            .current_dir(cwd)
            .env("GCM_INTERACTIVE", "never")
            .env("GIT_TERMINAL_PROMPT", "0")
            .output()
            .map_err(GitError::Spawn)?;

        if !output.status.success() {
            return Err(GitError::CommandFailed {
                command: redact_credentials(&format!("git {}", args.join(" "))).into_owned(),
                message: redact_credentials(String::from_utf8_lossy(&output.stderr).trim())
                    .into_owned(),
            });
        }
        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }

    /// Turn a non-empty directory into a clone of `url`.
    ///
    /// ```text
    /// git init [--bare]
    /// git remote add origin <url>
    /// git fetch origin [mirror refspecs]
    /// git ls-remote --symref origin HEAD   -> default branch
    /// checkout -B <default> | symbolic-ref HEAD (bare)
    /// ```
    fn init_in_place(&self, url: &str, dest: &Path, bare: bool) -> GitResult<()> {
        let init: &[&str] = if bare {
            &["init", "--quiet", "--bare"]
        } else {
            &["init", "--quiet"]
        };
        self.git_command(init, dest)?;
        self.add_remote(dest, ORIGIN, url)?;
        let refspecs: &[&str] = if bare { &MIRROR_REFSPECS } else { &[] };
        self.fetch(dest, ORIGIN, refspecs)?;

        let listing = self.git_command(&["ls-remote", "--symref", ORIGIN, "HEAD"], dest)?;
        let branch = default_branch(&listing).ok_or_else(|| GitError::CommandFailed {
            command: format!("git ls-remote --symref {ORIGIN} HEAD"),
            message: "remote HEAD does not point at a branch".to_string(),
        })?;
        debug!(branch, "checking out remote default branch");

        if bare {
            self.point_head(dest, &format!("refs/heads/{branch}"), true)
        } else {
            let start = format!("refs/remotes/{ORIGIN}/{branch}");
            self.checkout_branch(dest, branch, Some(&start))
        }
    }
}

/// Branch name from `ls-remote --symref <remote> HEAD` output
/// (`ref: refs/heads/main<TAB>HEAD`).
fn default_branch(listing: &str) -> Option<&str> {
    listing.lines().find_map(|line| {
        let (target, name) = line.strip_prefix("ref: ")?.split_once('\t')?;
        if name != "HEAD" {
            return None;
        }
        target.strip_prefix("refs/heads/")
    })
}

fn is_empty_dir(path: &Path) -> GitResult<bool> {
    let mut entries = std::fs::read_dir(path).map_err(|source| GitError::Io {
        path: path.display().to_string(),
        source,
    })?;
    Ok(entries.next().is_none())
}

impl GitMutation for ShellBackend {
    fn clone_into(&self, url: &str, dest: &Path, bare: bool) -> GitResult<()> {
        if !is_empty_dir(dest)? {
            debug!(path = %dest.display(), "target directory is not empty, initialising in place");
            return self.init_in_place(url, dest, bare);
        }

        let mut args = vec!["clone", "--quiet"];
        if bare {
            args.push("--bare");
        }
        args.extend([url, "."]);
        self.git_command(&args, dest)?;
        Ok(())
    }

    fn add_remote(&self, repo_path: &Path, name: &str, url: &str) -> GitResult<()> {
        self.git_command(&["remote", "add", name, url], repo_path)?;
        Ok(())
    }

    fn set_remote_url(&self, repo_path: &Path, name: &str, url: &str) -> GitResult<()> {
        self.git_command(&["remote", "set-url", name, url], repo_path)?;
        Ok(())
    }

    fn remove_remote(&self, repo_path: &Path, name: &str) -> GitResult<()> {
        self.git_command(&["remote", "remove", name], repo_path)?;
        Ok(())
    }

    fn fetch(&self, repo_path: &Path, remote: &str, refspecs: &[&str]) -> GitResult<()> {
        let mut args = vec!["fetch", "--quiet", "--tags", "--force", remote];
        args.extend_from_slice(refspecs);
        self.git_command(&args, repo_path)?;
        Ok(())
    }

    fn checkout_branch(
        &self,
        repo_path: &Path,
        branch: &str,
        start_point: Option<&str>,
    ) -> GitResult<()> {
        let mut args = vec!["checkout", "-q", "-f"];
        match start_point {
            Some(start) => args.extend(["-B", branch, start]),
            None => args.push(branch),
        }
        args.push("--");
        self.git_command(&args, repo_path)?;
        Ok(())
    }

    fn checkout_detached(&self, repo_path: &Path, what: &str) -> GitResult<()> {
        self.git_command(
            &[
                "-c",
                "advice.detachedHead=false",
                "checkout",
                "-q",
                "-f",
                "--detach",
                what,
                "--",
            ],
            repo_path,
        )?;
        Ok(())
    }

    fn pull_fast_forward(&self, repo_path: &Path, remote: &str, branch: &str) -> GitResult<()> {
        self.git_command(
            &["pull", "--quiet", "--ff-only", "--no-rebase", remote, branch],
            repo_path,
        )?;
        Ok(())
    }

    fn reset_hard(&self, repo_path: &Path) -> GitResult<()> {
        self.git_command(&["reset", "--quiet", "--hard", "HEAD"], repo_path)?;
        Ok(())
    }

    fn remove_untracked(&self, repo_path: &Path) -> GitResult<()> {
        self.git_command(&["clean", "-q", "-f", "-d"], repo_path)?;
        Ok(())
    }

    fn point_head(&self, repo_path: &Path, target: &str, symbolic: bool) -> GitResult<()> {
        if symbolic {
            // symbolic-ref accepts missing targets and would leave HEAD unborn.
            let commit = format!("{target}^{{commit}}");
            self.git_command(&["rev-parse", "--verify", "--quiet", &commit], repo_path)?;
            self.git_command(&["symbolic-ref", "HEAD", target], repo_path)?;
        } else {
            let commit = format!("{target}^{{commit}}");
            self.git_command(&["update-ref", "--no-deref", "HEAD", &commit], repo_path)?;
        }
        Ok(())
    }
}
