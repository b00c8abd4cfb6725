// git-clone-rs: Git repository sync for Kubernetes init containers
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Git operations module.
//!
//! ```text
//!   credentials  locator  revision  remote  workspace
//!    (url only)  (fs only)     \       |       /
//!                               v      v      v
//!                          ,------------------,
//!                          | backend (traits) |
//!                          '--+----------+----'
//!                             |          |
//!                             v          v
//!                        GitQuery    GitMutation
//!                       (gix, read)  (CLI, write)
//!                             |          |
//!                             v          v
//!                        GixBackend  ShellBackend
//!                        .head       .clone/fetch/pull
//!                        .refs       .checkout/reset/clean
//!                        .remotes    .remote add/set-url/remove
//! ```
//!
//! **`GixBackend`**: pure Rust, no subprocess, read-only.
//! **`ShellBackend`**: git CLI for network operations and all writes.

pub mod backend;
pub mod credentials;
pub mod locator;
pub mod remote;
pub mod revision;
pub mod workspace;

#[cfg(test)]
pub(crate) mod test_utils;
