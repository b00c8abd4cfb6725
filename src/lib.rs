// git-clone-rs: Git repository sync for Kubernetes init containers
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Library root.
//!
//! # Crate Architecture
//!
//! ```text
//!                        main.rs
//!                           |
//!                +----------+----------+
//!                v                     v
//!             cli (clap)          cmd (handlers)
//!                |             checkout / inspect
//!                +----------+----------+
//!                           v
//!              ,---------------------------,
//!              |          config           |
//!              |   TOML, env, overrides    |
//!              '-------------+-------------'
//!                            v
//!                    sync (SyncEngine)
//!                 state machine, outcome
//!                            |
//!      +---------+-----------+---------+----------+
//!      v         v           v         v          v
//! credentials  locator   revision   remote    workspace
//!      '---------+-----------+---------+----------'
//!                            v
//!                  git::backend (gix / CLI)
//!
//!   +-----------------------------------------+
//!   |  foundation          error, logging     |
//!   +-----------------------------------------+
//! ```

pub mod cli;
pub mod cmd;
pub mod config;
pub mod error;
pub mod git;
pub mod logging;
pub mod sync;
