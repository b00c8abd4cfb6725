// git-clone-rs: Git repository sync for Kubernetes init containers
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

use super::{ConfigError, GitError, SyncError};
use std::error::Error as _;
use std::path::PathBuf;

#[test]
fn test_config_error_display() {
    let err = ConfigError::MissingKey {
        section: "checkout".to_string(),
        key: "revision".to_string(),
    };
    insta::assert_snapshot!(
        err.to_string(),
        @"missing required config key 'revision' in section '[checkout]'"
    );
}

#[test]
fn test_sync_error_display_names_stage() {
    let err = SyncError::CheckoutFailed {
        stage: "checkout",
        revision: "refs/tags/v1.0.0".to_string(),
        source: Box::new(GitError::CommandFailed {
            command: "git checkout -f --detach refs/tags/v1.0.0".to_string(),
            message: "pathspec did not match".to_string(),
        }),
    };
    insta::assert_snapshot!(err.to_string(), @"cannot checkout 'refs/tags/v1.0.0'");
    insta::assert_snapshot!(
        err.source().map(ToString::to_string).unwrap_or_default(),
        @"git command failed: git checkout -f --detach refs/tags/v1.0.0 - pathspec did not match"
    );
}

#[test]
fn test_sync_error_kind() {
    let err = SyncError::CloneFailed {
        path: PathBuf::from("/srv/www"),
        source: Box::new(GitError::InvalidPath("/srv/www".to_string())),
    };
    assert_eq!(err.kind(), "CloneFailed");
    assert_eq!(err.to_string(), "cannot clone into '/srv/www'");
}

#[test]
fn test_invalid_url_keeps_parse_error_as_source() {
    let source = url::Url::parse("https://").unwrap_err();
    let err = SyncError::InvalidUrl {
        url: "https://".to_string(),
        source,
    };
    assert_eq!(err.kind(), "InvalidUrl");
    assert!(err.source().is_some());
}

#[test]
fn test_sync_error_size() {
    // Sources are boxed; the largest inline payload is PathBuf/String plus a box.
    let size = std::mem::size_of::<SyncError>();
    assert!(size <= 64, "SyncError is {size} bytes, expected <= 64");
}
