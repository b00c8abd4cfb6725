// git-clone-rs: Git repository sync for Kubernetes init containers
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Integration tests for configuration loading.
//!
//! Tests the Config module with realistic TOML configurations.

use git_clone_rs::config::{Config, ConfigLoader};
use git_clone_rs::logging::{LogFormat, LogLevel};
use std::path::PathBuf;

// =============================================================================
// Loading from TOML strings
// =============================================================================

#[test]
fn config_parse_empty() {
    assert_eq!(Config::parse("").unwrap(), Config::default());
}

#[test]
fn config_parse_deployment() {
    let toml = r#"
[checkout]
path = "/usr/share/nginx/html"
username = "deploy-bot"
revision = "production"
clean_remotes = true
clean_workspace = true
inspect = false

[log]
level = "warn"
format = "json"
color = false
"#;
    let config = Config::parse(toml).unwrap();

    assert_eq!(config.checkout.path, PathBuf::from("/usr/share/nginx/html"));
    assert_eq!(config.checkout.username, "deploy-bot");
    assert_eq!(config.checkout.revision, "production");
    assert!(config.checkout.clean_workspace);
    assert!(!config.checkout.bare);
    assert!(!config.checkout.inspect);
    assert_eq!(config.log.level, LogLevel::WARN);
    assert_eq!(config.log.format, LogFormat::Json);
    assert!(!config.log.color);
}

#[test]
fn config_parse_invalid_toml() {
    assert!(Config::parse("[checkout\nrevision = main").is_err());
}

#[test]
fn config_rejects_empty_username() {
    let err = Config::parse("[checkout]\nusername = \"\"\n").unwrap_err();
    insta::assert_snapshot!(
        format!("{err:#}"),
        @"invalid value for 'username' in section '[checkout]': must not be empty"
    );
}

// =============================================================================
// Layering
// =============================================================================

#[test]
fn config_layers_files_and_overrides() {
    let dir = tempfile::tempdir().unwrap();
    let site = dir.path().join("site.toml");
    std::fs::write(
        &site,
        "[checkout]\nrevision = \"staging\"\npath = \"/srv\"\n\n[log]\nlevel = 2\n",
    )
    .unwrap();

    let config = ConfigLoader::new()
        .add_toml_file_optional(dir.path().join("git-clone.toml"))
        .add_toml_file(&site)
        .with_overrides(&["log/level=5", "checkout/bare=true"])
        .unwrap()
        .build()
        .unwrap();

    assert_eq!(config.checkout.revision, "staging");
    assert_eq!(config.checkout.path, PathBuf::from("/srv"));
    assert!(config.checkout.bare);
    assert_eq!(config.log.level, LogLevel::TRACE);
}

#[test]
fn config_override_with_unknown_key_fails() {
    let result = ConfigLoader::new()
        .with_overrides(&["checkout/branch=main"])
        .unwrap()
        .build();
    assert!(result.is_err());
}
