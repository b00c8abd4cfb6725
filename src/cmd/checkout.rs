// git-clone-rs: Git repository sync for Kubernetes init containers
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Checkout command implementation.
//!
//! ```text
//! CheckoutArgs + [checkout] config --> SyncRequest
//!        |
//!        v
//! inspect_environment (unless --no-inspect)
//!        |
//!        v
//! SyncEngine::sync --> log line, JSON on stdout (--output json)
//! ```

use anyhow::Context;
use tracing::{info, warn};

use crate::cli::checkout::{CheckoutArgs, OutputFormat};
use crate::cmd::inspect::inspect_environment;
use crate::config::{CheckoutDefaults, Config};
use crate::error::Result;
use crate::git::credentials::redact_credentials;
use crate::sync::{SyncEngine, SyncOutcome, SyncRequest};

/// Merge command-line arguments over configuration defaults.
#[must_use]
pub fn build_sync_request(args: &CheckoutArgs, defaults: &CheckoutDefaults) -> SyncRequest {
    SyncRequest::builder()
        .with_remote_url(args.url.as_str())
        .with_username(args.username.as_deref().unwrap_or(&defaults.username))
        .with_token(args.token.clone().unwrap_or_default())
        .with_target_path(args.path.as_ref().unwrap_or(&defaults.path))
        .with_revision(args.revision.as_deref().unwrap_or(&defaults.revision))
        .with_clean_workspace(args.clean_workspace.unwrap_or(defaults.clean_workspace))
        .with_cleanup_remotes_after(args.clean_remotes.unwrap_or(defaults.clean_remotes))
        .with_treat_as_bare(args.bare.unwrap_or(defaults.bare))
        .build()
}

/// Main handler for the checkout command.
///
/// # Errors
///
/// Returns an error if git is missing or the sync fails.
pub fn run_checkout_command(args: &CheckoutArgs, config: &Config) -> Result<()> {
    let request = build_sync_request(args, &config.checkout);

    if config.checkout.inspect && !args.no_inspect {
        match std::env::current_dir() {
            Ok(cwd) => inspect_environment(&cwd),
            Err(e) => warn!(error = %e, "cannot determine working directory"),
        }
    }

    let engine = SyncEngine::new().context("git is required")?;
    let outcome = engine.sync(&request).with_context(|| {
        format!(
            "cannot clone/checkout '{}' into '{}'",
            redact_credentials(request.remote_url()),
            request.target_path().display()
        )
    })?;

    report(&outcome, args.output)
}

fn report(outcome: &SyncOutcome, output: OutputFormat) -> Result<()> {
    if let Some(remotes) = &outcome.remotes
        && !remotes.is_complete()
    {
        warn!(
            failed = remotes.failed.len(),
            "some remotes could not be removed, credentials may remain in the repository config"
        );
    }

    let result = &outcome.result;
    info!(
        reference = %result.head_reference,
        commit = %result.head_commit,
        "The local repository is now on '{}', at commit '{}'",
        result.head_reference,
        result.head_commit
    );

    if output == OutputFormat::Json {
        println!("{}", serde_json::to_string(result)?);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::build_sync_request;
    use crate::cli::{Cli, Command};
    use crate::config::CheckoutDefaults;
    use clap::Parser;
    use std::path::Path;

    fn parse(args: &[&str]) -> crate::cli::checkout::CheckoutArgs {
        let argv = ["git-clone-operator", "checkout", "https://example.org/r.git"]
            .iter()
            .chain(args);
        match Cli::try_parse_from(argv).unwrap().command {
            Some(Command::Checkout(args)) => args,
            other => panic!("expected checkout, got {other:?}"),
        }
    }

    #[test]
    fn test_config_fills_unset_arguments() {
        let defaults = CheckoutDefaults {
            path: "/srv/site".into(),
            revision: "production".to_string(),
            clean_workspace: true,
            clean_remotes: false,
            ..CheckoutDefaults::default()
        };
        let request = build_sync_request(&parse(&["-U", "bot", "-t", "tok"]), &defaults);

        assert_eq!(request.target_path(), Path::new("/srv/site"));
        assert_eq!(request.revision(), "production");
        assert!(request.clean_workspace());
        assert!(!request.cleanup_remotes_after());
        assert!(!request.treat_as_bare());
    }

    #[test]
    fn test_arguments_win_over_config() {
        let defaults = CheckoutDefaults {
            revision: "production".to_string(),
            clean_workspace: true,
            ..CheckoutDefaults::default()
        };
        let request = build_sync_request(
            &parse(&[
                "-r",
                "v1.0.0",
                "-p",
                "/tmp/x",
                "-U",
                "bot",
                "-t",
                "tok",
                "--clean-workspace=false",
                "--bare",
            ]),
            &defaults,
        );

        assert_eq!(request.revision(), "v1.0.0");
        assert_eq!(request.target_path(), Path::new("/tmp/x"));
        assert_eq!(request.username(), "bot");
        assert_eq!(request.token(), "tok");
        assert!(!request.clean_workspace());
        assert!(request.treat_as_bare());
        assert!(request.cleanup_remotes_after());
    }
}
