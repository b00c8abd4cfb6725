// git-clone-rs: Git repository sync for Kubernetes init containers
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Global CLI options available for all commands.
//!
//! # Option Precedence
//!
//! ```text
//! --config FILE       <- Additional config files (can repeat)
//! --log-level N       <- Console verbosity (0-5 or a name)
//! --file-log-level N  <- File verbosity (falls back to --log-level)
//! --log-file FILE     <- Enables file logging
//! --log-format FMT    <- text | json
//! --set SEC/KEY=VAL   <- Direct config override
//!
//! Precedence: CLI flags > --set > GCO_* env > --config > git-clone.toml > defaults
//! ```

use clap::Args;
use std::path::PathBuf;

use crate::logging::{LogFormat, LogLevel};

/// Global options available for all commands.
#[derive(Debug, Clone, Default, Args)]
pub struct GlobalOptions {
    /// Path to additional TOML configuration file(s).
    /// Can be specified multiple times; later files win.
    #[arg(
        short = 'c',
        long = "config",
        value_name = "FILE",
        action = clap::ArgAction::Append,
        global = true
    )]
    pub configs: Vec<PathBuf>,

    /// Do not load `git-clone.toml` from the working directory.
    #[arg(long = "no-default-config", global = true)]
    pub no_default_config: bool,

    /// Console log level (0=silent, 1=errors, 2=warnings, 3=info, 4=debug, 5=trace)
    /// or its name.
    #[arg(short = 'l', long = "log-level", value_name = "LEVEL", global = true)]
    pub log_level: Option<LogLevel>,

    /// File log level, falls back to --log-level.
    #[arg(long = "file-log-level", value_name = "LEVEL", global = true)]
    pub file_log_level: Option<LogLevel>,

    /// Path to log file.
    #[arg(long = "log-file", value_name = "FILE", global = true)]
    pub log_file: Option<PathBuf>,

    /// Console log format.
    #[arg(long = "log-format", value_name = "FORMAT", value_enum, global = true)]
    pub log_format: Option<LogFormat>,

    /// Disables ANSI colors in console output.
    #[arg(long = "no-color", global = true)]
    pub no_color: bool,

    /// Sets an option, such as 'checkout/revision=v1.0.0'.
    /// Can be specified multiple times.
    #[arg(
        short = 's',
        long = "set",
        value_name = "OPTION",
        action = clap::ArgAction::Append,
        global = true
    )]
    pub options: Vec<String>,
}

impl GlobalOptions {
    /// Converts command-line options to configuration overrides.
    #[must_use]
    pub fn to_config_overrides(&self) -> Vec<String> {
        let mut overrides = self.options.clone();

        if let Some(level) = self.log_level {
            overrides.push(format!("log/level={}", level.as_u8()));
        }

        if let Some(level) = self.file_log_level.or(self.log_level) {
            overrides.push(format!("log/file_level={}", level.as_u8()));
        }

        if let Some(ref path) = self.log_file {
            overrides.push(format!("log/file={}", path.display()));
        }

        if let Some(format) = self.log_format {
            let name = match format {
                LogFormat::Text => "text",
                LogFormat::Json => "json",
            };
            overrides.push(format!("log/format={name}"));
        }

        if self.no_color {
            overrides.push("log/color=false".to_string());
        }

        overrides
    }
}
