//! dupes - Duplicate Files Checker
//!
//! Finds files under a target location that duplicate files under a source
//! location, by name or by content, and lists, moves or deletes them.

pub mod actions;
pub mod cli;
pub mod config;
pub mod duplicates;
pub mod error;
pub mod logging;
pub mod progress;
pub mod scanner;
pub mod signal;

use std::io::{self, BufRead, Write};

use crate::actions::Prompt;
use crate::cli::Cli;
use crate::config::{ScanConfig, Settings};
use crate::duplicates::DuplicateFinder;
use crate::error::ExitCode;
use crate::signal::ShutdownHandler;

/// Run one invocation.
///
/// Delete confirmations are read from `input` and asked on stderr; the
/// list-mode duplicate list is written to `output`.
///
/// # Errors
///
/// Returns an error for fatal configuration problems (missing roots, move
/// without destination, unusable settings, destination not creatable) or
/// when `output` cannot be written.
pub fn run_app<R: BufRead, W: Write>(
    cli: Cli,
    shutdown: &ShutdownHandler,
    input: R,
    mut output: W,
) -> anyhow::Result<ExitCode> {
    let settings = Settings::load(cli.config.as_deref())?;
    let config = ScanConfig::from_cli(&cli, &settings)?;
    log::debug!("Scan configuration: {:?}", config);

    let mut prompt = Prompt::new(input, io::stderr());
    let report = DuplicateFinder::new(config)
        .with_shutdown_flag(shutdown.get_flag())
        .run(&mut prompt, &mut output)?;

    if report.interrupted {
        return Ok(ExitCode::Interrupted);
    }
    Ok(ExitCode::Success)
}
