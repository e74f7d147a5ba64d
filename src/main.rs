//! dupes - Duplicate Files Checker
//!
//! Entry point for the dupes CLI application.

use std::io;
use std::path::Path;

use clap::Parser;
use dupes::{
    cli::Cli,
    error::ExitCode,
    logging::init_logging,
    signal::{install_handler, ShutdownHandler},
};

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);

    let shutdown = install_handler().unwrap_or_else(|e| {
        log::warn!("{}", e);
        ShutdownHandler::new()
    });

    let stdin = io::stdin();
    match dupes::run_app(cli, &shutdown, stdin.lock(), io::stdout().lock()) {
        Ok(code) => std::process::exit(code.as_i32()),
        Err(err) => {
            eprintln!("{}: error: {}", program_name(), err);
            std::process::exit(ExitCode::GeneralError.as_i32());
        }
    }
}

/// Name the binary was invoked as.
fn program_name() -> String {
    std::env::args_os()
        .next()
        .and_then(|arg0| {
            Path::new(&arg0)
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
        })
        .unwrap_or_else(|| "dupes".to_string())
}
