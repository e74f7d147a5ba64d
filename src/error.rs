//! Exit codes and fatal configuration errors.

use std::path::PathBuf;

/// Exit codes for the dupes application.
///
/// - 0: Success (scan completed, or the user quit from a delete prompt)
/// - 1: General error (configuration error or unexpected failure)
/// - 130: Interrupted by user (Ctrl+C)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
    /// Success: Scan completed normally or was quit from a prompt.
    Success = 0,
    /// General error: Configuration error or unexpected failure.
    GeneralError = 1,
    /// Interrupted: Scan was interrupted by user (Ctrl+C).
    Interrupted = 130,
}

impl ExitCode {
    /// Get the numeric exit code.
    #[must_use]
    pub fn as_i32(self) -> i32 {
        self as i32
    }
}

/// Fatal configuration errors.
///
/// Any of these aborts the run before (or right at) the start of the scan.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The source root does not exist.
    #[error("source file or directory doesn't exist: {0}")]
    MissingSource(PathBuf),

    /// The target root does not exist.
    #[error("target file or directory doesn't exist: {0}")]
    MissingTarget(PathBuf),

    /// Move action requested without a destination directory.
    #[error("move action requires a destination directory (--move DIR)")]
    MissingMoveDestination,

    /// A destination was given together with a non-move action.
    #[error("--move cannot be combined with --action {0}")]
    MoveConflictsWithAction(String),

    /// `--keep-tree` without the move action.
    #[error("--keep-tree is only valid with the move action")]
    KeepTreeRequiresMove,

    /// The move destination could not be created.
    #[error("cannot create move destination {path}: {source}")]
    CreateDestination {
        /// Destination directory
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// The layered settings could not be loaded.
    #[error("invalid configuration: {0}")]
    Settings(String),
}
