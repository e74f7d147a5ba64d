//! Deleting duplicates, with interactive confirmation.
//!
//! # Confirmation
//!
//! Unless `--no-confirm` is given every deletion is confirmed through a
//! [`Confirm`] implementation. The terminal one, [`Prompt`], asks:
//!
//! ```text
//! delete /backup/a.txt (duplicate of /photos/a.txt)? [Y/n/a/q]
//! ```
//!
//! - `y` / empty: delete this one, keep asking
//! - `n`: keep this one, keep asking
//! - `a`: delete this one and stop asking for the rest of the run
//! - `q`: stop the whole program with success status
//!
//! End of input counts as `q`. Anything else, including bytes that are not
//! valid UTF-8, is asked again.

use std::fs;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Error type for deletion operations.
#[derive(Debug, Error)]
pub enum DeleteError {
    /// File was not found (may have been deleted or moved).
    #[error("file not found: {0}")]
    NotFound(PathBuf),

    /// Permission denied when attempting to delete.
    #[error("permission denied: {0}")]
    PermissionDenied(PathBuf),

    /// General I/O error.
    #[error("I/O error for {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl DeleteError {
    /// Get the path associated with this error.
    #[must_use]
    pub fn path(&self) -> &Path {
        match self {
            Self::NotFound(p) | Self::PermissionDenied(p) | Self::Io { path: p, .. } => p,
        }
    }
}

/// Permanently delete a single file.
///
/// # Errors
///
/// - `NotFound` if the file doesn't exist
/// - `PermissionDenied` if deletion is not allowed
/// - `Io` for anything else
pub fn delete_file(path: &Path) -> Result<(), DeleteError> {
    fs::remove_file(path).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => DeleteError::NotFound(path.to_path_buf()),
        io::ErrorKind::PermissionDenied => DeleteError::PermissionDenied(path.to_path_buf()),
        _ => DeleteError::Io {
            path: path.to_path_buf(),
            source: e,
        },
    })
}

/// Answer to a delete confirmation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Answer {
    /// Delete this duplicate.
    Yes,
    /// Keep this duplicate.
    No,
    /// Delete this and every later duplicate without asking.
    All,
    /// Terminate the program.
    Quit,
}

impl Answer {
    /// Parse a typed answer. Empty input means [`Answer::Yes`].
    #[must_use]
    pub fn parse(input: &str) -> Option<Self> {
        match input.trim().to_ascii_lowercase().as_str() {
            "" | "y" | "yes" => Some(Self::Yes),
            "n" | "no" => Some(Self::No),
            "a" | "all" => Some(Self::All),
            "q" | "quit" => Some(Self::Quit),
            _ => None,
        }
    }
}

/// Source of delete confirmations.
pub trait Confirm {
    /// Ask whether `dupe`, a duplicate of `source`, should be deleted.
    ///
    /// # Errors
    ///
    /// Returns the I/O error of the underlying console.
    fn confirm(&mut self, dupe: &Path, source: &Path) -> io::Result<Answer>;
}

/// Line-based prompt over any reader and writer.
#[derive(Debug)]
pub struct Prompt<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Prompt<R, W> {
    /// Create a prompt reading answers from `input` and asking on `output`.
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Give back the output handle.
    pub fn into_output(self) -> W {
        self.output
    }
}

impl<R: BufRead, W: Write> Confirm for Prompt<R, W> {
    fn confirm(&mut self, dupe: &Path, source: &Path) -> io::Result<Answer> {
        let mut line = Vec::new();
        loop {
            write!(
                self.output,
                "delete {} (duplicate of {})? [Y/n/a/q] ",
                dupe.display(),
                source.display()
            )?;
            self.output.flush()?;

            line.clear();
            if self.input.read_until(b'\n', &mut line)? == 0 {
                writeln!(self.output)?;
                return Ok(Answer::Quit);
            }

            match Answer::parse(&String::from_utf8_lossy(&line)) {
                Some(answer) => return Ok(answer),
                None => writeln!(self.output, "please answer y, n, a or q")?,
            }
        }
    }
}
