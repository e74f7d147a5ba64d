//! Scanner module for path enumeration and file comparison.
//!
//! - [`walker`]: Collects the files under a source or target root
//! - [`compare`]: Decides whether two files are duplicates
//!
//! # Example
//!
//! ```no_run
//! use dupes::scanner::{collect_files, files_match, CompareMode, Role};
//! use std::path::Path;
//!
//! let sources = collect_files(Path::new("photos"), true, Role::Source);
//! let targets = collect_files(Path::new("backup"), true, Role::Target);
//!
//! for source in &sources {
//!     for target in &targets {
//!         if files_match(&source.path, &target.path, CompareMode::Deep).unwrap_or(false) {
//!             println!("{}", target.path.display());
//!         }
//!     }
//! }
//! ```

pub mod compare;
pub mod walker;

use std::path::PathBuf;

pub use compare::{contents_equal, files_match, CompareError, CompareMode};
pub use walker::{collect_files, Walker};

/// Which side of the scan a file belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    /// File being looked for.
    Source,
    /// File searched for duplicates.
    Target,
}

/// A collected file path and the side it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    /// Path as enumerated under its root
    pub path: PathBuf,
    /// Source or target
    pub role: Role,
}

impl FileEntry {
    /// Create a new FileEntry.
    #[must_use]
    pub fn new(path: PathBuf, role: Role) -> Self {
        Self { path, role }
    }
}

/// Errors that can occur during directory enumeration.
#[derive(thiserror::Error, Debug)]
pub enum ScanError {
    /// Permission was denied when listing a directory.
    #[error("Permission denied: {0}")]
    PermissionDenied(PathBuf),

    /// An I/O error occurred while listing a directory.
    #[error("I/O error for {path}: {source}")]
    Io {
        /// Path where the error occurred
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },
}

impl ScanError {
    /// Path of the directory that could not be listed.
    #[must_use]
    pub fn path(&self) -> &std::path::Path {
        match self {
            Self::PermissionDenied(p) | Self::Io { path: p, .. } => p,
        }
    }
}
