//! Path collection for the source and target roots.
//!
//! # Overview
//!
//! [`Walker`] enumerates the files under a root with [`walkdir`], depth-first
//! and in the platform's natural directory-listing order. Nothing is sorted
//! or deduplicated.
//!
//! - The root's immediate children are always listed.
//! - `recursive` decides whether subdirectories are expanded further.
//! - A root that is a plain file yields exactly itself.
//! - A directory that cannot be listed is reported once and contributes no
//!   entries; its siblings are still walked.
//!
//! Only regular files are yielded. Symlinks are never descended into; a
//! symlink is yielded when it resolves to a regular file and skipped when it
//! points at a directory or nowhere. Sockets, FIFOs and devices are skipped.

use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use super::{FileEntry, Role, ScanError};

/// Depth-first file enumerator for one root.
#[derive(Debug, Clone)]
pub struct Walker {
    root: PathBuf,
    recursive: bool,
}

impl Walker {
    /// Create a new walker for the given root.
    #[must_use]
    pub fn new(root: &Path, recursive: bool) -> Self {
        Self {
            root: root.to_path_buf(),
            recursive,
        }
    }

    /// Walk the root, yielding file paths.
    ///
    /// Errors are yielded as [`ScanError`] values rather than stopping iteration.
    pub fn walk(&self) -> impl Iterator<Item = Result<PathBuf, ScanError>> + '_ {
        let is_dir = self.root.is_dir();

        let single = (!is_dir).then(|| Ok(self.root.clone())).into_iter();

        let max_depth = if self.recursive { usize::MAX } else { 1 };
        let tree = is_dir
            .then(|| {
                WalkDir::new(&self.root)
                    .min_depth(1)
                    .max_depth(max_depth)
                    .into_iter()
            })
            .into_iter()
            .flatten()
            .filter_map(move |entry| match entry {
                Ok(entry) if entry.file_type().is_file() => Some(Ok(entry.into_path())),
                Ok(entry) if entry.file_type().is_symlink() => {
                    Self::resolve_symlink(entry.into_path())
                }
                Ok(entry) if entry.file_type().is_dir() => None,
                Ok(entry) => {
                    log::trace!("Skipping special file: {}", entry.path().display());
                    None
                }
                Err(e) => Some(Err(self.handle_walk_error(e))),
            });

        single.chain(tree)
    }

    /// Keep a symlink only if it resolves to a regular file.
    fn resolve_symlink(path: PathBuf) -> Option<Result<PathBuf, ScanError>> {
        match std::fs::metadata(&path) {
            Ok(metadata) if metadata.is_file() => Some(Ok(path)),
            Ok(_) => {
                log::trace!("Skipping symlink to non-file: {}", path.display());
                None
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                log::debug!("Skipping dangling symlink: {}", path.display());
                None
            }
            Err(e) => Some(Err(Self::handle_io_error(path, e))),
        }
    }

    /// Convert a walkdir error, logging it.
    fn handle_walk_error(&self, error: walkdir::Error) -> ScanError {
        let path = error
            .path()
            .map_or_else(|| self.root.clone(), Path::to_path_buf);
        let source = error
            .into_io_error()
            .unwrap_or_else(|| std::io::Error::other("filesystem loop"));
        Self::handle_io_error(path, source)
    }

    /// Classify an I/O error for `path`, logging it.
    fn handle_io_error(path: PathBuf, source: std::io::Error) -> ScanError {
        if source.kind() == std::io::ErrorKind::PermissionDenied {
            log::warn!("Permission denied, skipping: {}", path.display());
            ScanError::PermissionDenied(path)
        } else {
            log::warn!("Cannot read {}: {}", path.display(), source);
            ScanError::Io { path, source }
        }
    }
}

/// Collect every file under `root` as entries of the given role.
///
/// Listing failures are logged by the walker and skipped.
#[must_use]
pub fn collect_files(root: &Path, recursive: bool, role: Role) -> Vec<FileEntry> {
    let files: Vec<FileEntry> = Walker::new(root, recursive)
        .walk()
        .filter_map(Result::ok)
        .map(|path| FileEntry::new(path, role))
        .collect();

    log::debug!(
        "Collected {} {:?} files under {}",
        files.len(),
        role,
        root.display()
    );
    files
}
