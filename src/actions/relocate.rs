//! Moving duplicates out of the target tree.
//!
//! # Naming
//!
//! The destination directory is the move root, or, with keep-tree, the move
//! root joined with the duplicate's parent directory relative to the target
//! root. Inside it the original name is tried first; on collision the
//! candidates are `stem_1.ext`, `stem_2.ext`, ... and the first free one wins.
//! An existing file is never overwritten.
//!
//! ```
//! use dupes::actions::relocate::candidate_name;
//! use std::ffi::OsStr;
//!
//! assert_eq!(candidate_name(OsStr::new("a.txt"), 0), "a.txt");
//! assert_eq!(candidate_name(OsStr::new("a.txt"), 2), "a_2.txt");
//! assert_eq!(candidate_name(OsStr::new("README"), 1), "README_1");
//! ```

use std::ffi::{OsStr, OsString};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Error type for move operations.
#[derive(Debug, Error)]
pub enum MoveError {
    /// The duplicate vanished before it could be moved.
    #[error("file not found: {0}")]
    NotFound(PathBuf),

    /// Permission denied on the duplicate or the destination.
    #[error("permission denied: {0}")]
    PermissionDenied(PathBuf),

    /// The duplicate path has no file name component.
    #[error("no file name: {0}")]
    NoFileName(PathBuf),

    /// General I/O error.
    #[error("I/O error for {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl MoveError {
    fn from_io(path: &Path, error: io::Error) -> Self {
        match error.kind() {
            io::ErrorKind::NotFound => Self::NotFound(path.to_path_buf()),
            io::ErrorKind::PermissionDenied => Self::PermissionDenied(path.to_path_buf()),
            _ => Self::Io {
                path: path.to_path_buf(),
                source: error,
            },
        }
    }
}

/// Directory a duplicate is moved into.
#[must_use]
pub fn destination_dir(
    destination_root: &Path,
    target_root: &Path,
    dupe: &Path,
    keep_tree: bool,
) -> PathBuf {
    if !keep_tree {
        return destination_root.to_path_buf();
    }

    let relative = dupe
        .parent()
        .and_then(|parent| parent.strip_prefix(target_root).ok())
        .unwrap_or_else(|| Path::new(""));
    destination_root.join(relative)
}

/// File name for collision trial `trial` (0 is the original name).
#[must_use]
pub fn candidate_name(file_name: &OsStr, trial: u64) -> OsString {
    if trial == 0 {
        return file_name.to_os_string();
    }

    let path = Path::new(file_name);
    let mut name = path.file_stem().unwrap_or(file_name).to_os_string();
    name.push(format!("_{trial}"));
    if let Some(ext) = path.extension() {
        name.push(".");
        name.push(ext);
    }
    name
}

/// First free path for `file_name` inside `dir`.
#[must_use]
pub fn unique_destination(dir: &Path, file_name: &OsStr) -> PathBuf {
    (0..)
        .map(|trial| dir.join(candidate_name(file_name, trial)))
        .find(|candidate| fs::symlink_metadata(candidate).is_err())
        .unwrap_or_else(|| dir.join(file_name))
}

/// Move `dupe` under `destination_root`, returning where it ended up.
///
/// # Errors
///
/// Returns a [`MoveError`] if the destination directory cannot be created or
/// the file cannot be moved. Nothing is rolled back.
pub fn relocate(
    dupe: &Path,
    destination_root: &Path,
    target_root: &Path,
    keep_tree: bool,
) -> Result<PathBuf, MoveError> {
    let file_name = dupe
        .file_name()
        .ok_or_else(|| MoveError::NoFileName(dupe.to_path_buf()))?;

    let dir = destination_dir(destination_root, target_root, dupe, keep_tree);
    if keep_tree {
        fs::create_dir_all(&dir).map_err(|e| MoveError::from_io(&dir, e))?;
    }

    let destination = unique_destination(&dir, file_name);
    move_file(dupe, &destination)?;
    Ok(destination)
}

/// Rename `src` to `dest`, copying across devices when needed.
///
/// # Errors
///
/// Returns a [`MoveError`] for the path that failed.
pub fn move_file(src: &Path, dest: &Path) -> Result<(), MoveError> {
    match fs::rename(src, dest) {
        Ok(()) => Ok(()),
        Err(err) if is_cross_device_error(&err) => {
            log::debug!(
                "Cross-device move, copying {} to {}",
                src.display(),
                dest.display()
            );
            if let Err(copy_err) = fs::copy(src, dest) {
                let _ = fs::remove_file(dest);
                return Err(MoveError::from_io(src, copy_err));
            }
            fs::remove_file(src).map_err(|e| MoveError::from_io(src, e))
        }
        Err(err) => Err(MoveError::from_io(src, err)),
    }
}

fn is_cross_device_error(err: &io::Error) -> bool {
    // EXDEV on Unix, ERROR_NOT_SAME_DEVICE on Windows
    if cfg!(windows) {
        err.raw_os_error() == Some(17)
    } else {
        err.raw_os_error() == Some(18)
    }
}
