//! Duplicate predicate.
//!
//! Two modes are supported:
//! - [`CompareMode::Shallow`]: file names are equal; contents are never read
//! - [`CompareMode::Deep`]: contents are byte-for-byte equal; metadata such as
//!   mtime or permissions is ignored
//!
//! Deep comparison streams both files in fixed-size chunks after a cheap
//! length check, so memory use does not depend on file size. Nothing is
//! cached between calls.

use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::{Path, PathBuf};

/// Chunk size for streaming content comparison.
pub const COMPARE_CHUNK_SIZE: usize = 64 * 1024;

/// How two files are compared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CompareMode {
    /// File name equality only.
    Shallow,
    /// Byte-for-byte content equality.
    #[default]
    Deep,
}

/// Errors that can occur while comparing two files.
#[derive(thiserror::Error, Debug)]
pub enum CompareError {
    /// One of the files disappeared.
    #[error("File not found: {0}")]
    NotFound(PathBuf),

    /// Permission was denied when reading a file.
    #[error("Permission denied: {0}")]
    PermissionDenied(PathBuf),

    /// An I/O error occurred while reading a file.
    #[error("I/O error for {path}: {source}")]
    Io {
        /// Path where the error occurred
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: io::Error,
    },
}

impl CompareError {
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

/// Decide whether `a` and `b` are duplicates under `mode`.
///
/// # Errors
///
/// Only deep mode can fail, when either file cannot be opened or read.
pub fn files_match(a: &Path, b: &Path, mode: CompareMode) -> Result<bool, CompareError> {
    match mode {
        CompareMode::Shallow => Ok(a.file_name() == b.file_name()),
        CompareMode::Deep => contents_equal(a, b),
    }
}

/// Byte-for-byte content comparison.
///
/// # Errors
///
/// Returns a [`CompareError`] naming the file that could not be read.
pub fn contents_equal(a: &Path, b: &Path) -> Result<bool, CompareError> {
    let len_a = a.metadata().map_err(|e| CompareError::from_io(a, e))?.len();
    let len_b = b.metadata().map_err(|e| CompareError::from_io(b, e))?.len();
    if len_a != len_b {
        return Ok(false);
    }

    let mut reader_a = open(a)?;
    let mut reader_b = open(b)?;
    let mut buf_a = vec![0u8; COMPARE_CHUNK_SIZE];
    let mut buf_b = vec![0u8; COMPARE_CHUNK_SIZE];

    loop {
        let read_a = fill(&mut reader_a, &mut buf_a).map_err(|e| CompareError::from_io(a, e))?;
        let read_b = fill(&mut reader_b, &mut buf_b).map_err(|e| CompareError::from_io(b, e))?;

        if read_a != read_b || buf_a[..read_a] != buf_b[..read_b] {
            return Ok(false);
        }
        if read_a == 0 {
            return Ok(true);
        }
    }
}

fn open(path: &Path) -> Result<BufReader<File>, CompareError> {
    File::open(path)
        .map(BufReader::new)
        .map_err(|e| CompareError::from_io(path, e))
}

/// Read until `buf` is full or EOF; short reads are retried.
fn fill(reader: &mut impl Read, buf: &mut [u8]) -> io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}
