//! Duplicate pairs and the list-mode registry.

use std::path::{Path, PathBuf};

use crate::scanner::FileEntry;

/// A source file and a target file that satisfy the duplicate predicate.
///
/// Created by the finder for one dispatch and dropped right after.
#[derive(Debug, Clone, Copy)]
pub struct DuplicatePair<'a> {
    /// File being looked for
    pub source: &'a FileEntry,
    /// Its duplicate under the target root
    pub dupe: &'a FileEntry,
}

impl<'a> DuplicatePair<'a> {
    /// Create a new pair.
    #[must_use]
    pub fn new(source: &'a FileEntry, dupe: &'a FileEntry) -> Self {
        Self { source, dupe }
    }
}

/// Target paths found to be duplicates, in discovery order.
///
/// Append-only; only the list action writes to it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DuplicateRegistry {
    paths: Vec<PathBuf>,
}

impl DuplicateRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a duplicate path.
    pub fn push(&mut self, path: &Path) {
        self.paths.push(path.to_path_buf());
    }

    /// Recorded paths in insertion order.
    #[must_use]
    pub fn paths(&self) -> &[PathBuf] {
        &self.paths
    }

    /// Number of recorded paths.
    #[must_use]
    pub fn len(&self) -> usize {
        self.paths.len()
    }

    /// `true` if nothing was recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    /// Write one path per line.
    ///
    /// # Errors
    ///
    /// Propagates write failures of `out`.
    pub fn write_to(&self, out: &mut dyn std::io::Write) -> std::io::Result<()> {
        for path in &self.paths {
            writeln!(out, "{}", path.display())?;
        }
        out.flush()
    }
}
