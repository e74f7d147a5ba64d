//! Duplicate detection module.
//!
//! - [`registry`]: Confirmed duplicate pairs and the list-mode registry
//! - [`finder`]: The scan loop over source × target

pub mod finder;
pub mod registry;

pub use finder::{DuplicateFinder, FinderError, ScanReport};
pub use registry::{DuplicatePair, DuplicateRegistry};
