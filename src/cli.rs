//! Command-line interface definitions for dupes.
//!
//! # Example
//!
//! ```bash
//! # List files under backup/ that duplicate files under photos/
//! dupes photos/ backup/ --recursive
//!
//! # Compare names only and stop at the first hit per source file
//! dupes photos/ backup/ -r -s -1
//!
//! # Move duplicates away, keeping the backup/ directory layout
//! dupes photos/ backup/ -r --move /tmp/dupes --keep-tree
//!
//! # Delete duplicates without asking
//! dupes photos/ backup/ -r --action delete --no-confirm
//! ```

use clap::{Parser, ValueEnum};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Duplicate files checker.
///
/// Looks for files under TARGET that duplicate files under SOURCE and lists,
/// moves or deletes them.
#[derive(Debug, Parser)]
#[command(name = "dupes")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// File or directory to be looked for
    #[arg(value_name = "SOURCE")]
    pub source: PathBuf,

    /// File or directory to look for duplicates in
    #[arg(value_name = "TARGET")]
    pub target: PathBuf,

    /// Check source and target recursively
    #[arg(short, long, short_alias = 'R')]
    pub recursive: bool,

    /// Compare only file names
    #[arg(short, long)]
    pub shallow: bool,

    /// Assume only one possible duplicate per source file
    #[arg(short = '1', long)]
    pub one: bool,

    /// What to do with duplicates [default: list]
    #[arg(long, value_enum)]
    pub action: Option<ActionArg>,

    /// Move duplicates into DIR (implies --action move)
    #[arg(long = "move", value_name = "DIR")]
    pub move_to: Option<PathBuf>,

    /// Recreate the target directory structure under the move destination
    #[arg(long)]
    pub keep_tree: bool,

    /// Do not ask before deleting
    #[arg(long)]
    pub no_confirm: bool,

    /// Log every scan event prefixed with progress (-vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress all output except errors and the duplicate list
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Settings file to use instead of the platform default
    #[arg(long, value_name = "FILE", env = "DUPES_CONFIG")]
    pub config: Option<PathBuf>,
}

/// Action performed on each duplicate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionArg {
    /// Print duplicate paths once the scan is done
    #[default]
    List,
    /// Move duplicates into the --move directory
    Move,
    /// Delete duplicates (asks first unless --no-confirm)
    Delete,
}

impl std::fmt::Display for ActionArg {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ActionArg::List => write!(f, "list"),
            ActionArg::Move => write!(f, "move"),
            ActionArg::Delete => write!(f, "delete"),
        }
    }
}
