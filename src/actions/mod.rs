//! Actions performed on confirmed duplicates.
//!
//! The [`Dispatcher`] owns the per-run action state:
//! - list: the [`DuplicateRegistry`] printed at scan end
//! - move: destination root and keep-tree flag (see [`relocate`])
//! - delete: the confirmation flag, switched off once by an "all" answer
//!   (see [`delete`])
//!
//! Per-item failures are reported as [`ActionOutcome::Failed`] for the
//! caller to log; they never abort the scan. Only a broken confirmation
//! console does.

pub mod delete;
pub mod relocate;

use std::io;
use std::path::{Path, PathBuf};

use crate::config::Action;
use crate::duplicates::{DuplicatePair, DuplicateRegistry};

pub use delete::{delete_file, Answer, Confirm, DeleteError, Prompt};
pub use relocate::{relocate, unique_destination, MoveError};

/// Result of dispatching one duplicate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionOutcome {
    /// Recorded in the registry.
    Listed,
    /// Moved to the given path.
    Moved(PathBuf),
    /// Deleted.
    Deleted,
    /// The user chose to keep it.
    Declined,
    /// The action failed and was skipped; carries the reason.
    Failed(String),
    /// The user asked to quit the program.
    Quit,
}

/// Performs the configured action on each duplicate.
#[derive(Debug)]
pub struct Dispatcher {
    action: Action,
    target_root: PathBuf,
    registry: DuplicateRegistry,
}

impl Dispatcher {
    /// Create a dispatcher for `action` on duplicates under `target_root`.
    #[must_use]
    pub fn new(action: Action, target_root: &Path) -> Self {
        Self {
            action,
            target_root: target_root.to_path_buf(),
            registry: DuplicateRegistry::new(),
        }
    }

    /// Act on one confirmed duplicate pair.
    ///
    /// # Errors
    ///
    /// Returns the I/O error of the confirmation console. Failures of the
    /// action itself are reported as [`ActionOutcome::Failed`].
    pub fn act(
        &mut self,
        pair: DuplicatePair<'_>,
        confirm: &mut dyn Confirm,
    ) -> io::Result<ActionOutcome> {
        let dupe = pair.dupe.path.as_path();

        let outcome = match &mut self.action {
            Action::List => {
                self.registry.push(dupe);
                ActionOutcome::Listed
            }
            Action::Move {
                destination,
                keep_tree,
            } => match relocate(dupe, destination, &self.target_root, *keep_tree) {
                Ok(moved_to) => ActionOutcome::Moved(moved_to),
                Err(MoveError::PermissionDenied(path)) => ActionOutcome::Failed(format!(
                    "permission denied, not moved: {}",
                    path.display()
                )),
                Err(e) => ActionOutcome::Failed(format!("cannot move {}: {}", dupe.display(), e)),
            },
            Action::Delete { confirm: ask } => {
                if *ask {
                    match confirm.confirm(dupe, &pair.source.path)? {
                        Answer::Yes => {}
                        Answer::All => *ask = false,
                        Answer::No => return Ok(ActionOutcome::Declined),
                        Answer::Quit => return Ok(ActionOutcome::Quit),
                    }
                }

                match delete_file(dupe) {
                    Ok(()) => ActionOutcome::Deleted,
                    Err(e) => ActionOutcome::Failed(format!(
                        "cannot delete {}: {}",
                        e.path().display(),
                        e
                    )),
                }
            }
        };
        Ok(outcome)
    }

    /// The action as currently configured (delete confirmation may have been switched off).
    #[must_use]
    pub fn action(&self) -> &Action {
        &self.action
    }

    /// Duplicates recorded by the list action.
    #[must_use]
    pub fn registry(&self) -> &DuplicateRegistry {
        &self.registry
    }

    /// Consume the dispatcher, keeping the registry.
    #[must_use]
    pub fn into_registry(self) -> DuplicateRegistry {
        self.registry
    }
}
