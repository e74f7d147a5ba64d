//! The scan loop.
//!
//! # Overview
//!
//! [`DuplicateFinder::run`] drives one scan:
//! 1. Create the move destination (move action only; failure is fatal)
//! 2. Collect source and target files
//! 3. For each source (outer) and each target (inner), in collection order:
//!    tick progress, skip targets that vanished, compare, dispatch on match,
//!    and with `one` set move on to the next source after the first match
//! 4. In list mode, print the registry one path per line
//!
//! Every source is compared with every target, so a scan costs
//! |source| × |target| comparisons. No content index is built; this is a
//! known scalability limit.
//!
//! # Example
//!
//! ```no_run
//! use dupes::actions::Prompt;
//! use dupes::config::ScanConfig;
//! use dupes::duplicates::DuplicateFinder;
//! use std::io;
//!
//! let config = ScanConfig::new("photos", "backup").with_recursive(true);
//! let mut prompt = Prompt::new(io::stdin().lock(), io::stderr());
//! let report = DuplicateFinder::new(config)
//!     .run(&mut prompt, &mut io::stdout())
//!     .unwrap();
//! eprintln!("{}", report.summary());
//! ```

use std::fs;
use std::io::{self, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::actions::{ActionOutcome, Confirm, Dispatcher};
use crate::config::{Action, ScanConfig};
use crate::duplicates::{DuplicatePair, DuplicateRegistry};
use crate::error::ConfigError;
use crate::progress::{Progress, ProgressState};
use crate::scanner::{collect_files, files_match, CompareError, Role};

/// Errors that stop a scan.
#[derive(Debug, thiserror::Error)]
pub enum FinderError {
    /// Fatal configuration problem found at scan start.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The delete confirmation could not be read.
    #[error("cannot read confirmation: {0}")]
    Prompt(#[source] io::Error),

    /// The duplicate list could not be written.
    #[error("cannot write duplicate list: {0}")]
    Output(#[from] io::Error),
}

/// Summary of a finished scan.
#[derive(Debug, Clone, Default)]
pub struct ScanReport {
    /// Number of source files collected
    pub source_files: usize,
    /// Number of target files collected
    pub target_files: usize,
    /// Pairs ticked through progress
    pub pairs_examined: u64,
    /// Pairs that satisfied the duplicate predicate
    pub duplicates: usize,
    /// Duplicates moved
    pub moved: usize,
    /// Duplicates deleted
    pub deleted: usize,
    /// Duplicates the user chose to keep
    pub declined: usize,
    /// Actions that failed and were skipped
    pub failed: usize,
    /// Targets that disappeared before they could be compared
    pub vanished: usize,
    /// Duplicates recorded by the list action, in discovery order
    pub registry: DuplicateRegistry,
    /// The user quit from a delete prompt
    pub quit: bool,
    /// Ctrl+C stopped the scan
    pub interrupted: bool,
}

impl ScanReport {
    /// One-line human-readable summary.
    #[must_use]
    pub fn summary(&self) -> String {
        let mut line = format!(
            "{} source × {} target files, {} duplicate(s)",
            self.source_files, self.target_files, self.duplicates
        );
        for (count, label) in [
            (self.moved, "moved"),
            (self.deleted, "deleted"),
            (self.declined, "kept"),
            (self.failed, "failed"),
        ] {
            if count > 0 {
                line.push_str(&format!(", {count} {label}"));
            }
        }
        line
    }
}

/// Runs a scan for one [`ScanConfig`].
#[derive(Debug)]
pub struct DuplicateFinder {
    config: ScanConfig,
    shutdown_flag: Option<Arc<AtomicBool>>,
}

impl DuplicateFinder {
    /// Create a finder for `config`.
    #[must_use]
    pub fn new(config: ScanConfig) -> Self {
        Self {
            config,
            shutdown_flag: None,
        }
    }

    /// Set the shutdown flag polled before every pair.
    #[must_use]
    pub fn with_shutdown_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.shutdown_flag = Some(flag);
        self
    }

    fn is_shutdown_requested(&self) -> bool {
        self.shutdown_flag
            .as_ref()
            .is_some_and(|f| f.load(Ordering::SeqCst))
    }

    /// Run the scan.
    ///
    /// Delete confirmations are read through `confirm`; the list-mode
    /// registry is written to `out`.
    ///
    /// # Errors
    ///
    /// Returns [`FinderError::Config`] if the move destination cannot be
    /// created, [`FinderError::Prompt`] if a confirmation cannot be read and
    /// [`FinderError::Output`] if `out` fails. Per-item problems are logged
    /// and skipped.
    pub fn run(
        &self,
        confirm: &mut dyn Confirm,
        out: &mut dyn Write,
    ) -> Result<ScanReport, FinderError> {
        let config = &self.config;

        if let Action::Move { destination, .. } = &config.action {
            fs::create_dir_all(destination).map_err(|source| ConfigError::CreateDestination {
                path: destination.clone(),
                source,
            })?;
        }

        let sources = collect_files(&config.source, config.recursive, Role::Source);
        let targets = collect_files(&config.target, config.recursive, Role::Target);
        log::debug!(
            "Comparing {} source × {} target files ({:?}, action {})",
            sources.len(),
            targets.len(),
            config.compare,
            config.action.name()
        );

        let mut report = ScanReport {
            source_files: sources.len(),
            target_files: targets.len(),
            ..ScanReport::default()
        };
        let mut state = ProgressState::new(sources.len(), targets.len());
        let mut progress = Progress::new(config.verbose, config.quiet);
        let mut dispatcher = Dispatcher::new(config.action.clone(), &config.target);

        'sources: for (source_index, source) in sources.iter().enumerate() {
            for (target_index, target) in targets.iter().enumerate() {
                if self.is_shutdown_requested() {
                    report.interrupted = true;
                    break 'sources;
                }

                let display = state.tick(source_index, target_index, targets.len());
                progress.update(&display, &source.path);
                report.pairs_examined += 1;

                if !target.path.exists() {
                    log::debug!("Target vanished: {}", target.path.display());
                    report.vanished += 1;
                    continue;
                }
                if source.path == target.path {
                    continue;
                }

                match files_match(&source.path, &target.path, config.compare) {
                    Ok(true) => {}
                    Ok(false) => continue,
                    Err(CompareError::NotFound(path)) => {
                        log::debug!("Vanished during comparison: {}", path.display());
                        report.vanished += 1;
                        continue;
                    }
                    Err(e) => {
                        progress.warn(&format!("cannot compare: {e}"));
                        continue;
                    }
                }

                report.duplicates += 1;
                progress.event(&format!(
                    "duplicate found: {} (of {})",
                    target.path.display(),
                    source.path.display()
                ));

                let pair = DuplicatePair::new(source, target);
                let outcome = match progress.suspend(|| dispatcher.act(pair, confirm)) {
                    Ok(outcome) => outcome,
                    Err(e) => {
                        progress.finish();
                        return Err(FinderError::Prompt(e));
                    }
                };
                match outcome {
                    ActionOutcome::Listed => {}
                    ActionOutcome::Moved(to) => {
                        report.moved += 1;
                        progress.event(&format!("moved to {}", to.display()));
                    }
                    ActionOutcome::Deleted => {
                        report.deleted += 1;
                        progress.event(&format!("deleted {}", target.path.display()));
                    }
                    ActionOutcome::Declined => {
                        report.declined += 1;
                        progress.event(&format!("kept {}", target.path.display()));
                    }
                    ActionOutcome::Failed(reason) => {
                        report.failed += 1;
                        progress.warn(&reason);
                    }
                    ActionOutcome::Quit => {
                        report.quit = true;
                        break 'sources;
                    }
                }

                if config.one {
                    break;
                }
            }
        }

        progress.finish();
        report.registry = dispatcher.into_registry();

        if report.quit {
            log::debug!("Quit requested from delete prompt");
            return Ok(report);
        }
        if matches!(config.action, Action::List) {
            report.registry.write_to(out)?;
        }

        log::info!("{}", report.summary());
        Ok(report)
    }
}
