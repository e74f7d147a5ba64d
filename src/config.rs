//! Scan configuration.
//!
//! [`ScanConfig`] is the immutable, validated configuration a scan runs with.
//! It is built from the command line layered over user [`Settings`]:
//! defaults < config file < `DUPES_*` environment variables < CLI flags.

use directories::ProjectDirs;
use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::cli::{ActionArg, Cli};
use crate::error::ConfigError;
use crate::scanner::CompareMode;

/// User defaults loaded from the settings file and environment.
///
/// Every field is optional in the file. Boolean flags can only be switched
/// on from the command line, never off.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Expand subdirectories of both roots.
    pub recursive: bool,
    /// Compare file names only.
    pub shallow: bool,
    /// Stop after the first duplicate per source file.
    pub one: bool,
    /// Default action when `--action` is not given.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action: Option<ActionArg>,
    /// Default move destination.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub move_to: Option<PathBuf>,
    /// Preserve the target tree when moving.
    pub keep_tree: bool,
    /// Skip delete confirmation.
    pub no_confirm: bool,
}

impl Settings {
    /// Load settings from `path` (or the platform default) and the environment.
    ///
    /// A missing file yields the defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Settings`] if the file or an environment
    /// variable holds a value of the wrong type.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut figment = Figment::from(Serialized::defaults(Settings::default()));

        if let Some(file) = path.map(Path::to_path_buf).or_else(Self::default_path) {
            log::debug!("Reading settings from {}", file.display());
            figment = figment.merge(Toml::file(file));
        }

        figment
            .merge(Env::prefixed("DUPES_").ignore(&["config"]))
            .extract()
            .map_err(|e| ConfigError::Settings(e.to_string()))
    }

    /// Platform-specific settings path (`.../dupes/config.toml`).
    fn default_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", "dupes").map(|dirs| dirs.config_dir().join("config.toml"))
    }
}

/// What happens to each confirmed duplicate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Record the duplicate and print it at scan end.
    List,
    /// Move the duplicate under `destination`.
    Move {
        /// Destination root.
        destination: PathBuf,
        /// Mirror the duplicate's directory relative to the target root.
        keep_tree: bool,
    },
    /// Delete the duplicate.
    Delete {
        /// Ask before each deletion.
        confirm: bool,
    },
}

impl Action {
    /// Short name used in log lines.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Action::List => "list",
            Action::Move { .. } => "move",
            Action::Delete { .. } => "delete",
        }
    }
}

/// Validated scan configuration.
#[derive(Debug, Clone)]
pub struct ScanConfig {
    /// Root whose files are looked for.
    pub source: PathBuf,
    /// Root searched for duplicates.
    pub target: PathBuf,
    /// Expand subdirectories of both roots.
    pub recursive: bool,
    /// Name-only or content comparison.
    pub compare: CompareMode,
    /// Stop after the first duplicate per source file.
    pub one: bool,
    /// Action to dispatch on each duplicate.
    pub action: Action,
    /// Prefix every scan event with progress instead of drawing a status line.
    pub verbose: bool,
    /// Draw no progress at all.
    pub quiet: bool,
}

impl ScanConfig {
    /// Create a list-mode, non-recursive, content-comparing configuration.
    #[must_use]
    pub fn new(source: impl Into<PathBuf>, target: impl Into<PathBuf>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            recursive: false,
            compare: CompareMode::Deep,
            one: false,
            action: Action::List,
            verbose: false,
            quiet: true,
        }
    }

    /// Enable or disable recursion.
    #[must_use]
    pub fn with_recursive(mut self, recursive: bool) -> Self {
        self.recursive = recursive;
        self
    }

    /// Switch to name-only comparison.
    #[must_use]
    pub fn with_shallow(mut self, shallow: bool) -> Self {
        self.compare = if shallow {
            CompareMode::Shallow
        } else {
            CompareMode::Deep
        };
        self
    }

    /// Stop after the first duplicate per source file.
    #[must_use]
    pub fn with_one(mut self, one: bool) -> Self {
        self.one = one;
        self
    }

    /// Set the action.
    #[must_use]
    pub fn with_action(mut self, action: Action) -> Self {
        self.action = action;
        self
    }

    /// Set the progress style.
    #[must_use]
    pub fn with_output(mut self, verbose: bool, quiet: bool) -> Self {
        self.verbose = verbose;
        self.quiet = quiet;
        self
    }

    /// Build a configuration from the command line over the user settings.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] when the action combination is invalid or
    /// a root does not exist.
    pub fn from_cli(cli: &Cli, settings: &Settings) -> Result<Self, ConfigError> {
        let action = resolve_action(cli, settings)?;

        let config = Self {
            source: cli.source.clone(),
            target: cli.target.clone(),
            recursive: cli.recursive || settings.recursive,
            compare: CompareMode::Deep,
            one: cli.one || settings.one,
            action,
            verbose: cli.verbose > 0,
            quiet: cli.quiet,
        }
        .with_shallow(cli.shallow || settings.shallow);

        config.validate()
    }

    /// Check that both roots exist and resolve them to canonical paths.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingSource`] or [`ConfigError::MissingTarget`].
    pub fn validate(mut self) -> Result<Self, ConfigError> {
        self.source = self
            .source
            .canonicalize()
            .map_err(|_| ConfigError::MissingSource(self.source.clone()))?;
        self.target = self
            .target
            .canonicalize()
            .map_err(|_| ConfigError::MissingTarget(self.target.clone()))?;
        Ok(self)
    }
}

fn resolve_action(cli: &Cli, settings: &Settings) -> Result<Action, ConfigError> {
    let kind = match (cli.action, &cli.move_to) {
        (Some(ActionArg::Move) | None, Some(_)) => ActionArg::Move,
        (Some(other), Some(_)) => return Err(ConfigError::MoveConflictsWithAction(other.to_string())),
        (Some(explicit), None) => explicit,
        (None, None) => settings.action.unwrap_or_default(),
    };

    if cli.keep_tree && kind != ActionArg::Move {
        return Err(ConfigError::KeepTreeRequiresMove);
    }

    Ok(match kind {
        ActionArg::List => Action::List,
        ActionArg::Move => Action::Move {
            destination: cli
                .move_to
                .clone()
                .or_else(|| settings.move_to.clone())
                .filter(|dir| !dir.as_os_str().is_empty())
                .ok_or(ConfigError::MissingMoveDestination)?,
            keep_tree: cli.keep_tree || settings.keep_tree,
        },
        ActionArg::Delete => Action::Delete {
            confirm: !(cli.no_confirm || settings.no_confirm),
        },
    })
}
