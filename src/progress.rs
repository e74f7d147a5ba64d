//! Scan progress: completion percentage and ETA.
//!
//! [`ProgressState`] is the pure part: it turns the current pair indices into
//! a [`ProgressDisplay`]. The ETA is an instantaneous-rate estimate: the time
//! since the previous tick multiplied by the pairs still to go. It is noisy
//! but costs nothing.
//!
//! [`Progress`] renders that display with indicatif:
//! - default: one overwriting status line on stderr
//! - verbose: no status line, the display prefixes every scan event and
//!   every skipped failure instead
//! - quiet: nothing

use std::fmt;
use std::path::Path;
use std::time::{Duration, Instant};

use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};

/// Largest minute count the ETA can show.
const MAX_ETA_MINUTES: u64 = 99;

/// Percentage and ETA for the pair just examined.
#[derive(Debug, Clone, PartialEq)]
pub struct ProgressDisplay {
    /// Completion, floored to two decimals.
    pub percent: f64,
    /// ETA as `MM:SS`.
    pub eta: String,
}

impl fmt::Display for ProgressDisplay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{:6.2}% ETA {}]", self.percent, self.eta)
    }
}

/// Mutable progress counters for one scan.
#[derive(Debug, Clone)]
pub struct ProgressState {
    /// Index of the source file being checked.
    pub source_index: usize,
    /// Index of the target file being checked.
    pub target_index: usize,
    /// `|source| * |target|`.
    pub total_pairs: u64,
    last_tick: Instant,
    eta: String,
}

impl ProgressState {
    /// Reset counters at scan start.
    #[must_use]
    pub fn new(source_count: usize, target_count: usize) -> Self {
        Self::starting_at(source_count, target_count, Instant::now())
    }

    /// Reset counters with an explicit start instant.
    #[must_use]
    pub fn starting_at(source_count: usize, target_count: usize, start: Instant) -> Self {
        Self {
            source_index: 0,
            target_index: 0,
            total_pairs: source_count as u64 * target_count as u64,
            last_tick: start,
            eta: format_eta(0),
        }
    }

    /// Record that pair (`source_index`, `target_index`) is being examined.
    pub fn tick(
        &mut self,
        source_index: usize,
        target_index: usize,
        target_count: usize,
    ) -> ProgressDisplay {
        self.tick_at(source_index, target_index, target_count, Instant::now())
    }

    /// [`tick`](Self::tick) with an explicit clock reading.
    pub fn tick_at(
        &mut self,
        source_index: usize,
        target_index: usize,
        target_count: usize,
        now: Instant,
    ) -> ProgressDisplay {
        self.source_index = source_index;
        self.target_index = target_index;

        let current = current_pair(source_index, target_index, target_count);
        let remaining = self.total_pairs.saturating_sub(current);
        let since_last = now.saturating_duration_since(self.last_tick);
        self.last_tick = now;
        self.eta = format_eta(estimate_seconds(since_last, remaining));

        ProgressDisplay {
            percent: percent(current, self.total_pairs),
            eta: self.eta.clone(),
        }
    }

    /// Most recent ETA string.
    #[must_use]
    pub fn eta(&self) -> &str {
        &self.eta
    }
}

/// 1-based number of the pair at (`source_index`, `target_index`).
#[must_use]
pub fn current_pair(source_index: usize, target_index: usize, target_count: usize) -> u64 {
    source_index as u64 * target_count as u64 + target_index as u64 + 1
}

/// `floor(current / total * 10000) / 100`.
#[must_use]
pub fn percent(current: u64, total: u64) -> f64 {
    if total == 0 {
        return 100.0;
    }
    let basis_points = u128::from(current) * 10_000 / u128::from(total);
    basis_points as f64 / 100.0
}

/// Linear extrapolation of the last tick interval over the remaining pairs.
#[must_use]
pub fn estimate_seconds(since_last: Duration, remaining: u64) -> u64 {
    (since_last.as_secs_f64() * remaining as f64) as u64
}

/// Format seconds as `MM:SS`; anything past 99 minutes shows `99:99`.
#[must_use]
pub fn format_eta(seconds: u64) -> String {
    let minutes = seconds / 60;
    if minutes > MAX_ETA_MINUTES {
        return "99:99".to_string();
    }
    format!("{:02}:{:02}", minutes, seconds % 60)
}

enum Mode {
    Hidden,
    StatusLine(ProgressBar),
    Events,
}

/// Progress renderer for the scan loop.
pub struct Progress {
    mode: Mode,
    prefix: String,
}

impl Progress {
    /// Create a renderer for the given output flags.
    #[must_use]
    pub fn new(verbose: bool, quiet: bool) -> Self {
        let mode = if quiet {
            Mode::Hidden
        } else if verbose {
            Mode::Events
        } else {
            let pb = ProgressBar::with_draw_target(None, ProgressDrawTarget::stderr());
            pb.set_style(
                ProgressStyle::with_template("{msg}")
                    .unwrap_or_else(|_| ProgressStyle::default_spinner()),
            );
            Mode::StatusLine(pb)
        };

        Self {
            mode,
            prefix: String::new(),
        }
    }

    /// Renderer that draws nothing.
    #[must_use]
    pub fn hidden() -> Self {
        Self::new(false, true)
    }

    /// Show the display for the pair whose source is `source`.
    pub fn update(&mut self, display: &ProgressDisplay, source: &Path) {
        self.prefix = display.to_string();

        if let Mode::StatusLine(pb) = &self.mode {
            let name = source
                .file_name()
                .map(|n| n.to_string_lossy())
                .unwrap_or_default();
            pb.set_message(format!("{} {}", self.prefix, name));
        }
    }

    /// Report a scan event (duplicate found, moved, deleted...).
    pub fn event(&self, message: &str) {
        match &self.mode {
            Mode::Events => log::info!("{} {}", self.prefix, message),
            Mode::StatusLine(pb) => pb.suspend(|| log::debug!("{}", message)),
            Mode::Hidden => log::debug!("{}", message),
        }
    }

    /// Report a per-item failure the scan skips over.
    pub fn warn(&self, message: &str) {
        match &self.mode {
            Mode::Events => log::warn!("{} {}", self.prefix, message),
            Mode::StatusLine(pb) => pb.suspend(|| log::warn!("{}", message)),
            Mode::Hidden => log::warn!("{}", message),
        }
    }

    /// Run `f` with the status line cleared.
    pub fn suspend<F: FnOnce() -> R, R>(&self, f: F) -> R {
        match &self.mode {
            Mode::StatusLine(pb) => pb.suspend(f),
            _ => f(),
        }
    }

    /// Remove the status line.
    pub fn finish(&self) {
        if let Mode::StatusLine(pb) = &self.mode {
            pb.finish_and_clear();
        }
    }
}
