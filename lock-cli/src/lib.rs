//! # Gesture Lock CLI
//!
//! Native host for the gesture lock. Gestures are either traced through
//! anchor indices or replayed from a JSON script of touch events, and the
//! accepted pattern is kept in a JSON file.
//!
//! ## Usage
//!
//! ```bash
//! # Enrol 1-5-9 (draw it twice), then unlock with it
//! gesture-lock trace 1,5,9 1,5,9
//! gesture-lock trace 1,5,9
//!
//! # Replay recorded touch events on a 4x4 grid
//! gesture-lock --matrix 4 replay touches.json
//!
//! gesture-lock status
//! gesture-lock reset
//! ```

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]

use std::{
    fmt,
    path::{Path, PathBuf},
    str::FromStr,
    time::Duration,
};

use clap::{Parser, Subcommand};
use lock_core::{
    FileStore, GestureLock, LockConfig, LockError, PatternStore, StoreError, TouchEvent,
    TouchPhase, UiSink, WorkflowOutcome,
};
use lock_renderer::LockView;

/// Milliseconds between synthesized touch events.
const TRACE_STEP_MS: u64 = 16;

/// Command-line arguments for gesture-lock.
#[derive(Debug, Clone, Parser)]
#[command(name = "gesture-lock")]
#[command(about = "Gesture lock pattern enrolment and verification")]
#[command(version)]
pub struct CliArgs {
    /// Grid side length. A stored pattern's own size takes precedence.
    #[arg(long, env = "GESTURE_LOCK_MATRIX", default_value = "3")]
    pub matrix: u32,

    /// Surface width in pixels
    #[arg(long, default_value = "300")]
    pub width: u32,

    /// Surface height in pixels
    #[arg(long, default_value = "300")]
    pub height: u32,

    /// Directory holding the stored pattern
    #[arg(long, env = "GESTURE_LOCK_DATA_DIR", default_value = ".gesture-lock")]
    pub data_dir: PathBuf,

    /// Command to run
    #[command(subcommand)]
    pub command: Command,
}

/// gesture-lock subcommands.
#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Draw one gesture per argument through comma-separated anchor indices
    Trace {
        /// Gestures, e.g. `1,2,3 1,2,3`
        #[arg(required = true)]
        gestures: Vec<Gesture>,
    },
    /// Replay a JSON array of touch events
    Replay {
        /// Script file
        file: PathBuf,
    },
    /// Show the workflow state and stored pattern
    Status,
    /// Forget the stored pattern
    Reset,
}

/// Anchor indices of one traced gesture.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Gesture(pub Vec<u32>);

impl FromStr for Gesture {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let indices = s
            .split(',')
            .map(|part| {
                part.trim()
                    .parse::<u32>()
                    .map_err(|e| format!("invalid anchor index {part:?}: {e}"))
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self(indices))
    }
}

impl fmt::Display for Gesture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.0.iter().map(ToString::to_string).collect();
        write!(f, "{}", parts.join(","))
    }
}

/// Host configuration derived from the command line.
#[derive(Debug, Clone)]
pub struct CliConfig {
    /// Lock configuration.
    pub lock: LockConfig,
    /// Directory holding `pattern.json`.
    pub data_dir: PathBuf,
}

impl From<&CliArgs> for CliConfig {
    #[allow(clippy::cast_precision_loss)]
    fn from(args: &CliArgs) -> Self {
        Self {
            lock: LockConfig::new(args.width as f32, args.height as f32)
                .with_matrix(args.matrix),
            data_dir: args.data_dir.clone(),
        }
    }
}

/// Errors from the CLI host.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Traced index is not on the grid.
    #[error("anchor {index} is not on the {matrix}x{matrix} grid")]
    UnknownAnchor {
        /// Requested index.
        index: u32,
        /// Current grid size.
        matrix: u32,
    },

    /// Replay script could not be read.
    #[error("cannot read script {path}: {source}")]
    ScriptIo {
        /// Script path.
        path: PathBuf,
        /// Underlying error.
        source: std::io::Error,
    },

    /// Replay script is not a JSON array of touch events.
    #[error("invalid script {path}: {source}")]
    ScriptFormat {
        /// Script path.
        path: PathBuf,
        /// Underlying error.
        source: serde_json::Error,
    },

    /// Lock error.
    #[error(transparent)]
    Lock(#[from] LockError),

    /// Store error.
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Result type for the CLI host.
pub type CliResult<T> = Result<T, CliError>;

/// The lock as the CLI runs it.
pub type CliLock = GestureLock<FileStore, LockView>;

/// Outcome of one gesture as shown to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GestureReport {
    /// Workflow outcome, `None` for an empty or ignored gesture.
    pub outcome: Option<WorkflowOutcome>,
    /// Status title right after the gesture.
    pub title: &'static str,
}

/// Open the lock over the file store in the configured data directory.
///
/// # Errors
///
/// Returns an error if the data directory cannot be created or the
/// configuration is invalid.
pub fn open_lock(config: &CliConfig) -> CliResult<CliLock> {
    let store = FileStore::with_data_dir(&config.data_dir)?;
    tracing::debug!(path = %store.path().display(), "Using pattern file");
    Ok(GestureLock::new(config.lock.clone(), store, LockView::new())?)
}

/// Draw a gesture through the centres of `indices`, then let the deferred
/// reset run so the next gesture is accepted.
///
/// # Errors
///
/// Returns [`CliError::UnknownAnchor`] for an index off the grid and
/// propagates storage failures from the workflow.
pub fn trace_gesture<S: PatternStore>(
    lock: &mut GestureLock<S, LockView>,
    indices: &[u32],
) -> CliResult<GestureReport> {
    let matrix = lock.grid().matrix();
    let centres = indices
        .iter()
        .map(|&index| {
            lock.grid()
                .get(index)
                .map(|p| (p.x, p.y))
                .ok_or(CliError::UnknownAnchor { index, matrix })
        })
        .collect::<CliResult<Vec<_>>>()?;

    let mut events = Vec::with_capacity(centres.len() + 1);
    let mut timestamp_ms = 0;
    for (i, (x, y)) in centres.into_iter().enumerate() {
        let phase = if i == 0 {
            TouchPhase::Start
        } else {
            TouchPhase::Move
        };
        events.push(TouchEvent::single(phase, x, y, timestamp_ms));
        timestamp_ms += TRACE_STEP_MS;
    }
    events.push(TouchEvent::new(TouchPhase::End, Vec::new(), timestamp_ms));

    let mut outcome = None;
    for event in &events {
        if let Some(result) = lock.handle_touch(event)? {
            outcome = Some(result);
        }
    }
    let report = GestureReport {
        outcome,
        title: lock.sink().title(),
    };
    let delay = lock.config().reset_delay();
    lock.advance(delay);
    Ok(report)
}

/// Read a replay script: a JSON array of touch events.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed.
pub fn load_script(path: &Path) -> CliResult<Vec<TouchEvent>> {
    let raw = std::fs::read_to_string(path).map_err(|source| CliError::ScriptIo {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&raw).map_err(|source| CliError::ScriptFormat {
        path: path.to_path_buf(),
        source,
    })
}

/// Feed recorded events to the lock. Time between events, taken from their
/// timestamps, drives the deferred reset. Returns the outcome of every
/// judged gesture in order.
///
/// # Errors
///
/// Propagates storage failures from the workflow.
pub fn replay<S: PatternStore, U: UiSink>(
    lock: &mut GestureLock<S, U>,
    events: &[TouchEvent],
) -> CliResult<Vec<WorkflowOutcome>> {
    let mut outcomes = Vec::new();
    let mut last_ms = events.first().map_or(0, |e| e.timestamp_ms);
    for event in events {
        let elapsed = event.timestamp_ms.saturating_sub(last_ms);
        last_ms = event.timestamp_ms;
        if elapsed > 0 {
            lock.advance(Duration::from_millis(elapsed));
        }
        if let Some(outcome) = lock.handle_touch(event)? {
            tracing::info!(outcome = outcome.as_str(), "Gesture judged");
            outcomes.push(outcome);
        }
    }
    Ok(outcomes)
}
