//! # Gesture Lock Core
//!
//! Gesture capture and pattern matching for a touch lock-pattern widget.
//! Compiles to WASM so the same state machine runs in the browser and natively.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │               lock-core.wasm                │
//! ├─────────────────────────────────────────────┤
//! │  Grid Model      │  Gesture Session         │
//! │  - Anchor points │  - Square hit test       │
//! │  - Row-major idx │  - Pool / chosen split   │
//! │                  │  - Deferred reset timer  │
//! ├─────────────────────────────────────────────┤
//! │  Pattern Workflow│  Collaborator boundary   │
//! │  - Enrol/confirm │  - PatternStore          │
//! │  - Verify        │  - UiSink signals        │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! The [`GestureLock`] controller ties the layers together: pointer events go
//! in, [`Signal`]s come out through an injected [`UiSink`], and the accepted
//! pattern is persisted through an injected [`PatternStore`].

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod error;
pub mod event;
pub mod grid;
pub mod lock;
pub mod pattern;
pub mod session;
pub mod signal;
pub mod store;
pub mod timer;
pub mod workflow;

#[cfg(feature = "wasm")]
pub mod wasm;

pub use config::LockConfig;
pub use error::{LockError, LockResult, StoreError};
pub use event::{TouchEvent, TouchPhase, TouchPoint};
pub use grid::{matrix_in_range, AnchorPoint, Grid, MAX_MATRIX};
pub use lock::GestureLock;
pub use pattern::{sequences_equal, Pattern, StoredPattern};
pub use session::{GestureSession, SessionPhase};
pub use signal::{NullSink, Signal, UiSink};
pub use store::{FileStore, MemoryStore, PatternStore};
pub use timer::ResetTimer;
pub use workflow::{PatternWorkflow, WorkflowOutcome, WorkflowPhase, WorkflowState};

/// Lock core version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
