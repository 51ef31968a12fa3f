//! Core application types and state management.
//!
//! This module contains the fundamental types used throughout the application:
//! - [`AppState`]: Validated settings and the shared encoder
//! - [`ConversionRequest`] / [`ConversionOutcome`]: One conversion and how it ended
//! - [`InputSource`]: Uploaded content or a path, resolved by [`plan_requests`]
//! - [`BatchProgress`]: Per-item progress for batch operations

mod config;
mod discovery;
mod progress;
mod state;
mod task;
mod types;

pub use config::AppConfig;
pub use discovery::discover_inputs;
pub use progress::{BatchProgress, LogReporter, ProgressReporter};
pub use state::AppState;
pub use task::{InputSource, plan_requests};
pub use types::{
    ConversionOutcome,
    ConversionRequest,
    ConversionSettings,
    ImageInfo,
    OutcomeStatus,
    DEFAULT_QUALITY,
    DEFAULT_SPEED,
    MAX_QUALITY,
    MAX_SPEED,
    MIN_QUALITY,
    MIN_SPEED,
};
