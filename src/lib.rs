// Module declarations in dependency order
pub mod utils;
pub mod core;
pub mod processing;
pub mod packaging;
pub mod commands;

// Public exports for external consumers
pub use crate::core::{
    AppConfig,
    AppState,
    BatchProgress,
    ConversionOutcome,
    ConversionRequest,
    ConversionSettings,
    InputSource,
    OutcomeStatus,
    ProgressReporter,
};
pub use crate::processing::{BatchConfig, BatchProcessor, BatchReport, CancelHandle, Encoder, EncoderConfig};
pub use crate::utils::{ConverterError, ConverterResult};
pub use crate::commands::*;

// This library file is used as a public API for consuming this crate as a library.
// The command-line entry point is in main.rs.
