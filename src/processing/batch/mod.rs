mod cancel;
mod config;
mod processor;
mod report;

pub use cancel::CancelHandle;
pub use config::BatchConfig;
pub use processor::BatchProcessor;
pub use report::{BatchError, BatchReport, compression_ratio_percent};
