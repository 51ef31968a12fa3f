//! Application state shared by the command handlers.

use std::sync::Arc;
use tracing::debug;
use crate::core::AppConfig;
use crate::processing::{BatchProcessor, Encoder, ImageConverter, SidecarEncoder};
use crate::utils::ConverterResult;

/// Validated settings plus the encoder every command uses.
///
/// Cloning is cheap; clones share the encoder.
#[derive(Clone)]
pub struct AppState {
    config: Arc<AppConfig>,
    encoder: Arc<dyn Encoder>,
}

impl AppState {
    /// Creates state backed by the Node.js sidecar.
    pub fn new(config: AppConfig) -> ConverterResult<Self> {
        let encoder = Arc::new(SidecarEncoder::new(config.encoder.clone()));
        Self::with_encoder(config, encoder)
    }

    /// Creates state around any encoder, e.g. an in-process fake.
    pub fn with_encoder(config: AppConfig, encoder: Arc<dyn Encoder>) -> ConverterResult<Self> {
        config.validate()?;
        debug!(
            "AppState initialized (quality {}, speed {}, concurrency {})",
            config.conversion.quality, config.conversion.speed, config.batch.concurrency
        );
        Ok(Self {
            config: Arc::new(config),
            encoder,
        })
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn create_converter(&self) -> ImageConverter {
        ImageConverter::new(Arc::clone(&self.encoder))
    }

    pub fn create_processor(&self) -> BatchProcessor {
        BatchProcessor::new(Arc::clone(&self.encoder), self.config.batch.clone())
    }
}
