//! Core types for conversion requests, outcomes and probe results.

use std::path::{Path, PathBuf};
use serde::{Deserialize, Serialize};
use crate::utils::extract_filename;

pub const MIN_QUALITY: u32 = 1;
pub const MAX_QUALITY: u32 = 100;
pub const DEFAULT_QUALITY: u32 = 80;
pub const MIN_SPEED: u32 = 1;
pub const MAX_SPEED: u32 = 10;
pub const DEFAULT_SPEED: u32 = 6;

/// Encoder tunables shared by every request of a batch.
///
/// Higher quality trades file size for fidelity; higher speed trades
/// compression efficiency for encode time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConversionSettings {
    /// Quality level (1-100)
    pub quality: u32,
    /// Encoder speed (1-10)
    pub speed: u32,
}

impl Default for ConversionSettings {
    fn default() -> Self {
        Self {
            quality: DEFAULT_QUALITY,
            speed: DEFAULT_SPEED,
        }
    }
}

/// A single input → AVIF conversion.
///
/// Immutable once built; quality and speed are clamped into range on construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversionRequest {
    input_path: PathBuf,
    output_path: PathBuf,
    quality: u32,
    speed: u32,
}

impl ConversionRequest {
    pub fn new(
        input_path: impl Into<PathBuf>,
        output_path: impl Into<PathBuf>,
        settings: ConversionSettings,
    ) -> Self {
        Self {
            input_path: input_path.into(),
            output_path: output_path.into(),
            quality: settings.quality.clamp(MIN_QUALITY, MAX_QUALITY),
            speed: settings.speed.clamp(MIN_SPEED, MAX_SPEED),
        }
    }

    pub fn input_path(&self) -> &Path {
        &self.input_path
    }

    pub fn output_path(&self) -> &Path {
        &self.output_path
    }

    pub fn quality(&self) -> u32 {
        self.quality
    }

    pub fn speed(&self) -> u32 {
        self.speed
    }

    /// File name used in progress updates and error lists
    pub fn file_name(&self) -> String {
        extract_filename(&self.input_path)
    }
}

/// How a single request ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutcomeStatus {
    Converted,
    Failed,
    /// Never started because the batch was cancelled or hit its deadline
    Cancelled,
}

/// Result of one conversion. Exactly one is produced per request.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversionOutcome {
    /// Path to the original input file
    pub input_path: PathBuf,
    /// Path where the AVIF output was (or would have been) written
    pub output_path: PathBuf,
    /// Original file size in bytes
    pub original_size_bytes: u64,
    /// Converted file size in bytes, 0 unless converted
    pub converted_size_bytes: u64,
    pub status: OutcomeStatus,
    /// Error message if the conversion failed
    pub error_message: Option<String>,
}

impl ConversionOutcome {
    pub fn converted(request: &ConversionRequest, original_size: u64, converted_size: u64) -> Self {
        Self {
            input_path: request.input_path.clone(),
            output_path: request.output_path.clone(),
            original_size_bytes: original_size,
            converted_size_bytes: converted_size,
            status: OutcomeStatus::Converted,
            error_message: None,
        }
    }

    pub fn failed(request: &ConversionRequest, original_size: u64, message: impl Into<String>) -> Self {
        Self {
            input_path: request.input_path.clone(),
            output_path: request.output_path.clone(),
            original_size_bytes: original_size,
            converted_size_bytes: 0,
            status: OutcomeStatus::Failed,
            error_message: Some(message.into()),
        }
    }

    pub fn cancelled(request: &ConversionRequest) -> Self {
        Self {
            input_path: request.input_path.clone(),
            output_path: request.output_path.clone(),
            original_size_bytes: 0,
            converted_size_bytes: 0,
            status: OutcomeStatus::Cancelled,
            error_message: None,
        }
    }

    pub fn success(&self) -> bool {
        self.status == OutcomeStatus::Converted
    }

    pub fn file_name(&self) -> String {
        extract_filename(&self.input_path)
    }
}

/// Basic image metadata reported by the probe. Display only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageInfo {
    pub width: u32,
    pub height: u32,
    /// Container format, e.g. "PNG"
    pub format: String,
    /// Pixel layout as reported by the decoder, e.g. "Rgba8"
    pub color_mode: String,
    pub size_bytes: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_clamps_tunables() {
        let request = ConversionRequest::new(
            "in/a.png",
            "out/a.avif",
            ConversionSettings { quality: 250, speed: 0 },
        );
        assert_eq!(request.quality(), MAX_QUALITY);
        assert_eq!(request.speed(), MIN_SPEED);
        assert_eq!(request.file_name(), "a.png");
    }

    #[test]
    fn outcome_constructors_set_status() {
        let request = ConversionRequest::new("a.png", "a.avif", ConversionSettings::default());

        let ok = ConversionOutcome::converted(&request, 1000, 400);
        assert!(ok.success());
        assert!(ok.error_message.is_none());

        let failed = ConversionOutcome::failed(&request, 1000, "boom");
        assert!(!failed.success());
        assert_eq!(failed.converted_size_bytes, 0);
        assert_eq!(failed.error_message.as_deref(), Some("boom"));

        let cancelled = ConversionOutcome::cancelled(&request);
        assert_eq!(cancelled.status, OutcomeStatus::Cancelled);
        assert!(!cancelled.success());
    }

    #[test]
    fn settings_deserialize_with_defaults() {
        let settings: ConversionSettings = serde_json::from_str(r#"{"quality": 55}"#).unwrap();
        assert_eq!(settings, ConversionSettings { quality: 55, speed: DEFAULT_SPEED });
    }
}
