//! Error types for the AVIF batch converter.
//!
//! Provides a hierarchy of error types using `thiserror` for ergonomic error handling.
//! Per-item failures never escape the converter as `Err`; they are folded into
//! outcomes. Only batch-level setup failures reach the caller through these types.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Problems with an input file detected before the encoder is invoked.
#[derive(Error, Debug)]
pub enum InputError {
    /// File does not exist
    #[error("File not found: {0}")]
    NotFound(PathBuf),
    /// Path exists but is not a file
    #[error("Not a file: {0}")]
    NotFile(PathBuf),
    /// Extension is not one of the supported input formats
    #[error("Unsupported image format: {0}")]
    Unsupported(PathBuf),
    /// Directory given as a scan root does not exist
    #[error("Directory not found: {0}")]
    DirectoryNotFound(PathBuf),
}

/// Main error type for the converter.
#[derive(Error, Debug)]
pub enum ConverterError {
    /// Input missing, unreadable, or of an unsupported format
    #[error("Input error: {0}")]
    Input(#[from] InputError),

    /// Encoder reported a failure, produced an unparsable response or timed out
    #[error("Encode error: {0}")]
    Encode(String),

    /// Output write or archive creation failed
    #[error("IO error: {0}")]
    Io(String),

    /// Out-of-range quality, speed or concurrency
    #[error("Config error: {0}")]
    Config(String),

    /// Image header could not be decoded
    #[error("Probe error: {0}")]
    Probe(String),
}

/// Convenience result type for converter operations.
pub type ConverterResult<T> = Result<T, ConverterError>;

impl ConverterError {
    pub fn encode<T: Into<String>>(msg: T) -> Self {
        Self::Encode(msg.into())
    }

    pub fn io<T: Into<String>>(msg: T) -> Self {
        Self::Io(msg.into())
    }

    pub fn config<T: Into<String>>(msg: T) -> Self {
        Self::Config(msg.into())
    }

    pub fn probe<T: Into<String>>(msg: T) -> Self {
        Self::Probe(msg.into())
    }

    /// Message without the category prefix, used for per-item error lists.
    pub fn detail(&self) -> String {
        match self {
            Self::Input(e) => e.to_string(),
            Self::Encode(msg) | Self::Io(msg) | Self::Config(msg) | Self::Probe(msg) => msg.clone(),
        }
    }
}

impl InputError {
    pub fn not_found(path: impl Into<PathBuf>) -> Self {
        Self::NotFound(path.into())
    }

    pub fn not_a_file(path: impl Into<PathBuf>) -> Self {
        Self::NotFile(path.into())
    }

    pub fn unsupported(path: impl Into<PathBuf>) -> Self {
        Self::Unsupported(path.into())
    }
}

// Convert std::io::Error to ConverterError
impl From<io::Error> for ConverterError {
    fn from(err: io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for ConverterError {
    fn from(err: serde_json::Error) -> Self {
        Self::Encode(format!("Malformed encoder response: {}", err))
    }
}

impl From<walkdir::Error> for ConverterError {
    fn from(err: walkdir::Error) -> Self {
        Self::Io(format!("Directory scan failed: {}", err))
    }
}

impl From<zip::result::ZipError> for ConverterError {
    fn from(err: zip::result::ZipError) -> Self {
        Self::Io(format!("Archive write failed: {}", err))
    }
}

impl From<image::ImageError> for ConverterError {
    fn from(err: image::ImageError) -> Self {
        Self::Probe(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detail_strips_category_prefix() {
        let err = ConverterError::encode("sharp exploded");
        assert_eq!(err.to_string(), "Encode error: sharp exploded");
        assert_eq!(err.detail(), "sharp exploded");

        let err: ConverterError = InputError::not_found("/tmp/missing.png").into();
        assert_eq!(err.detail(), "File not found: /tmp/missing.png");
    }
}
