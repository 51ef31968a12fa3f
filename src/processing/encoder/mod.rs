//! The encoder seam.
//!
//! The converter only knows the [`Encoder`] trait. Production runs the Node.js
//! sidecar ([`SidecarEncoder`]); tests plug in in-process fakes.

mod sidecar;

use async_trait::async_trait;
use serde::Deserialize;
use crate::core::ConversionRequest;
use crate::utils::ConverterResult;

pub use sidecar::{EncoderConfig, SidecarEncoder, parse_sidecar_output};

/// Sizes reported by the encoder after a successful conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EncodeReport {
    pub original_size: u64,
    pub converted_size: u64,
}

/// Converts one image into AVIF at `request.output_path()`.
///
/// Implementations return `Err` for any failure; the converter turns that
/// into a failed outcome and removes whatever was written.
#[async_trait]
pub trait Encoder: Send + Sync {
    async fn encode(&self, request: &ConversionRequest) -> ConverterResult<EncodeReport>;
}
