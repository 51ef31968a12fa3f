//! Single-item conversion.
//!
//! [`ImageConverter::convert`] never returns an error: every failure becomes a
//! failed [`ConversionOutcome`] so the batch processor can rely on exactly one
//! outcome per request.

use std::sync::Arc;
use tracing::{debug, warn};
use crate::core::{ConversionOutcome, ConversionRequest};
use crate::processing::encoder::Encoder;
use crate::utils::{
    ConverterError,
    ConverterResult,
    ensure_parent_dir,
    get_file_size,
    remove_partial_output,
    validate_input_path,
};

#[derive(Clone)]
pub struct ImageConverter {
    encoder: Arc<dyn Encoder>,
}

impl ImageConverter {
    pub fn new(encoder: Arc<dyn Encoder>) -> Self {
        Self { encoder }
    }

    /// Converts one image, reporting failure through the outcome.
    pub async fn convert(&self, request: &ConversionRequest) -> ConversionOutcome {
        match self.try_convert(request).await {
            Ok(outcome) => outcome,
            Err(e) => {
                let message = e.detail();
                warn!("Conversion failed for {}: {}", request.input_path().display(), message);

                // Never leave a partial file behind that could pass for a result
                if !matches!(e, ConverterError::Input(_)) {
                    remove_partial_output(request.output_path()).await;
                }

                let original_size = get_file_size(request.input_path()).await.unwrap_or(0);
                ConversionOutcome::failed(request, original_size, message)
            }
        }
    }

    async fn try_convert(&self, request: &ConversionRequest) -> ConverterResult<ConversionOutcome> {
        validate_input_path(request.input_path()).await?;
        ensure_parent_dir(request.output_path()).await?;

        let report = self.encoder.encode(request).await?;

        // Verify the output file exists
        if let Err(e) = tokio::fs::metadata(request.output_path()).await {
            return Err(ConverterError::encode(format!(
                "Output file missing: {} (Error: {})",
                request.output_path().display(),
                e
            )));
        }

        debug!(
            "'{}' → {} bytes ({} bytes before)",
            request.file_name(),
            report.converted_size,
            report.original_size
        );

        Ok(ConversionOutcome::converted(request, report.original_size, report.converted_size))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use crate::core::{ConversionSettings, OutcomeStatus};
    use crate::processing::encoder::EncodeReport;

    struct WritingEncoder;

    #[async_trait]
    impl Encoder for WritingEncoder {
        async fn encode(&self, request: &ConversionRequest) -> ConverterResult<EncodeReport> {
            tokio::fs::write(request.output_path(), b"avif").await?;
            Ok(EncodeReport { original_size: 10, converted_size: 4 })
        }
    }

    /// Writes half a file and then reports failure.
    struct PartialEncoder;

    #[async_trait]
    impl Encoder for PartialEncoder {
        async fn encode(&self, request: &ConversionRequest) -> ConverterResult<EncodeReport> {
            tokio::fs::write(request.output_path(), b"av").await?;
            Err(ConverterError::encode("unsupported colour profile"))
        }
    }

    /// Claims success without writing anything.
    struct LyingEncoder;

    #[async_trait]
    impl Encoder for LyingEncoder {
        async fn encode(&self, _request: &ConversionRequest) -> ConverterResult<EncodeReport> {
            Ok(EncodeReport { original_size: 10, converted_size: 4 })
        }
    }

    fn request_in(dir: &std::path::Path, input: &str) -> ConversionRequest {
        ConversionRequest::new(
            dir.join(input),
            dir.join("out/nested").join(input).with_extension("avif"),
            ConversionSettings::default(),
        )
    }

    #[tokio::test]
    async fn success_uses_encoder_sizes_and_creates_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.png"), b"0123456789").unwrap();
        let request = request_in(dir.path(), "a.png");

        let outcome = ImageConverter::new(Arc::new(WritingEncoder)).convert(&request).await;

        assert_eq!(outcome.status, OutcomeStatus::Converted);
        assert_eq!((outcome.original_size_bytes, outcome.converted_size_bytes), (10, 4));
        assert!(request.output_path().exists());
    }

    #[tokio::test]
    async fn missing_input_fails_without_calling_encoder() {
        let dir = tempfile::tempdir().unwrap();
        let request = request_in(dir.path(), "ghost.png");

        let outcome = ImageConverter::new(Arc::new(LyingEncoder)).convert(&request).await;

        assert_eq!(outcome.status, OutcomeStatus::Failed);
        assert!(outcome.error_message.unwrap().contains("File not found"));
        assert_eq!(outcome.original_size_bytes, 0);
    }

    #[tokio::test]
    async fn encoder_failure_removes_partial_output() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.png"), b"0123456789").unwrap();
        let request = request_in(dir.path(), "a.png");

        let outcome = ImageConverter::new(Arc::new(PartialEncoder)).convert(&request).await;

        assert_eq!(outcome.status, OutcomeStatus::Failed);
        assert_eq!(outcome.error_message.as_deref(), Some("unsupported colour profile"));
        assert_eq!(outcome.original_size_bytes, 10);
        assert!(!request.output_path().exists());
    }

    #[tokio::test]
    async fn missing_output_is_a_failure() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.png"), b"0123456789").unwrap();
        let request = request_in(dir.path(), "a.png");

        let outcome = ImageConverter::new(Arc::new(LyingEncoder)).convert(&request).await;

        assert_eq!(outcome.status, OutcomeStatus::Failed);
        assert!(outcome.error_message.unwrap().starts_with("Output file missing"));
    }
}
