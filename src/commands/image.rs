//! Command handlers for image conversion.

use std::path::{Path, PathBuf};
use serde::Serialize;
use tracing::{debug, info};
use crate::core::{
    AppState,
    ConversionOutcome,
    ConversionRequest,
    ImageInfo,
    InputSource,
    ProgressReporter,
    discover_inputs,
    plan_requests,
};
use crate::packaging::{
    ConversionSummary,
    OutputManifestEntry,
    PackagedArchive,
    build_archive,
    build_manifest,
    conversion_summary,
};
use crate::processing::{BatchReport, CancelHandle, probe};
use crate::utils::{
    ConverterError,
    ConverterResult,
    SupportedFormats,
    list_supported_formats,
    validate_input_dir,
};

/// Everything the caller needs after a batch: the report and what was produced.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchRun {
    pub report: BatchReport,
    pub manifest: Vec<OutputManifestEntry>,
    pub summary: Option<ConversionSummary>,
}

/// Manifest of an output directory together with its summary.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OutputListing {
    pub manifest: Vec<OutputManifestEntry>,
    pub summary: Option<ConversionSummary>,
}

/// Converts a single image with the state's settings.
///
/// Per-item failures come back as a failed outcome, not as `Err`.
pub async fn convert_image(
    state: &AppState,
    input_path: impl Into<PathBuf>,
    output_path: impl Into<PathBuf>,
) -> ConversionOutcome {
    let request = ConversionRequest::new(input_path, output_path, state.config().conversion);
    debug!("Received convert command for {}", request.file_name());
    state.create_converter().convert(&request).await
}

/// Scans `input_dir` for supported images and converts all of them into `output_dir`.
///
/// The directory structure below `input_dir` is mirrored under `output_dir`.
pub async fn convert_directory<R>(
    state: &AppState,
    input_dir: &Path,
    output_dir: &Path,
    reporter: &R,
    cancel: &CancelHandle,
) -> ConverterResult<BatchRun>
where
    R: ProgressReporter + ?Sized,
{
    validate_input_dir(input_dir)?;

    let scan_root = input_dir.to_path_buf();
    let sources = tokio::task::spawn_blocking(move || discover_inputs(&scan_root))
        .await
        .map_err(|e| ConverterError::io(format!("Directory scan task failed: {}", e)))??;
    info!("Found {} images under {}", sources.len(), input_dir.display());

    convert_sources(state, sources, output_dir, reporter, cancel).await
}

/// Converts an arbitrary mix of uploaded content and paths into `output_dir`.
///
/// Uploads are staged in a temporary directory that lives for the duration
/// of the batch. Fails before any item runs if the output directory cannot
/// be created.
pub async fn convert_sources<R>(
    state: &AppState,
    sources: Vec<InputSource>,
    output_dir: &Path,
    reporter: &R,
    cancel: &CancelHandle,
) -> ConverterResult<BatchRun>
where
    R: ProgressReporter + ?Sized,
{
    state.config().validate()?;

    tokio::fs::create_dir_all(output_dir).await.map_err(|e| {
        ConverterError::io(format!("Cannot create output directory {}: {}", output_dir.display(), e))
    })?;

    let staging = tempfile::Builder::new()
        .prefix("avif-batch-uploads-")
        .tempdir()?;

    let requests = plan_requests(sources, output_dir, staging.path(), state.config().conversion).await?;
    let report = state
        .create_processor()
        .run_batch(requests, reporter, cancel)
        .await?;

    let listing = list_outputs(output_dir).await?;
    debug!("Batch produced {} files", listing.manifest.len());

    Ok(BatchRun {
        report,
        manifest: listing.manifest,
        summary: listing.summary,
    })
}

/// Manifest and summary of an output directory.
pub async fn list_outputs(output_dir: &Path) -> ConverterResult<OutputListing> {
    let dir = output_dir.to_path_buf();
    tokio::task::spawn_blocking(move || -> ConverterResult<OutputListing> {
        Ok(OutputListing {
            manifest: build_manifest(&dir)?,
            summary: conversion_summary(&dir)?,
        })
    })
    .await
    .map_err(|e| ConverterError::io(format!("Manifest task failed: {}", e)))?
}

/// Packs the produced files into a ZIP; `None` when there is nothing to pack.
pub async fn package_outputs(output_dir: &Path) -> ConverterResult<Option<PackagedArchive>> {
    let dir = output_dir.to_path_buf();
    tokio::task::spawn_blocking(move || build_archive(&dir))
        .await
        .map_err(|e| ConverterError::io(format!("Archive task failed: {}", e)))?
}

/// Reads dimensions, format and color mode from the image header.
pub async fn image_info(path: impl Into<PathBuf>) -> ConverterResult<ImageInfo> {
    probe(path).await
}

pub fn supported_formats() -> SupportedFormats {
    list_supported_formats()
}
