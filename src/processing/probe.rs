//! Image header probing for display purposes.

use std::path::{Path, PathBuf};
use image::{ImageDecoder, ImageReader};
use crate::core::ImageInfo;
use crate::utils::{ConverterError, ConverterResult, InputError};

/// Reads dimensions, format and colour layout without decoding pixel data.
pub fn probe_image(path: &Path) -> ConverterResult<ImageInfo> {
    let metadata = std::fs::metadata(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => InputError::not_found(path).into(),
        _ => ConverterError::probe(format!("Cannot read {}: {}", path.display(), e)),
    })?;
    if !metadata.is_file() {
        return Err(InputError::not_a_file(path).into());
    }

    let reader = ImageReader::open(path)?.with_guessed_format()?;
    let format = reader
        .format()
        .map(|f| format!("{:?}", f).to_uppercase())
        .ok_or_else(|| ConverterError::probe(format!("Unrecognised image format: {}", path.display())))?;

    let decoder = reader.into_decoder()?;
    let (width, height) = decoder.dimensions();

    Ok(ImageInfo {
        width,
        height,
        format,
        color_mode: format!("{:?}", decoder.color_type()),
        size_bytes: metadata.len(),
    })
}

/// [`probe_image`] on the blocking pool.
pub async fn probe(path: impl Into<PathBuf>) -> ConverterResult<ImageInfo> {
    let path = path.into();
    tokio::task::spawn_blocking(move || probe_image(&path))
        .await
        .map_err(|e| ConverterError::probe(format!("Probe task panicked: {e}")))?
}
