use serde::{Deserialize, Serialize};
use std::path::Path;
use std::str::FromStr;
use crate::utils::{ConverterError, InputError};

/// Extensions accepted by input discovery and the converter, lowercase and without dot.
pub const SUPPORTED_INPUT_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "webp", "gif", "bmp", "tiff"];

/// Extension of every produced file.
pub const OUTPUT_EXTENSION: &str = "avif";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageFormat {
    JPEG,
    PNG,
    WebP,
    GIF,
    BMP,
    TIFF,
    AVIF,
}

impl ImageFormat {
    /// Formats the converter accepts as input
    pub const INPUTS: [ImageFormat; 6] = [
        Self::JPEG,
        Self::PNG,
        Self::WebP,
        Self::GIF,
        Self::BMP,
        Self::TIFF,
    ];

    /// Get file extensions associated with this format
    pub fn extensions(&self) -> &[&str] {
        match self {
            Self::JPEG => &["jpg", "jpeg"],
            Self::PNG => &["png"],
            Self::WebP => &["webp"],
            Self::GIF => &["gif"],
            Self::BMP => &["bmp"],
            Self::TIFF => &["tiff"],
            Self::AVIF => &["avif"],
        }
    }

    /// Check if the extension matches this format
    pub fn matches_extension(&self, ext: &str) -> bool {
        let ext = ext.to_lowercase();
        self.extensions().contains(&ext.as_str())
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Self::JPEG => "JPEG",
            Self::PNG => "PNG",
            Self::WebP => "WebP",
            Self::GIF => "GIF",
            Self::BMP => "BMP",
            Self::TIFF => "TIFF",
            Self::AVIF => "AVIF",
        }
    }

    pub fn is_input(&self) -> bool {
        !matches!(self, Self::AVIF)
    }
}

impl FromStr for ImageFormat {
    type Err = ConverterError;

    fn from_str(ext: &str) -> Result<Self, Self::Err> {
        let ext = ext.to_lowercase();
        match ext.as_str() {
            "jpg" | "jpeg" => Ok(Self::JPEG),
            "png" => Ok(Self::PNG),
            "webp" => Ok(Self::WebP),
            "gif" => Ok(Self::GIF),
            "bmp" => Ok(Self::BMP),
            "tiff" => Ok(Self::TIFF),
            "avif" => Ok(Self::AVIF),
            _ => Err(ConverterError::config(format!(
                "Unsupported image format: {}", ext
            ))),
        }
    }
}

/// Get the input format of a file from its extension.
///
/// Only the name is inspected; content is never checked against the extension.
pub fn format_from_extension(path: &Path) -> Result<ImageFormat, ConverterError> {
    path.extension()
        .and_then(|e| e.to_str())
        .and_then(|ext| ImageFormat::from_str(ext).ok())
        .filter(ImageFormat::is_input)
        .ok_or_else(|| InputError::unsupported(path).into())
}

/// Case-insensitive check against the extensions of [`ImageFormat::INPUTS`].
pub fn is_supported_input(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| ImageFormat::INPUTS.iter().any(|format| format.matches_extension(ext)))
}

/// Case-insensitive check for produced `.avif` files.
pub fn is_output_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case(OUTPUT_EXTENSION))
}

/// Supported formats, for listing to the user.
#[derive(Debug, Clone, Serialize)]
pub struct SupportedFormats {
    pub input: Vec<&'static str>,
    pub output: Vec<&'static str>,
}

pub fn list_supported_formats() -> SupportedFormats {
    SupportedFormats {
        input: ImageFormat::INPUTS.iter().map(ImageFormat::display_name).collect(),
        output: vec![ImageFormat::AVIF.display_name()],
    }
}
