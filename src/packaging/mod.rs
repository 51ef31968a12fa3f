//! Result packaging: output manifest, summary and ZIP archive.

mod archive;
mod manifest;

pub use archive::{DEFAULT_ARCHIVE_NAME, PackagedArchive, build_archive};
pub use manifest::{ConversionSummary, OutputManifestEntry, build_manifest, conversion_summary};
