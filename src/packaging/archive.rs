//! ZIP packaging of produced files.
//!
//! The archive is written into a scoped temporary file. If anything fails
//! midway the temporary file is dropped, so callers see either a complete
//! archive or none. The temporary storage is released when the
//! [`PackagedArchive`] is dropped, whether or not it was delivered.

use std::fs::File;
use std::io::{self, BufWriter, Read, Write};
use std::path::Path;
use tempfile::NamedTempFile;
use tracing::{debug, info};
use zip::CompressionMethod;
use zip::ZipWriter;
use zip::write::SimpleFileOptions;
use crate::utils::{ConverterError, ConverterResult};
use super::build_manifest;

/// File name offered for downloads.
pub const DEFAULT_ARCHIVE_NAME: &str = "converted_avif_images.zip";

/// A finished archive held in temporary storage.
#[derive(Debug)]
pub struct PackagedArchive {
    file: NamedTempFile,
    entry_count: usize,
    size_bytes: u64,
}

impl PackagedArchive {
    /// Location of the temporary archive; valid until `self` is dropped
    pub fn path(&self) -> &Path {
        self.file.path()
    }

    pub fn entry_count(&self) -> usize {
        self.entry_count
    }

    pub fn size_bytes(&self) -> u64 {
        self.size_bytes
    }

    /// Copies the archive to `dest` atomically and releases the temporary file.
    pub fn deliver_to(self, dest: &Path) -> ConverterResult<()> {
        let parent = match dest.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        std::fs::create_dir_all(parent)?;

        let mut staged = NamedTempFile::new_in(parent)?;
        io::copy(&mut File::open(self.file.path())?, staged.as_file_mut())?;
        staged.as_file().sync_all()?;
        staged
            .persist(dest)
            .map_err(|e| ConverterError::io(format!("Failed to write {}: {}", dest.display(), e.error)))?;

        info!("Archive delivered to {} ({} entries)", dest.display(), self.entry_count);
        Ok(())
    }

    /// Reads the archive into memory and releases the temporary file.
    pub fn into_bytes(self) -> ConverterResult<Vec<u8>> {
        let mut bytes = Vec::with_capacity(self.size_bytes as usize);
        File::open(self.file.path())?.read_to_end(&mut bytes)?;
        Ok(bytes)
    }
}

/// Packs every manifest entry under `output_dir` into a Deflate ZIP.
///
/// Returns `Ok(None)` when there is nothing to pack.
pub fn build_archive(output_dir: &Path) -> ConverterResult<Option<PackagedArchive>> {
    let manifest = build_manifest(output_dir)?;
    if manifest.is_empty() {
        debug!("No outputs under {}, skipping archive", output_dir.display());
        return Ok(None);
    }

    let file = tempfile::Builder::new()
        .prefix("avif-batch-")
        .suffix(".zip")
        .tempfile()?;

    let mut zip = ZipWriter::new(BufWriter::new(file.reopen()?));
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    for entry in &manifest {
        zip.start_file(entry.relative_path.as_str(), options)?;
        let mut source = File::open(output_dir.join(&entry.relative_path))?;
        io::copy(&mut source, &mut zip)?;
    }

    let mut writer = zip.finish()?;
    writer.flush()?;
    writer
        .into_inner()
        .map_err(|e| ConverterError::io(format!("Failed to flush archive: {}", e)))?
        .sync_all()?;

    let size_bytes = file.as_file().metadata()?.len();
    info!("Packed {} files into archive ({} bytes)", manifest.len(), size_bytes);

    Ok(Some(PackagedArchive {
        file,
        entry_count: manifest.len(),
        size_bytes,
    }))
}
