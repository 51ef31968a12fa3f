//! Turning user inputs into conversion requests.
//!
//! Inputs arrive either as in-memory uploads or as paths on disk. Both are
//! resolved here, once, into plain [`ConversionRequest`]s with unique output
//! paths, so the batch processor never has to care where an input came from.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use crate::core::{ConversionRequest, ConversionSettings};
use crate::utils::{ConverterError, ConverterResult, OUTPUT_EXTENSION, to_slash_path, with_output_extension};

/// One image handed to the converter by the front end.
#[derive(Debug, Clone)]
pub enum InputSource {
    /// Content received in memory, e.g. from an upload form
    Uploaded { name: String, bytes: Vec<u8> },
    /// File on disk. `root` is set when the file was found by scanning a
    /// directory and keeps its layout under the output directory.
    Path { path: PathBuf, root: Option<PathBuf> },
}

impl InputSource {
    pub fn uploaded(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self::Uploaded { name: name.into(), bytes }
    }

    pub fn path(path: impl Into<PathBuf>) -> Self {
        Self::Path { path: path.into(), root: None }
    }

    pub fn scanned(path: impl Into<PathBuf>, root: impl Into<PathBuf>) -> Self {
        Self::Path { path: path.into(), root: Some(root.into()) }
    }

    /// Output location relative to the output directory, before collision handling
    fn relative_output(&self) -> PathBuf {
        match self {
            Self::Uploaded { name, .. } => with_output_extension(Path::new(&sanitize_upload_name(name))),
            Self::Path { path, root } => {
                let relative = root
                    .as_deref()
                    .and_then(|root| path.strip_prefix(root).ok())
                    .map(Path::to_path_buf)
                    .filter(|rel| rel.file_name().is_some())
                    .unwrap_or_else(|| PathBuf::from(path.file_name().unwrap_or(path.as_os_str())));
                with_output_extension(&relative)
            }
        }
    }
}

/// Uploaded names are untrusted: keep only the final component.
fn sanitize_upload_name(name: &str) -> String {
    let base = name.rsplit(['/', '\\']).next().unwrap_or_default();
    match base {
        "" | "." | ".." => "upload".to_string(),
        other => other.to_string(),
    }
}

/// Resolves inputs into requests with unique output paths.
///
/// Uploaded content is written under `staging_dir` (one subdirectory per
/// upload so original names survive). Outputs land under `output_dir`:
/// scanned files keep their path relative to the scan root, everything else
/// uses its bare file name. Any remaining clash, compared case-insensitively,
/// gets a numeric suffix (`name-1.avif`, `name-2.avif`, ...) in submission order.
pub async fn plan_requests(
    sources: Vec<InputSource>,
    output_dir: &Path,
    staging_dir: &Path,
    settings: ConversionSettings,
) -> ConverterResult<Vec<ConversionRequest>> {
    let mut taken = HashSet::with_capacity(sources.len());
    let mut requests = Vec::with_capacity(sources.len());

    for (index, source) in sources.into_iter().enumerate() {
        let relative = unique_relative_output(source.relative_output(), &mut taken);

        let input_path = match source {
            InputSource::Uploaded { name, bytes } => {
                let staged = staging_dir
                    .join(format!("{index:04}"))
                    .join(sanitize_upload_name(&name));
                stage_upload(&staged, &bytes).await?;
                staged
            }
            InputSource::Path { path, .. } => path,
        };

        let output_path = output_dir.join(&relative);
        debug!("Planned {} -> {}", input_path.display(), output_path.display());
        requests.push(ConversionRequest::new(input_path, output_path, settings));
    }

    info!("Planned {} conversion requests", requests.len());
    Ok(requests)
}

fn unique_relative_output(candidate: PathBuf, taken: &mut HashSet<String>) -> PathBuf {
    if taken.insert(to_slash_path(&candidate).to_lowercase()) {
        return candidate;
    }

    let stem = candidate
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default();
    let parent = candidate.parent().map(Path::to_path_buf).unwrap_or_default();

    let mut n = 1usize;
    loop {
        let renamed = parent.join(format!("{stem}-{n}.{OUTPUT_EXTENSION}"));
        if taken.insert(to_slash_path(&renamed).to_lowercase()) {
            debug!("Output name collision: {} renamed to {}", candidate.display(), renamed.display());
            return renamed;
        }
        n += 1;
    }
}

async fn stage_upload(path: &Path, bytes: &[u8]) -> ConverterResult<()> {
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }
    tokio::fs::write(path, bytes).await.map_err(|e| {
        ConverterError::io(format!("Failed to stage upload {}: {}", path.display(), e))
    })
}
