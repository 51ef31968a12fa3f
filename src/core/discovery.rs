use std::path::Path;
use tracing::{debug, warn};
use walkdir::WalkDir;
use crate::core::InputSource;
use crate::utils::{ConverterResult, is_supported_input, validate_input_dir};

/// Recursively finds supported images under `dir`.
///
/// Matching is by extension only (case-insensitive); file content is not
/// checked. Unreadable entries are skipped with a warning. Results are sorted
/// by path so repeated scans produce the same batch order.
pub fn discover_inputs(dir: &Path) -> ConverterResult<Vec<InputSource>> {
    validate_input_dir(dir)?;

    let mut found = Vec::new();
    for entry in WalkDir::new(dir).follow_links(true).sort_by_file_name() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!("Skipping unreadable entry: {}", e);
                continue;
            }
        };

        if entry.file_type().is_file() && is_supported_input(entry.path()) {
            found.push(entry.into_path());
        }
    }

    found.sort();
    debug!("Found {} images under {}", found.len(), dir.display());

    Ok(found
        .into_iter()
        .map(|path| InputSource::scanned(path, dir))
        .collect())
}
