use std::collections::BTreeSet;
use std::path::Path;
use serde::Serialize;
use tracing::debug;
use walkdir::WalkDir;
use crate::utils::{ConverterResult, extract_filename, is_output_file, to_slash_path};

/// One produced file under the output directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OutputManifestEntry {
    /// Path relative to the output directory, `/`-separated
    pub relative_path: String,
    pub file_name: String,
    pub size_bytes: u64,
}

/// Totals over the manifest for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversionSummary {
    pub file_count: usize,
    pub total_size_bytes: u64,
    pub directory_count: usize,
    /// Distinct parent directories, relative and sorted; the root is `""`
    pub directories: Vec<String>,
}

/// Lists every `.avif` file under `output_dir`, sorted by relative path.
///
/// Sizes come from file metadata; contents are never read. A missing
/// directory yields an empty manifest.
pub fn build_manifest(output_dir: &Path) -> ConverterResult<Vec<OutputManifestEntry>> {
    if !output_dir.is_dir() {
        return Ok(Vec::new());
    }

    let mut entries = Vec::new();
    for entry in WalkDir::new(output_dir) {
        let entry = entry?;
        if !entry.file_type().is_file() || !is_output_file(entry.path()) {
            continue;
        }

        let relative = entry
            .path()
            .strip_prefix(output_dir)
            .unwrap_or(entry.path());

        entries.push(OutputManifestEntry {
            relative_path: to_slash_path(relative),
            file_name: extract_filename(entry.path()),
            size_bytes: entry.metadata()?.len(),
        });
    }

    entries.sort_by(|a, b| a.relative_path.cmp(&b.relative_path));
    debug!("Manifest for {}: {} files", output_dir.display(), entries.len());
    Ok(entries)
}

/// Summary of the produced files, or `None` when there are none.
pub fn conversion_summary(output_dir: &Path) -> ConverterResult<Option<ConversionSummary>> {
    let manifest = build_manifest(output_dir)?;
    if manifest.is_empty() {
        return Ok(None);
    }

    let directories: BTreeSet<String> = manifest
        .iter()
        .map(|entry| match entry.relative_path.rsplit_once('/') {
            Some((parent, _)) => parent.to_string(),
            None => String::new(),
        })
        .collect();

    Ok(Some(ConversionSummary {
        file_count: manifest.len(),
        total_size_bytes: manifest.iter().map(|e| e.size_bytes).sum(),
        directory_count: directories.len(),
        directories: directories.into_iter().collect(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn populate(root: &Path) {
        std::fs::create_dir_all(root.join("b/nested")).unwrap();
        std::fs::write(root.join("z.avif"), vec![0u8; 7]).unwrap();
        std::fs::write(root.join("a.AVIF"), vec![0u8; 3]).unwrap();
        std::fs::write(root.join("b/nested/c.avif"), vec![0u8; 11]).unwrap();
        std::fs::write(root.join("b/skip.png"), vec![0u8; 5]).unwrap();
    }

    #[test]
    fn manifest_is_sorted_and_filtered() {
        let dir = tempfile::tempdir().unwrap();
        populate(dir.path());

        let manifest = build_manifest(dir.path()).unwrap();
        let paths: Vec<_> = manifest.iter().map(|e| e.relative_path.as_str()).collect();
        assert_eq!(paths, vec!["a.AVIF", "b/nested/c.avif", "z.avif"]);
        assert_eq!(manifest[1].file_name, "c.avif");
        assert_eq!(manifest[1].size_bytes, 11);
    }

    #[test]
    fn manifest_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        populate(dir.path());
        assert_eq!(build_manifest(dir.path()).unwrap(), build_manifest(dir.path()).unwrap());
    }

    #[test]
    fn summary_counts_directories() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(conversion_summary(dir.path()).unwrap(), None);
        assert!(build_manifest(&dir.path().join("missing")).unwrap().is_empty());

        populate(dir.path());
        let summary = conversion_summary(dir.path()).unwrap().unwrap();
        assert_eq!(summary.file_count, 3);
        assert_eq!(summary.total_size_bytes, 21);
        assert_eq!(summary.directory_count, 2);
        assert_eq!(summary.directories, vec!["".to_string(), "b/nested".to_string()]);
    }
}
