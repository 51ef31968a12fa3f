use std::path::{Component, Path, PathBuf};
use tokio::fs;
use crate::utils::{ConverterError, ConverterResult, OUTPUT_EXTENSION};

/// Get file size in bytes
pub async fn get_file_size(path: impl AsRef<Path>) -> ConverterResult<u64> {
    fs::metadata(path.as_ref())
        .await
        .map(|m| m.len())
        .map_err(|e| ConverterError::io(format!("Failed to get file size: {}", e)))
}

/// Creates the parent directory of `path` if it is missing
pub async fn ensure_parent_dir(path: impl AsRef<Path>) -> ConverterResult<()> {
    if let Some(parent) = path.as_ref().parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).await.map_err(|e| {
                ConverterError::io(format!("Cannot create output directory {}: {}", parent.display(), e))
            })?;
        }
    }
    Ok(())
}

/// Removes a partially written output. A missing file is not an error.
pub async fn remove_partial_output(path: impl AsRef<Path>) {
    match fs::remove_file(path.as_ref()).await {
        Ok(()) => tracing::debug!("Removed partial output {}", path.as_ref().display()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => tracing::warn!("Could not remove partial output {}: {}", path.as_ref().display(), e),
    }
}

/// Final path component as a string, or the whole path when there is none
pub fn extract_filename(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.to_string_lossy().to_string())
}

/// Replaces the extension of `path` with `.avif`
pub fn with_output_extension(path: &Path) -> PathBuf {
    path.with_extension(OUTPUT_EXTENSION)
}

/// Relative path rendered with `/` separators regardless of platform
pub fn to_slash_path(path: &Path) -> String {
    path.components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy().to_string()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}

/// Human-readable byte count
pub fn format_bytes(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if bytes >= GB {
        format!("{:.2} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.2} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.2} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn output_extension_replaces_input_extension() {
        assert_eq!(with_output_extension(Path::new("a/b/photo.jpeg")), PathBuf::from("a/b/photo.avif"));
        assert_eq!(with_output_extension(Path::new("photo")), PathBuf::from("photo.avif"));
        assert_eq!(with_output_extension(Path::new("my.holiday.png")), PathBuf::from("my.holiday.avif"));
    }

    #[test]
    fn slash_paths_drop_non_normal_components() {
        let path: PathBuf = ["nested", "deeper", "x.avif"].iter().collect();
        assert_eq!(to_slash_path(&path), "nested/deeper/x.avif");
        assert_eq!(to_slash_path(Path::new("./x.avif")), "x.avif");
    }

    #[test]
    fn byte_formatting_picks_unit() {
        assert_eq!(format_bytes(512), "512 B");
        assert_eq!(format_bytes(2048), "2.00 KB");
        assert_eq!(format_bytes(3 * 1024 * 1024), "3.00 MB");
    }

    #[tokio::test]
    async fn remove_partial_output_tolerates_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("never-written.avif");
        remove_partial_output(&path).await;

        std::fs::write(&path, b"half").unwrap();
        remove_partial_output(&path).await;
        assert!(!path.exists());
    }
}
