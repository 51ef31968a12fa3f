use std::path::Path;
use crate::core::{ConversionSettings, MAX_QUALITY, MAX_SPEED, MIN_QUALITY, MIN_SPEED};
use crate::utils::{ConverterError, ConverterResult, ImageFormat, InputError, format_from_extension};

/// Upper bound on worker count exposed to users.
pub const MAX_CONCURRENCY: usize = 8;

/// Validates quality and speed before any item runs
pub fn validate_settings(settings: &ConversionSettings) -> ConverterResult<()> {
    if !(MIN_QUALITY..=MAX_QUALITY).contains(&settings.quality) {
        return Err(ConverterError::config(format!(
            "Invalid quality value: {}. Must be between {} and {}",
            settings.quality, MIN_QUALITY, MAX_QUALITY
        )));
    }

    if !(MIN_SPEED..=MAX_SPEED).contains(&settings.speed) {
        return Err(ConverterError::config(format!(
            "Invalid speed value: {}. Must be between {} and {}",
            settings.speed, MIN_SPEED, MAX_SPEED
        )));
    }

    Ok(())
}

/// Validates the worker count
pub fn validate_concurrency(concurrency: usize) -> ConverterResult<()> {
    if concurrency == 0 || concurrency > MAX_CONCURRENCY {
        return Err(ConverterError::config(format!(
            "Invalid concurrency: {}. Must be between 1 and {}",
            concurrency, MAX_CONCURRENCY
        )));
    }
    Ok(())
}

/// Validates the input file path and format
pub async fn validate_input_path(path: &Path) -> ConverterResult<ImageFormat> {
    let metadata = match tokio::fs::metadata(path).await {
        Ok(metadata) => metadata,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(InputError::not_found(path).into());
        }
        Err(e) => {
            return Err(ConverterError::io(format!("Cannot read {}: {}", path.display(), e)));
        }
    };

    if !metadata.is_file() {
        return Err(InputError::not_a_file(path).into());
    }

    // This will validate the extension and format
    format_from_extension(path)
}

/// Validates a directory to scan for inputs
pub fn validate_input_dir(path: &Path) -> ConverterResult<()> {
    if !path.is_dir() {
        return Err(InputError::DirectoryNotFound(path.to_path_buf()).into());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn settings_out_of_range_are_rejected() {
        assert!(validate_settings(&ConversionSettings { quality: 80, speed: 6 }).is_ok());
        assert!(validate_settings(&ConversionSettings { quality: 1, speed: 10 }).is_ok());

        for (quality, speed) in [(0, 6), (101, 6), (80, 0), (80, 11)] {
            let err = validate_settings(&ConversionSettings { quality, speed }).unwrap_err();
            assert!(matches!(err, ConverterError::Config(_)), "{quality}/{speed} accepted");
        }
    }

    #[test]
    fn concurrency_bounds() {
        assert!(validate_concurrency(1).is_ok());
        assert!(validate_concurrency(MAX_CONCURRENCY).is_ok());
        assert!(validate_concurrency(0).is_err());
        assert!(validate_concurrency(MAX_CONCURRENCY + 1).is_err());
    }

    #[tokio::test]
    async fn input_path_checks() {
        let dir = tempfile::tempdir().unwrap();

        let missing = dir.path().join("missing.png");
        assert!(matches!(
            validate_input_path(&missing).await,
            Err(ConverterError::Input(InputError::NotFound(_)))
        ));

        let sub = dir.path().join("folder.png");
        std::fs::create_dir(&sub).unwrap();
        assert!(matches!(
            validate_input_path(&sub).await,
            Err(ConverterError::Input(InputError::NotFile(_)))
        ));

        let text = dir.path().join("notes.txt");
        std::fs::write(&text, b"hello").unwrap();
        assert!(matches!(
            validate_input_path(&text).await,
            Err(ConverterError::Input(InputError::Unsupported(_)))
        ));

        let image = dir.path().join("photo.PNG");
        std::fs::write(&image, b"not really a png").unwrap();
        assert_eq!(validate_input_path(&image).await.unwrap(), ImageFormat::PNG);
    }
}
