pub mod error;
pub mod validation;
pub mod formats;
pub mod fs;

pub use error::{ConverterError, ConverterResult, InputError};
pub use validation::{validate_concurrency, validate_input_dir, validate_input_path, validate_settings, MAX_CONCURRENCY};
pub use formats::{
    ImageFormat,
    SupportedFormats,
    format_from_extension,
    is_output_file,
    is_supported_input,
    list_supported_formats,
    OUTPUT_EXTENSION,
    SUPPORTED_INPUT_EXTENSIONS,
};
pub use fs::{
    ensure_parent_dir,
    extract_filename,
    format_bytes,
    get_file_size,
    remove_partial_output,
    to_slash_path,
    with_output_extension,
};
