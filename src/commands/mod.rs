//! Command handlers for the front end.
//!
//! This module exposes the operations the CLI (or any other front end) invokes:
//! - [`convert_image`]: Convert a single image
//! - [`convert_directory`] / [`convert_sources`]: Batch convert with progress and cancellation
//! - [`list_outputs`] / [`package_outputs`]: Inspect and package what was produced

mod image;

pub use image::*;
