pub mod batch;
pub mod encoder;
mod converter;
mod probe;

pub use batch::{BatchConfig, BatchProcessor, BatchReport, CancelHandle};
pub use converter::ImageConverter;
pub use encoder::{EncodeReport, Encoder, EncoderConfig, SidecarEncoder};
pub use probe::{probe, probe_image};
