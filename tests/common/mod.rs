#![allow(dead_code)]

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use async_trait::async_trait;
use avif_batch_lib::core::{BatchProgress, ConversionRequest, ConversionSettings};
use avif_batch_lib::processing::CancelHandle;
use avif_batch_lib::processing::encoder::{EncodeReport, Encoder};
use avif_batch_lib::utils::{ConverterError, ConverterResult};

/// In-process encoder that writes a fake AVIF at 40% of the input size.
#[derive(Default)]
pub struct FakeEncoder {
    fail_names: HashSet<String>,
    panic_names: HashSet<String>,
    delay: Duration,
    cancel_after_each: Option<CancelHandle>,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
    calls: AtomicUsize,
}

impl FakeEncoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_on(mut self, name: &str) -> Self {
        self.fail_names.insert(name.to_string());
        self
    }

    pub fn panicking_on(mut self, name: &str) -> Self {
        self.panic_names.insert(name.to_string());
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Cancels `handle` as soon as any item finishes encoding
    pub fn cancelling(mut self, handle: CancelHandle) -> Self {
        self.cancel_after_each = Some(handle);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Encoder for FakeEncoder {
    async fn encode(&self, request: &ConversionRequest) -> ConverterResult<EncodeReport> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);

        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        let name = request.file_name();
        if self.panic_names.contains(&name) {
            panic!("encoder crashed on {name}");
        }
        if self.fail_names.contains(&name) {
            return Err(ConverterError::encode(format!("cannot encode {name}")));
        }

        let original_size = tokio::fs::metadata(request.input_path()).await?.len();
        let converted_size = original_size * 2 / 5;
        tokio::fs::write(request.output_path(), vec![0u8; converted_size as usize]).await?;

        if let Some(handle) = &self.cancel_after_each {
            handle.cancel();
        }

        Ok(EncodeReport { original_size, converted_size })
    }
}

/// Writes `names` (1000 bytes each) under `dir` and returns their paths.
pub fn write_inputs(dir: &Path, names: &[&str]) -> Vec<PathBuf> {
    names
        .iter()
        .map(|name| {
            let path = dir.join(name);
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent).unwrap();
            }
            std::fs::write(&path, vec![7u8; 1000]).unwrap();
            path
        })
        .collect()
}

pub fn requests_for(inputs: &[PathBuf], output_dir: &Path) -> Vec<ConversionRequest> {
    inputs
        .iter()
        .map(|input| {
            let output = output_dir.join(input.with_extension("avif").file_name().unwrap());
            ConversionRequest::new(input, output, ConversionSettings::default())
        })
        .collect()
}

/// Progress sink that keeps every update.
#[derive(Default)]
pub struct Recorder {
    pub updates: Mutex<Vec<BatchProgress>>,
}

impl Recorder {
    pub fn take(&self) -> Vec<BatchProgress> {
        std::mem::take(&mut *self.updates.lock().unwrap())
    }
}

impl avif_batch_lib::core::ProgressReporter for Recorder {
    fn report_progress(&self, progress: &BatchProgress) {
        self.updates.lock().unwrap().push(progress.clone());
    }
}
