use std::collections::VecDeque;
use std::sync::Arc;
use tokio::sync::{Mutex, mpsc};
use tokio::time::Instant;
use tracing::{debug, info, warn};
use crate::core::{BatchProgress, ConversionOutcome, ConversionRequest, ProgressReporter};
use crate::processing::ImageConverter;
use crate::processing::encoder::Encoder;
use crate::utils::ConverterResult;
use super::{BatchConfig, BatchReport, CancelHandle};

/// Queue entry: submission index plus the request
type QueuedTask = (usize, ConversionRequest);

/// Runs conversions over a fixed pool of workers.
///
/// Workers pull requests from a shared FIFO queue in submission order and
/// send each outcome to a single collector, which alone owns the report and
/// calls the progress reporter.
pub struct BatchProcessor {
    converter: ImageConverter,
    config: BatchConfig,
}

impl BatchProcessor {
    pub fn new(encoder: Arc<dyn Encoder>, config: BatchConfig) -> Self {
        debug!("Creating BatchProcessor with concurrency {}", config.concurrency);
        Self {
            converter: ImageConverter::new(encoder),
            config,
        }
    }

    pub fn config(&self) -> &BatchConfig {
        &self.config
    }

    /// Converts every request and returns the aggregate report.
    ///
    /// Each request yields exactly one outcome. Cancelling `cancel` (or
    /// reaching the configured deadline) lets in-flight items finish and
    /// reports the rest as cancelled. Only an invalid configuration is
    /// returned as `Err`, before any item runs.
    pub async fn run_batch<R>(
        &self,
        requests: Vec<ConversionRequest>,
        reporter: &R,
        cancel: &CancelHandle,
    ) -> ConverterResult<BatchReport>
    where
        R: ProgressReporter + ?Sized,
    {
        self.config.validate()?;

        let total_tasks = requests.len();
        let mut report = BatchReport::new(total_tasks);
        if total_tasks == 0 {
            report.finalize();
            return Ok(report);
        }

        let worker_count = self.config.concurrency.min(total_tasks);
        // A deadline past the end of representable time never fires
        let deadline = self
            .config
            .deadline()
            .and_then(|limit| Instant::now().checked_add(limit));
        info!("Processing batch of {} tasks with {} workers", total_tasks, worker_count);

        // Kept so a request whose worker died can still be reported
        let submitted = requests.clone();
        let queue: Arc<Mutex<VecDeque<QueuedTask>>> =
            Arc::new(Mutex::new(requests.into_iter().enumerate().collect()));
        let (tx, mut rx) = mpsc::unbounded_channel::<(usize, ConversionOutcome)>();

        let mut handles = Vec::with_capacity(worker_count);
        for worker_id in 0..worker_count {
            let queue = Arc::clone(&queue);
            let tx = tx.clone();
            let converter = self.converter.clone();
            let cancel = cancel.clone();

            handles.push(tokio::spawn(async move {
                loop {
                    let next = queue.lock().await.pop_front();
                    let Some((index, request)) = next else { break };

                    let stop = cancel.is_cancelled()
                        || deadline.is_some_and(|deadline| Instant::now() >= deadline);
                    let outcome = if stop {
                        ConversionOutcome::cancelled(&request)
                    } else {
                        debug!("Worker {} converting {}", worker_id, request.file_name());
                        converter.convert(&request).await
                    };

                    if tx.send((index, outcome)).is_err() {
                        break;
                    }
                }
            }));
        }
        drop(tx);

        let mut reported = vec![false; total_tasks];
        let mut completed_tasks = 0;
        while let Some((index, outcome)) = rx.recv().await {
            reported[index] = true;
            completed_tasks += 1;
            self.record(&mut report, reporter, &outcome, completed_tasks, total_tasks);
        }

        for (worker_id, handle) in handles.into_iter().enumerate() {
            if let Err(e) = handle.await {
                warn!("Worker {} terminated abnormally: {}", worker_id, e);
            }
        }

        // A worker that panicked mid-item never sent its outcome
        for (index, request) in submitted.iter().enumerate() {
            if !reported[index] {
                completed_tasks += 1;
                let outcome = ConversionOutcome::failed(request, 0, "Worker terminated unexpectedly");
                self.record(&mut report, reporter, &outcome, completed_tasks, total_tasks);
            }
        }

        report.finalize();

        if report.failed_count > 0 || report.cancelled_count > 0 {
            warn!(
                "Batch finished: {} converted, {} failed, {} cancelled out of {}",
                report.success_count, report.failed_count, report.cancelled_count, total_tasks
            );
        } else {
            info!("Batch finished successfully: {} files converted", report.success_count);
        }

        Ok(report)
    }

    fn record<R>(
        &self,
        report: &mut BatchReport,
        reporter: &R,
        outcome: &ConversionOutcome,
        completed_tasks: usize,
        total_tasks: usize,
    ) where
        R: ProgressReporter + ?Sized,
    {
        report.record(outcome);
        let progress = BatchProgress::new(completed_tasks, total_tasks, outcome.file_name(), outcome.status)
            .with_error(outcome.error_message.clone());
        reporter.report_progress(&progress);
    }
}
