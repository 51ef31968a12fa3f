use serde::Serialize;
use tracing::{debug, warn};
use crate::core::OutcomeStatus;

/// Progress update emitted once per finished (or cancelled) item.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchProgress {
    /// Number of items accounted for so far, including this one
    pub completed_tasks: usize,
    /// Total number of items in the batch
    pub total_tasks: usize,
    /// Progress percentage (0-100)
    pub progress_percentage: usize,
    /// File name of the item that just finished
    pub current_file: String,
    /// How that item ended
    pub status: OutcomeStatus,
    /// Error message when the item failed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl BatchProgress {
    pub fn new(
        completed_tasks: usize,
        total_tasks: usize,
        current_file: impl Into<String>,
        status: OutcomeStatus,
    ) -> Self {
        let progress_percentage = if total_tasks > 0 {
            (completed_tasks * 100) / total_tasks
        } else {
            0
        };

        Self {
            completed_tasks,
            total_tasks,
            progress_percentage,
            current_file: current_file.into(),
            status,
            error: None,
        }
    }

    pub fn with_error(mut self, error: Option<String>) -> Self {
        self.error = error;
        self
    }

    pub fn is_final(&self) -> bool {
        self.completed_tasks == self.total_tasks
    }
}

/// Sink for per-item progress.
///
/// The batch processor calls this from a single collector, never concurrently.
pub trait ProgressReporter {
    fn report_progress(&self, progress: &BatchProgress);
}

impl<F> ProgressReporter for F
where
    F: Fn(&BatchProgress),
{
    fn report_progress(&self, progress: &BatchProgress) {
        self(progress)
    }
}

/// Reporter that only writes to the log.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogReporter;

impl ProgressReporter for LogReporter {
    fn report_progress(&self, progress: &BatchProgress) {
        match progress.status {
            OutcomeStatus::Failed => warn!(
                "[{}/{}] {} failed: {}",
                progress.completed_tasks,
                progress.total_tasks,
                progress.current_file,
                progress.error.as_deref().unwrap_or("unknown error")
            ),
            _ => debug!(
                "[{}/{}] {} {:?} ({}%)",
                progress.completed_tasks,
                progress.total_tasks,
                progress.current_file,
                progress.status,
                progress.progress_percentage
            ),
        }
    }
}
