use std::time::Duration;
use serde::{Serialize, Deserialize};
use crate::utils::{ConverterError, ConverterResult};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BatchConfig {
    /// Maximum conversions in flight
    pub concurrency: usize,
    /// Overall deadline in milliseconds; items not started by then are cancelled
    pub deadline_ms: Option<u64>,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            concurrency: 4,
            deadline_ms: None,
        }
    }
}

impl BatchConfig {
    pub fn with_concurrency(concurrency: usize) -> Self {
        Self { concurrency, ..Self::default() }
    }

    pub fn with_deadline(mut self, deadline: Duration) -> Self {
        self.deadline_ms = Some(u64::try_from(deadline.as_millis()).unwrap_or(u64::MAX));
        self
    }

    pub fn deadline(&self) -> Option<Duration> {
        self.deadline_ms.map(Duration::from_millis)
    }

    /// Any limit of at least one is accepted here; the 1-8 range offered to
    /// users is enforced where settings enter the application.
    pub fn validate(&self) -> ConverterResult<()> {
        if self.concurrency == 0 {
            return Err(ConverterError::config("Concurrency must be at least 1"));
        }
        Ok(())
    }
}
