use std::fmt;
use std::path::PathBuf;
use serde::Serialize;
use crate::core::{ConversionOutcome, OutcomeStatus};
use crate::utils::format_bytes;

/// One failed item in a [`BatchReport`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchError {
    pub file_name: String,
    /// Input as submitted, so same-named files from different folders differ
    pub input_path: PathBuf,
    pub message: String,
}

/// Aggregate outcome of one batch run.
///
/// Built up one outcome at a time by the batch collector and finalized once
/// every request is accounted for.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchReport {
    pub total_count: usize,
    pub success_count: usize,
    pub failed_count: usize,
    pub cancelled_count: usize,
    /// Sum over converted items only
    pub original_size_bytes: u64,
    /// Sum over converted items only
    pub converted_size_bytes: u64,
    /// Absent when nothing was converted
    pub compression_ratio_percent: Option<f64>,
    pub errors: Vec<BatchError>,
}

impl BatchReport {
    pub fn new(total_count: usize) -> Self {
        Self {
            total_count,
            ..Self::default()
        }
    }

    /// Folds one outcome into the running totals
    pub fn record(&mut self, outcome: &ConversionOutcome) {
        match outcome.status {
            OutcomeStatus::Converted => {
                self.success_count += 1;
                self.original_size_bytes += outcome.original_size_bytes;
                self.converted_size_bytes += outcome.converted_size_bytes;
            }
            OutcomeStatus::Failed => {
                self.failed_count += 1;
                self.errors.push(BatchError {
                    file_name: outcome.file_name(),
                    input_path: outcome.input_path.clone(),
                    message: outcome
                        .error_message
                        .clone()
                        .unwrap_or_else(|| "Unknown error".to_string()),
                });
            }
            OutcomeStatus::Cancelled => self.cancelled_count += 1,
        }
    }

    /// Computes derived values once all outcomes are in
    pub fn finalize(&mut self) {
        self.compression_ratio_percent =
            compression_ratio_percent(self.original_size_bytes, self.converted_size_bytes);
    }

    pub fn accounted(&self) -> usize {
        self.success_count + self.failed_count + self.cancelled_count
    }

    pub fn saved_bytes(&self) -> i64 {
        self.original_size_bytes as i64 - self.converted_size_bytes as i64
    }
}

/// `(original - converted) / original * 100`, or `None` when `original` is 0.
///
/// Negative when the output grew.
pub fn compression_ratio_percent(original: u64, converted: u64) -> Option<f64> {
    if original == 0 {
        return None;
    }
    Some((original as f64 - converted as f64) / original as f64 * 100.0)
}

impl fmt::Display for BatchReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== Conversion Report ===")?;
        writeln!(f, "- Total: {}", self.total_count)?;
        writeln!(f, "- Converted: {}", self.success_count)?;
        writeln!(f, "- Failed: {}", self.failed_count)?;
        if self.cancelled_count > 0 {
            writeln!(f, "- Cancelled: {}", self.cancelled_count)?;
        }
        writeln!(f, "- Original Size: {}", format_bytes(self.original_size_bytes))?;
        writeln!(f, "- Converted Size: {}", format_bytes(self.converted_size_bytes))?;
        match self.compression_ratio_percent {
            Some(ratio) => writeln!(f, "- Compression: {:.2}%", ratio)?,
            None => writeln!(f, "- Compression: n/a")?,
        }

        if !self.errors.is_empty() {
            writeln!(f)?;
            writeln!(f, "Errors:")?;
            for error in &self.errors {
                writeln!(f, "- {}: {}", error.input_path.display(), error.message)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{ConversionRequest, ConversionSettings};

    fn request(name: &str) -> ConversionRequest {
        ConversionRequest::new(format!("in/{name}"), "out/x.avif", ConversionSettings::default())
    }

    #[test]
    fn ratio_from_totals() {
        let mut report = BatchReport::new(1);
        report.record(&ConversionOutcome::converted(&request("a.png"), 1000, 400));
        report.finalize();
        assert_eq!(report.compression_ratio_percent, Some(60.0));
        assert_eq!(report.saved_bytes(), 600);
    }

    #[test]
    fn zero_original_bytes_has_no_ratio() {
        let mut report = BatchReport::new(2);
        report.record(&ConversionOutcome::failed(&request("a.png"), 0, "bad"));
        report.record(&ConversionOutcome::cancelled(&request("b.png")));
        report.finalize();

        assert_eq!(report.compression_ratio_percent, None);
        assert_eq!(compression_ratio_percent(0, 0), None);
        assert_eq!(report.accounted(), report.total_count);
    }

    #[test]
    fn failures_are_listed_by_file_name() {
        let mut report = BatchReport::new(3);
        report.record(&ConversionOutcome::converted(&request("a.png"), 100, 50));
        report.record(&ConversionOutcome::failed(&request("b.png"), 100, "encode error"));
        report.record(&ConversionOutcome::cancelled(&request("c.png")));
        report.finalize();

        // Failed items contribute nothing to the byte totals
        assert_eq!((report.original_size_bytes, report.converted_size_bytes), (100, 50));
        assert_eq!(
            report.errors,
            vec![BatchError {
                file_name: "b.png".into(),
                input_path: PathBuf::from("in/b.png"),
                message: "encode error".into(),
            }]
        );
        assert_eq!((report.success_count, report.failed_count, report.cancelled_count), (1, 1, 1));

        let rendered = report.to_string();
        assert!(rendered.contains("- Cancelled: 1"));
        assert!(rendered.contains("- in/b.png: encode error"));
    }

    #[test]
    fn same_named_failures_stay_distinguishable() {
        let settings = ConversionSettings::default();
        let mut report = BatchReport::new(2);
        for dir in ["photos/a", "photos/b"] {
            let request = ConversionRequest::new(format!("{dir}/x.png"), format!("out/{dir}/x.avif"), settings);
            report.record(&ConversionOutcome::failed(&request, 10, "encode error"));
        }
        report.finalize();

        assert_eq!(report.errors[0].file_name, report.errors[1].file_name);
        assert_ne!(report.errors[0].input_path, report.errors[1].input_path);

        let rendered = report.to_string();
        assert!(rendered.contains("- photos/a/x.png: encode error"));
        assert!(rendered.contains("- photos/b/x.png: encode error"));
    }

    #[test]
    fn growth_gives_negative_ratio() {
        assert_eq!(compression_ratio_percent(100, 150), Some(-50.0));
    }
}
