//! Encoder that spawns the Node.js sidecar once per image.
//!
//! Contract with the sidecar:
//! `<node> <script> <input> <output> <quality> <speed>`. On success it exits 0
//! and prints a JSON object with `originalSize` and `convertedSize` on stdout.
//! On failure it exits non-zero with a diagnostic on stderr.

use std::path::PathBuf;
use std::process::Stdio;
use std::time::Duration;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::process::Command;
use tracing::debug;
use crate::core::ConversionRequest;
use crate::utils::{ConverterError, ConverterResult};
use super::{EncodeReport, Encoder};

const DEFAULT_TIMEOUT_SECS: u64 = 300;

/// Where the sidecar lives and how long one image may take.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EncoderConfig {
    /// Node.js executable
    pub node_path: PathBuf,
    /// Sidecar script
    pub script_path: PathBuf,
    /// Per-item timeout in seconds; 0 disables it
    pub timeout_secs: u64,
}

impl Default for EncoderConfig {
    fn default() -> Self {
        Self {
            node_path: PathBuf::from("node"),
            script_path: PathBuf::from("sidecar/avif-encode.mjs"),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl EncoderConfig {
    pub fn timeout(&self) -> Option<Duration> {
        (self.timeout_secs > 0).then(|| Duration::from_secs(self.timeout_secs))
    }
}

pub struct SidecarEncoder {
    config: EncoderConfig,
}

impl SidecarEncoder {
    pub fn new(config: EncoderConfig) -> Self {
        Self { config }
    }

    /// Creates the sidecar command for one request
    fn create_sidecar_command(&self, request: &ConversionRequest) -> Command {
        let mut cmd = Command::new(&self.config.node_path);
        cmd.arg(&self.config.script_path)
            .arg(request.input_path())
            .arg(request.output_path())
            .arg(request.quality().to_string())
            .arg(request.speed().to_string())
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            // A timed-out child is dropped with its future; make sure it dies too.
            .kill_on_drop(true);
        cmd
    }
}

#[async_trait]
impl Encoder for SidecarEncoder {
    async fn encode(&self, request: &ConversionRequest) -> ConverterResult<EncodeReport> {
        debug!("Spawning sidecar for {}", request.input_path().display());
        let run = self.create_sidecar_command(request).output();

        let output = match self.config.timeout() {
            Some(limit) => tokio::time::timeout(limit, run).await.map_err(|_| {
                ConverterError::encode(format!("Encoder timed out after {}s", limit.as_secs()))
            })?,
            None => run.await,
        }
        .map_err(|e| ConverterError::encode(format!("Failed to run encoder: {}", e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let message = stderr_message(&stderr).unwrap_or_else(|| match output.status.code() {
                Some(code) => format!("Encoder exited with status {}", code),
                None => "Encoder was terminated by a signal".to_string(),
            });
            debug!("Sidecar failed for {}: {}", request.input_path().display(), message);
            return Err(ConverterError::encode(message));
        }

        parse_sidecar_output(&String::from_utf8_lossy(&output.stdout))
    }
}

/// Parses the sidecar's stdout.
///
/// The report is the last non-empty line; anything printed before it (library
/// warnings) is ignored.
pub fn parse_sidecar_output(stdout: &str) -> ConverterResult<EncodeReport> {
    let line = stdout
        .lines()
        .map(str::trim)
        .rfind(|line| !line.is_empty())
        .ok_or_else(|| ConverterError::encode("Empty output from encoder"))?;

    serde_json::from_str(line).map_err(|e| {
        ConverterError::encode(format!("Failed to parse encoder output: {}", e))
    })
}

/// Longest diagnostic kept when stderr carries no tagged error line
const MAX_DIAGNOSTIC_CHARS: usize = 500;

/// Diagnostic from the sidecar's stderr.
///
/// The last `Error: ...` style line (also `TypeError: ...` and
/// `Error [CODE]: ...`) with the tag removed. Stack frames and Node's
/// `Node.js vX` footer after it are skipped. Without a tagged line the whole
/// trimmed stderr is used, cut to [`MAX_DIAGNOSTIC_CHARS`].
fn stderr_message(stderr: &str) -> Option<String> {
    if let Some(message) = stderr.lines().rev().find_map(strip_error_tag) {
        return Some(message);
    }

    let whole = stderr.trim();
    if whole.is_empty() {
        return None;
    }
    if whole.chars().count() <= MAX_DIAGNOSTIC_CHARS {
        return Some(whole.to_string());
    }
    let truncated: String = whole.chars().take(MAX_DIAGNOSTIC_CHARS).collect();
    Some(format!("{}...", truncated.trim_end()))
}

/// `"Error [ERR_X]: message"` -> `"message"`; `None` for untagged lines
fn strip_error_tag(line: &str) -> Option<String> {
    let line = line.trim();
    let name_len = line
        .find(|c: char| !c.is_ascii_alphanumeric())
        .unwrap_or(line.len());
    let (name, rest) = line.split_at(name_len);
    if !name.ends_with("Error") {
        return None;
    }

    let rest = match rest.strip_prefix(" [") {
        Some(coded) => coded.split_once(']')?.1,
        None => rest,
    };
    let message = rest.strip_prefix(':')?.trim();
    (!message.is_empty()).then(|| message.to_string())
}
