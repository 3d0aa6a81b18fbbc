//! Background services: external tool clients, the processing pipeline,
//! the job tracker, and the retention sweeper.

pub mod demucs;
pub mod ffmpeg;
pub mod jobs;
pub mod pipeline;
pub mod sweeper;
pub mod tools;
pub mod youtube;

pub use jobs::JobTracker;
pub use tools::CommandToolSuite;

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::process::Command;

/// External tool errors
#[derive(Debug, Error)]
pub enum ToolError {
    /// Binary not found in PATH
    #[error("{0} binary not found in PATH")]
    BinaryNotFound(String),

    /// Failed to spawn the tool
    #[error("Failed to execute {tool}: {source}")]
    Spawn {
        tool: String,
        #[source]
        source: std::io::Error,
    },

    /// Tool ran but exited with a failure status
    #[error("{tool} failed ({status}): {stderr}")]
    Failed {
        tool: String,
        status: String,
        stderr: String,
    },

    /// Tool output could not be interpreted
    #[error("Failed to parse {tool} output: {detail}")]
    Parse { tool: String, detail: String },

    /// I/O error around tool invocation
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Seam over the three external tools the pipeline delegates to
///
/// The real implementation shells out to yt-dlp, demucs and ffmpeg; tests
/// inject fakes so the pipeline runs without any of them installed.
#[async_trait]
pub trait ToolSuite: Send + Sync {
    /// Fetch the source title without downloading media
    async fn probe_title(&self, url: &str) -> Result<String, ToolError>;

    /// Download the source and extract its audio to `wav_out`
    async fn extract_audio(&self, url: &str, wav_out: &Path) -> Result<(), ToolError>;

    /// Separate `wav_in` into per-stem WAVs under `work_dir`
    ///
    /// Returns the directory containing the four stem WAV files.
    async fn separate(&self, wav_in: &Path, work_dir: &Path) -> Result<PathBuf, ToolError>;

    /// Transcode one stem WAV to a compressed artifact
    async fn transcode(&self, wav_in: &Path, mp3_out: &Path) -> Result<(), ToolError>;
}

/// Run a command to completion, mapping failures to [`ToolError`]
///
/// Captures stdout/stderr; a truncated stderr tail goes into the error so
/// job logs stay readable.
pub(crate) async fn run_tool(tool: &str, command: &mut Command) -> Result<Vec<u8>, ToolError> {
    let output = command.output().await.map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            ToolError::BinaryNotFound(tool.to_string())
        } else {
            ToolError::Spawn {
                tool: tool.to_string(),
                source: e,
            }
        }
    })?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        let tail: String = stderr
            .lines()
            .rev()
            .take(5)
            .collect::<Vec<_>>()
            .into_iter()
            .rev()
            .collect::<Vec<_>>()
            .join(" | ");
        return Err(ToolError::Failed {
            tool: tool.to_string(),
            status: output.status.to_string(),
            stderr: tail,
        });
    }

    Ok(output.stdout)
}
