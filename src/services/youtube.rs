//! yt-dlp client: metadata probe and audio extraction
//!
//! Two invocations per job: `--dump-single-json` for the title (no download),
//! then a bestaudio download with the WAV extraction post-processor.

use super::{run_tool, ToolError};
use std::path::Path;
use tokio::process::Command;
use tracing::debug;

/// Title used when the source metadata carries none
const FALLBACK_TITLE: &str = "YouTube Video";

/// yt-dlp invoker
#[derive(Debug, Clone)]
pub struct YtDlpClient {
    binary: String,
}

impl YtDlpClient {
    pub fn new(binary: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
        }
    }

    /// Fetch the source title without downloading media
    pub async fn probe_title(&self, url: &str) -> Result<String, ToolError> {
        let mut command = Command::new(&self.binary);
        command
            .arg("--dump-single-json")
            .arg("--no-playlist")
            .arg(url);

        let stdout = run_tool(&self.binary, &mut command).await?;
        let info: serde_json::Value =
            serde_json::from_slice(&stdout).map_err(|e| ToolError::Parse {
                tool: self.binary.clone(),
                detail: e.to_string(),
            })?;

        let title = info
            .get("title")
            .and_then(|v| v.as_str())
            .unwrap_or(FALLBACK_TITLE)
            .to_string();
        debug!(title = %title, "Probed source metadata");
        Ok(title)
    }

    /// Download best audio and extract it as WAV at `wav_out`
    ///
    /// yt-dlp's extract-audio post-processor decides the final extension, so
    /// the output template uses `%(ext)s` on the same basename; with
    /// `--audio-format wav` the result lands exactly at `wav_out`.
    pub async fn extract_audio(&self, url: &str, wav_out: &Path) -> Result<(), ToolError> {
        let template = wav_out.with_extension("%(ext)s");

        let mut command = Command::new(&self.binary);
        command
            .arg("--no-playlist")
            .arg("-f")
            .arg("bestaudio/best")
            .arg("-x")
            .arg("--audio-format")
            .arg("wav")
            .arg("-o")
            .arg(&template)
            .arg(url);

        run_tool(&self.binary, &mut command).await?;

        if !wav_out.exists() {
            return Err(ToolError::Parse {
                tool: self.binary.clone(),
                detail: format!("expected extracted audio at {}", wav_out.display()),
            });
        }
        Ok(())
    }
}
