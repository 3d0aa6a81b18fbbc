//! ffmpeg transcoding client (stem WAV → MP3)

use super::{run_tool, ToolError};
use std::path::Path;
use tokio::process::Command;

/// ffmpeg invoker
#[derive(Debug, Clone)]
pub struct FfmpegTranscoder {
    binary: String,
    bitrate: String,
}

impl FfmpegTranscoder {
    pub fn new(binary: impl Into<String>, bitrate: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
            bitrate: bitrate.into(),
        }
    }

    /// Transcode `wav_in` to MP3 at the configured bitrate
    pub async fn transcode(&self, wav_in: &Path, mp3_out: &Path) -> Result<(), ToolError> {
        let mut command = Command::new(&self.binary);
        command
            .arg("-y")
            .arg("-i")
            .arg(wav_in)
            .arg("-b:a")
            .arg(&self.bitrate)
            .arg(mp3_out);

        run_tool(&self.binary, &mut command).await?;
        Ok(())
    }
}
