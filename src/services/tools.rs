//! Command-line [`ToolSuite`] implementation

use super::demucs::DemucsSeparator;
use super::ffmpeg::FfmpegTranscoder;
use super::youtube::YtDlpClient;
use super::{ToolError, ToolSuite};
use crate::config::ToolsConfig;
use async_trait::async_trait;
use std::path::{Path, PathBuf};

/// Production tool suite: shells out to yt-dlp, demucs and ffmpeg
#[derive(Debug, Clone)]
pub struct CommandToolSuite {
    yt_dlp: YtDlpClient,
    demucs: DemucsSeparator,
    ffmpeg: FfmpegTranscoder,
}

impl CommandToolSuite {
    pub fn new(config: &ToolsConfig) -> Self {
        Self {
            yt_dlp: YtDlpClient::new(&config.yt_dlp),
            demucs: DemucsSeparator::new(&config.demucs, &config.demucs_model),
            ffmpeg: FfmpegTranscoder::new(&config.ffmpeg, &config.mp3_bitrate),
        }
    }
}

#[async_trait]
impl ToolSuite for CommandToolSuite {
    async fn probe_title(&self, url: &str) -> Result<String, ToolError> {
        self.yt_dlp.probe_title(url).await
    }

    async fn extract_audio(&self, url: &str, wav_out: &Path) -> Result<(), ToolError> {
        self.yt_dlp.extract_audio(url, wav_out).await
    }

    async fn separate(&self, wav_in: &Path, work_dir: &Path) -> Result<PathBuf, ToolError> {
        self.demucs.separate(wav_in, work_dir).await
    }

    async fn transcode(&self, wav_in: &Path, mp3_out: &Path) -> Result<(), ToolError> {
        self.ffmpeg.transcode(wav_in, mp3_out).await
    }
}
