//! Shared test fixtures: fake tool suite and app state construction

// Each test binary uses a subset of these helpers
#![allow(dead_code)]

use async_trait::async_trait;
use axum::Router;
use http_body_util::BodyExt;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::TempDir;

use stemd::config::{Config, ToolsConfig};
use stemd::services::{ToolError, ToolSuite};
use stemd::store::{DataLayout, StatusStore};
use stemd::{build_router, AppState};

/// Pipeline stage at which [`FakeTools`] should fail
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailAt {
    Probe,
    Extract,
    Separate,
    Transcode,
}

/// In-process tool suite: no yt-dlp/demucs/ffmpeg required
///
/// Produces the same on-disk shapes the real tools do (a WAV download, a
/// `<model>/<track>/<stem>.wav` tree, MP3 artifacts) so the pipeline's file
/// management is exercised for real.
pub struct FakeTools {
    pub fail_at: Option<FailAt>,
    pub model: String,
}

impl FakeTools {
    pub fn succeeding() -> Self {
        Self {
            fail_at: None,
            model: "mdx_extra".to_string(),
        }
    }

    pub fn failing_at(stage: FailAt) -> Self {
        Self {
            fail_at: Some(stage),
            model: "mdx_extra".to_string(),
        }
    }

    fn fail(&self, stage: FailAt) -> Result<(), ToolError> {
        if self.fail_at == Some(stage) {
            return Err(ToolError::Failed {
                tool: "fake".to_string(),
                status: "exit status: 1".to_string(),
                stderr: format!("injected failure at {:?}", stage),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl ToolSuite for FakeTools {
    async fn probe_title(&self, _url: &str) -> Result<String, ToolError> {
        self.fail(FailAt::Probe)?;
        Ok("Test Video".to_string())
    }

    async fn extract_audio(&self, _url: &str, wav_out: &Path) -> Result<(), ToolError> {
        self.fail(FailAt::Extract)?;
        std::fs::write(wav_out, b"RIFF-fake-wav")?;
        Ok(())
    }

    async fn separate(&self, _wav_in: &Path, work_dir: &Path) -> Result<PathBuf, ToolError> {
        self.fail(FailAt::Separate)?;
        let track_dir = work_dir.join(&self.model).join("track");
        std::fs::create_dir_all(&track_dir)?;
        for stem in ["vocals", "drums", "bass", "other"] {
            std::fs::write(track_dir.join(format!("{}.wav", stem)), b"RIFF-fake-stem")?;
        }
        Ok(track_dir)
    }

    async fn transcode(&self, wav_in: &Path, mp3_out: &Path) -> Result<(), ToolError> {
        self.fail(FailAt::Transcode)?;
        let input = std::fs::read(wav_in)?;
        let mut output = b"ID3-fake-mp3:".to_vec();
        output.extend_from_slice(&input);
        std::fs::write(mp3_out, output)?;
        Ok(())
    }
}

/// Build app state over a temp data root with the given tool suite
///
/// The returned `TempDir` must stay alive for the duration of the test.
pub fn test_state(tools: Arc<dyn ToolSuite>) -> (TempDir, AppState) {
    let dir = tempfile::tempdir().unwrap();
    let layout = DataLayout::new(dir.path());
    layout.ensure_directories().unwrap();
    let store = StatusStore::new(layout);

    let config = Config {
        data_root: dir.path().to_path_buf(),
        bind: "127.0.0.1:0".parse::<SocketAddr>().unwrap(),
        retention_hours: 24,
        tools: ToolsConfig::default(),
    };

    (dir, AppState::new(config, store, tools))
}

/// Build a router over a succeeding fake tool suite
pub fn test_app() -> (TempDir, AppState, Router) {
    let (dir, state) = test_state(Arc::new(FakeTools::succeeding()));
    let router = build_router(state.clone());
    (dir, state, router)
}

/// Collect a response body as JSON
pub async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// Collect a response body as raw bytes
pub async fn body_bytes(response: axum::response::Response) -> Vec<u8> {
    response
        .into_body()
        .collect()
        .await
        .unwrap()
        .to_bytes()
        .to_vec()
}
