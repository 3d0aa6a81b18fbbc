//! demucs separation client
//!
//! Runs `demucs -n <model> <input.wav> -o <work_dir>`. Demucs writes stems to
//! `<work_dir>/<model>/<track name>/<stem>.wav`; the track name derives from
//! the input filename, so the output is located by taking the first (only)
//! subdirectory of the model directory.

use super::{run_tool, ToolError};
use std::path::{Path, PathBuf};
use tokio::process::Command;
use tracing::debug;

/// demucs invoker
#[derive(Debug, Clone)]
pub struct DemucsSeparator {
    binary: String,
    model: String,
}

impl DemucsSeparator {
    pub fn new(binary: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
            model: model.into(),
        }
    }

    /// Separate `wav_in` into stems under `work_dir`, returning the track
    /// directory containing the per-stem WAVs
    pub async fn separate(&self, wav_in: &Path, work_dir: &Path) -> Result<PathBuf, ToolError> {
        let mut command = Command::new(&self.binary);
        command
            .arg("-n")
            .arg(&self.model)
            .arg(wav_in)
            .arg("-o")
            .arg(work_dir);

        run_tool(&self.binary, &mut command).await?;

        let track_dir = self.locate_track_dir(work_dir)?;
        debug!(track_dir = %track_dir.display(), "Separation complete");
        Ok(track_dir)
    }

    /// Find the track output directory under `<work_dir>/<model>/`
    fn locate_track_dir(&self, work_dir: &Path) -> Result<PathBuf, ToolError> {
        let model_dir = work_dir.join(&self.model);
        let mut entries = std::fs::read_dir(&model_dir).map_err(|e| ToolError::Parse {
            tool: self.binary.clone(),
            detail: format!("missing output directory {}: {}", model_dir.display(), e),
        })?;

        entries
            .find_map(|entry| {
                let path = entry.ok()?.path();
                path.is_dir().then_some(path)
            })
            .ok_or_else(|| ToolError::Parse {
                tool: self.binary.clone(),
                detail: format!("no track directory under {}", model_dir.display()),
            })
    }
}
