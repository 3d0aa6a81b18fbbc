//! The conversion pipeline
//!
//! Sequential, no rollback: download → separate → transcode → ready. Any
//! error aborts the remainder and records terminal `failed`; intermediates
//! already on disk stay there until the session is purged.

use crate::models::{SessionStatus, StemKind};
use crate::services::ToolSuite;
use crate::store::StatusStore;
use crate::AppState;
use anyhow::{Context, Result};
use tracing::{error, info, warn};

/// Spawn the background job for one submission and track its handle
///
/// Returns immediately; the task owns all further status transitions.
pub async fn spawn_conversion(state: &AppState, youtube_url: String, session_id: String) {
    let store = state.store.clone();
    let tools = state.tools.clone();
    let id = session_id.clone();

    let handle = tokio::spawn(async move {
        info!(session_id = %id, "Conversion job started");
        match run_conversion(&store, tools.as_ref(), &youtube_url, &id).await {
            Ok(()) => {
                info!(session_id = %id, "Conversion job completed");
            }
            Err(e) => {
                error!(session_id = %id, error = %e, "Conversion job failed");
                // Terminal failure label is all the client gets; the title is
                // dropped along with everything else.
                if let Err(write_err) = store.write(&id, SessionStatus::Failed, None) {
                    error!(session_id = %id, error = %write_err, "Failed to record failure status");
                }
            }
        }
    });

    state.jobs.register(&session_id, handle).await;
}

/// Run the pipeline for one session to a terminal `ready` state
///
/// The caller records `failed` on error.
pub async fn run_conversion(
    store: &StatusStore,
    tools: &dyn ToolSuite,
    youtube_url: &str,
    session_id: &str,
) -> Result<()> {
    let layout = store.layout().clone();

    store.write(session_id, SessionStatus::Processing, None)?;

    let title = tools
        .probe_title(youtube_url)
        .await
        .context("metadata probe failed")?;
    store.write(session_id, SessionStatus::Processing, Some(title.clone()))?;

    let wav_path = layout.download_wav(session_id);
    tools
        .extract_audio(youtube_url, &wav_path)
        .await
        .context("audio extraction failed")?;

    let stems_dir = layout.session_stems_dir(session_id);
    let track_dir = tools
        .separate(&wav_path, &stems_dir)
        .await
        .context("separation failed")?;

    // The raw download is no longer needed once stems exist
    if let Err(e) = std::fs::remove_file(&wav_path) {
        warn!(session_id = %session_id, error = %e, "Failed to remove intermediate WAV");
    }

    let compressed_dir = layout.session_compressed_dir(session_id);
    std::fs::create_dir_all(&compressed_dir)?;

    for stem in StemKind::ALL {
        let stem_wav = track_dir.join(stem.wav_name());
        if !stem_wav.exists() {
            // Tolerated, matching the separation tool's occasional silence
            // dropouts; the session still goes ready without this artifact.
            warn!(session_id = %session_id, stem = %stem, "Stem WAV missing, skipping");
            continue;
        }
        let mp3_path = layout.artifact(session_id, stem);
        tools
            .transcode(&stem_wav, &mp3_path)
            .await
            .with_context(|| format!("transcoding {} failed", stem))?;
        if let Err(e) = std::fs::remove_file(&stem_wav) {
            warn!(session_id = %session_id, stem = %stem, error = %e, "Failed to remove stem WAV");
        }
    }

    // Everything fetchable now lives under compressed/
    if let Err(e) = std::fs::remove_dir_all(&stems_dir) {
        warn!(session_id = %session_id, error = %e, "Failed to remove stems directory");
    }

    store.write(session_id, SessionStatus::Ready, Some(title))?;
    Ok(())
}
