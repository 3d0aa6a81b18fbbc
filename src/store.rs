//! File-based session persistence
//!
//! One JSON status document per session under `status/`, plus the three data
//! directories holding per-session intermediates and artifacts. Documents are
//! overwritten wholesale on each transition; concurrent writers for the same
//! session id race exactly like the filesystem lets them.

use crate::models::{SessionStatus, StatusDocument, StemKind};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::warn;

/// Store errors
#[derive(Debug, Error)]
pub enum StoreError {
    /// Status document exists but cannot be parsed
    #[error("Corrupt status document for session {0}: {1}")]
    Corrupt(String, serde_json::Error),

    /// Serialization failure on write
    #[error("Failed to encode status document: {0}")]
    Encode(serde_json::Error),

    /// Underlying filesystem error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// The four per-session data directories under one root
#[derive(Debug, Clone)]
pub struct DataLayout {
    root: PathBuf,
}

impl DataLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Create all four data directories if missing
    pub fn ensure_directories(&self) -> std::io::Result<()> {
        for dir in [
            self.downloads_dir(),
            self.stems_dir(),
            self.status_dir(),
            self.compressed_dir(),
        ] {
            fs::create_dir_all(dir)?;
        }
        Ok(())
    }

    pub fn downloads_dir(&self) -> PathBuf {
        self.root.join("downloads")
    }

    pub fn stems_dir(&self) -> PathBuf {
        self.root.join("stems")
    }

    pub fn status_dir(&self) -> PathBuf {
        self.root.join("status")
    }

    pub fn compressed_dir(&self) -> PathBuf {
        self.root.join("compressed")
    }

    /// Extracted raw audio for a session (intermediate)
    pub fn download_wav(&self, session_id: &str) -> PathBuf {
        self.downloads_dir().join(format!("{}.wav", session_id))
    }

    /// Separation tool output directory for a session (intermediate)
    pub fn session_stems_dir(&self, session_id: &str) -> PathBuf {
        self.stems_dir().join(session_id)
    }

    /// Status document path for a session
    pub fn status_file(&self, session_id: &str) -> PathBuf {
        self.status_dir().join(format!("{}.json", session_id))
    }

    /// Compressed artifact directory for a session
    pub fn session_compressed_dir(&self, session_id: &str) -> PathBuf {
        self.compressed_dir().join(session_id)
    }

    /// Final artifact path for one stem of a session
    pub fn artifact(&self, session_id: &str, stem: StemKind) -> PathBuf {
        self.session_compressed_dir(session_id).join(stem.mp3_name())
    }
}

/// Status document store over the data layout
#[derive(Debug, Clone)]
pub struct StatusStore {
    layout: DataLayout,
}

impl StatusStore {
    pub fn new(layout: DataLayout) -> Self {
        Self { layout }
    }

    pub fn layout(&self) -> &DataLayout {
        &self.layout
    }

    /// Write a status transition, stamping it with the current time
    ///
    /// Overwrites any existing document for the session.
    pub fn write(
        &self,
        session_id: &str,
        status: SessionStatus,
        title: Option<String>,
    ) -> Result<StatusDocument, StoreError> {
        let doc = StatusDocument::new(status, title);
        let encoded = serde_json::to_vec(&doc).map_err(StoreError::Encode)?;
        fs::write(self.layout.status_file(session_id), encoded)?;
        Ok(doc)
    }

    /// Read the status document for a session, `None` if it does not exist
    pub fn read(&self, session_id: &str) -> Result<Option<StatusDocument>, StoreError> {
        let path = self.layout.status_file(session_id);
        let content = match fs::read(&path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let doc = serde_json::from_slice(&content)
            .map_err(|e| StoreError::Corrupt(session_id.to_string(), e))?;
        Ok(Some(doc))
    }

    /// List all persisted sessions with their status documents
    ///
    /// Unreadable or corrupt documents are logged and skipped; one bad file
    /// must not stop a retention sweep.
    pub fn list(&self) -> Result<Vec<(String, StatusDocument)>, StoreError> {
        let mut sessions = Vec::new();
        for entry in fs::read_dir(self.layout.status_dir())? {
            let entry = entry?;
            let path = entry.path();
            let session_id = match session_id_from_status_path(&path) {
                Some(id) => id,
                None => continue,
            };
            match self.read(&session_id) {
                Ok(Some(doc)) => sessions.push((session_id, doc)),
                Ok(None) => {}
                Err(e) => {
                    warn!(session_id = %session_id, error = %e, "Skipping unreadable status document");
                }
            }
        }
        Ok(sessions)
    }

    /// Remove every file and directory associated with a session
    ///
    /// Unconditional: runs regardless of session status, and missing pieces
    /// are skipped silently.
    pub fn purge(&self, session_id: &str) -> Result<(), StoreError> {
        remove_file_if_exists(&self.layout.download_wav(session_id))?;
        remove_dir_if_exists(&self.layout.session_stems_dir(session_id))?;
        remove_dir_if_exists(&self.layout.session_compressed_dir(session_id))?;
        remove_file_if_exists(&self.layout.status_file(session_id))?;
        Ok(())
    }
}

/// Extract the session id from a `status/<id>.json` path
fn session_id_from_status_path(path: &Path) -> Option<String> {
    if path.extension()? != "json" {
        return None;
    }
    path.file_stem()?.to_str().map(|s| s.to_string())
}

fn remove_file_if_exists(path: &Path) -> std::io::Result<()> {
    match fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e),
    }
}

fn remove_dir_if_exists(path: &Path) -> std::io::Result<()> {
    match fs::remove_dir_all(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e),
    }
}
