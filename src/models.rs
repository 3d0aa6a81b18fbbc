//! Session and stem domain types
//!
//! A conversion session progresses `processing` → `ready` or `failed`.
//! Terminal sessions never transition again; they are only removed.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Session status as persisted in the status document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    /// Job submitted and running (download/separate/transcode in progress)
    Processing,
    /// All stems transcoded and fetchable
    Ready,
    /// Job aborted; no further transitions
    Failed,
}

impl SessionStatus {
    /// Terminal states never transition again and are eligible for retention
    /// cleanup.
    pub fn is_terminal(&self) -> bool {
        matches!(self, SessionStatus::Ready | SessionStatus::Failed)
    }
}

impl fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SessionStatus::Processing => "processing",
            SessionStatus::Ready => "ready",
            SessionStatus::Failed => "failed",
        };
        f.write_str(s)
    }
}

/// Persisted status document, overwritten wholesale on each transition
///
/// Served verbatim by `GET /status/{session_id}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusDocument {
    /// Current session status
    pub status: SessionStatus,
    /// Source title, populated once metadata has been fetched
    pub title: Option<String>,
    /// Time of the last status write (UTC)
    pub timestamp: DateTime<Utc>,
}

impl StatusDocument {
    /// Create a document stamped with the current time
    pub fn new(status: SessionStatus, title: Option<String>) -> Self {
        Self {
            status,
            title,
            timestamp: Utc::now(),
        }
    }

    /// Age of the last status write
    pub fn age(&self, now: DateTime<Utc>) -> chrono::Duration {
        now.signed_duration_since(self.timestamp)
    }
}

/// The fixed four-stem output set of the separation model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StemKind {
    Vocals,
    Drums,
    Bass,
    Other,
}

impl StemKind {
    /// All stem kinds, in separation-model output order
    pub const ALL: [StemKind; 4] = [
        StemKind::Vocals,
        StemKind::Drums,
        StemKind::Bass,
        StemKind::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            StemKind::Vocals => "vocals",
            StemKind::Drums => "drums",
            StemKind::Bass => "bass",
            StemKind::Other => "other",
        }
    }

    /// Raw stem filename as produced by the separation tool
    pub fn wav_name(&self) -> String {
        format!("{}.wav", self.as_str())
    }

    /// Compressed artifact filename
    pub fn mp3_name(&self) -> String {
        format!("{}.mp3", self.as_str())
    }
}

impl fmt::Display for StemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StemKind {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "vocals" => Ok(StemKind::Vocals),
            "drums" => Ok(StemKind::Drums),
            "bass" => Ok(StemKind::Bass),
            "other" => Ok(StemKind::Other),
            _ => Err(()),
        }
    }
}

/// Validate a caller-supplied session id
///
/// Session ids become path components under the data root, so anything
/// outside `[A-Za-z0-9._-]` is rejected, as are empty ids and ids that
/// are only dots.
pub fn is_valid_session_id(id: &str) -> bool {
    if id.is_empty() || id.len() > 128 {
        return false;
    }
    if id.chars().any(|c| !(c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'))) {
        return false;
    }
    // "." and ".." resolve to directories, never session files
    !id.chars().all(|c| c == '.')
}
