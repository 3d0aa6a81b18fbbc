//! Retention sweeper
//!
//! One pass at process start: terminal sessions whose last status write is
//! older than the retention window are purged. Not a periodic loop; fresh
//! and still-processing sessions are left alone.

use crate::store::StatusStore;
use chrono::{Duration, Utc};
use tracing::{error, info, warn};

/// Purge expired terminal sessions, returning how many were removed
pub fn sweep_expired(store: &StatusStore, retention: Duration) -> usize {
    let sessions = match store.list() {
        Ok(sessions) => sessions,
        Err(e) => {
            error!(error = %e, "Retention sweep aborted: cannot list sessions");
            return 0;
        }
    };

    let now = Utc::now();
    let mut removed = 0;
    for (session_id, doc) in sessions {
        if !doc.status.is_terminal() || doc.age(now) < retention {
            continue;
        }
        match store.purge(&session_id) {
            Ok(()) => {
                info!(session_id = %session_id, status = %doc.status, "Purged expired session");
                removed += 1;
            }
            Err(e) => {
                warn!(session_id = %session_id, error = %e, "Failed to purge expired session");
            }
        }
    }

    if removed > 0 {
        info!(removed, "Retention sweep complete");
    }
    removed
}
