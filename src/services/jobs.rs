//! Background job tracking
//!
//! One task per submission, keyed by session id. Tracking exists so that job
//! completion is observable (tests await it; shutdown diagnostics can count
//! live jobs) -- it imposes no serialization, and duplicate submissions for
//! the same id simply replace the tracked handle while both tasks keep
//! running.

use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;

/// Registry of in-flight conversion jobs
#[derive(Clone, Default)]
pub struct JobTracker {
    handles: Arc<RwLock<HashMap<String, JoinHandle<()>>>>,
}

impl JobTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the handle for a spawned job, replacing any previous one for
    /// the same session id
    pub async fn register(&self, session_id: &str, handle: JoinHandle<()>) {
        self.handles
            .write()
            .await
            .insert(session_id.to_string(), handle);
    }

    /// Await completion of the tracked job for a session
    ///
    /// Returns `false` if no job was tracked under that id.
    pub async fn wait(&self, session_id: &str) -> bool {
        let handle = self.handles.write().await.remove(session_id);
        match handle {
            Some(handle) => {
                // A panicked job already wrote its failure status (or never
                // will); the join error itself carries nothing actionable.
                let _ = handle.await;
                true
            }
            None => false,
        }
    }

    /// Number of tracked (possibly finished) jobs
    pub async fn len(&self) -> usize {
        self.handles.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.handles.read().await.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn wait_returns_false_for_unknown_session() {
        let tracker = JobTracker::new();
        assert!(!tracker.wait("nope").await);
    }

    #[tokio::test]
    async fn register_then_wait_joins_the_task() {
        let tracker = JobTracker::new();
        let flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
        let flag_clone = flag.clone();

        let handle = tokio::spawn(async move {
            flag_clone.store(true, std::sync::atomic::Ordering::SeqCst);
        });
        tracker.register("abc", handle).await;

        assert!(tracker.wait("abc").await);
        assert!(flag.load(std::sync::atomic::Ordering::SeqCst));
        assert!(tracker.is_empty().await);
    }
}
