//! Single-flight guard for resolution passes
//!
//! Two layers: an in-process `tokio::sync::Mutex` taken with `try_lock`, and
//! an advisory marker file whose mtime debounces passes started by other
//! processes (or by this one) within the freshness window. The marker is left
//! in place after a pass; only its age matters.

use chrono::Utc;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, OwnedMutexGuard};
use tracing::{debug, warn};

use crate::utils::fs::file_age;

pub struct RunLock {
    marker_path: PathBuf,
    freshness: Duration,
    in_process: Arc<Mutex<()>>,
}

/// Held for the duration of a pass; dropping it releases the in-process lock
#[derive(Debug)]
pub struct RunLockGuard {
    _guard: OwnedMutexGuard<()>,
}

impl RunLock {
    pub fn new(marker_path: impl Into<PathBuf>, freshness: Duration) -> Self {
        Self {
            marker_path: marker_path.into(),
            freshness,
            in_process: Arc::new(Mutex::new(())),
        }
    }

    pub fn marker_path(&self) -> &Path {
        &self.marker_path
    }

    /// Try to start a pass. Returns `None` when another pass is running in
    /// this process or the marker was touched within the freshness window.
    pub async fn try_acquire(&self) -> Option<RunLockGuard> {
        let Ok(guard) = self.in_process.clone().try_lock_owned() else {
            warn!("Another logo pass is running in this process; skipping");
            return None;
        };

        if let Some(age) = file_age(&self.marker_path).await
            && age < self.freshness
        {
            warn!(
                marker = %self.marker_path.display(),
                age_secs = age.as_secs(),
                "Another run appears active (lock present); skipping"
            );
            return None;
        }

        // Unwritable marker only loses cross-process debounce
        let stamp = Utc::now().timestamp_millis().to_string();
        if let Err(e) = tokio::fs::write(&self.marker_path, stamp).await {
            debug!(
                "Could not write run lock marker {}: {}",
                self.marker_path.display(),
                e
            );
        }

        Some(RunLockGuard { _guard: guard })
    }
}
