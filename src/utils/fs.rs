use std::path::Path;
use std::time::{Duration, SystemTime};

/// Time since the file was last modified; `None` when it does not exist.
/// An mtime in the future counts as zero age.
pub async fn file_age(path: &Path) -> Option<Duration> {
    let modified = tokio::fs::metadata(path).await.ok()?.modified().ok()?;
    Some(
        SystemTime::now()
            .duration_since(modified)
            .unwrap_or(Duration::ZERO),
    )
}
