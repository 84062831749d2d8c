//! Index construction with an on-disk TTL cache and stale-on-error fallback

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio::fs;
use tracing::{debug, info, warn};

use super::{IndexOrigin, LogoIndex};
use crate::sources::LogoSource;
use crate::utils::fs::file_age;

pub struct IndexBuilder {
    source: Arc<dyn LogoSource>,
    index_filename: String,
    ttl: Duration,
}

impl IndexBuilder {
    pub fn new(source: Arc<dyn LogoSource>, index_filename: impl Into<String>, ttl: Duration) -> Self {
        Self {
            source,
            index_filename: index_filename.into(),
            ttl,
        }
    }

    pub fn cache_path(&self, cache_dir: &Path) -> PathBuf {
        cache_dir.join(&self.index_filename)
    }

    /// Produce an index for this pass. Never fails: a listing error falls
    /// back to any cache file on disk, then to an empty index.
    pub async fn build(&self, cache_dir: &Path) -> LogoIndex {
        let cache_path = self.cache_path(cache_dir);

        if let Some(age) = file_age(&cache_path).await
            && age < self.ttl
        {
            if let Some(entries) = load_cache(&cache_path).await {
                info!(
                    "Logo index: using cached ({} entries, age {}s)",
                    entries.len(),
                    age.as_secs()
                );
                return LogoIndex::from_entries(entries, IndexOrigin::Cached);
            }
            debug!("Cached index unreadable, refetching");
        }

        let listing = match self.source.fetch_tree().await {
            Ok(listing) => listing,
            Err(e) => {
                if e.is_rate_limited() {
                    warn!(source = self.source.label(), "Logo index: rate limited fetching listing: {}", e);
                } else {
                    warn!(source = self.source.label(), "Logo index: listing fetch failed: {}", e);
                }
                return match load_cache(&cache_path).await {
                    Some(entries) => {
                        info!("Logo index: using stale cache ({} entries)", entries.len());
                        LogoIndex::from_entries(entries, IndexOrigin::Stale)
                    }
                    None => {
                        warn!("Logo index: no cache available, continuing with an empty index");
                        LogoIndex::empty()
                    }
                };
            }
        };

        let index = LogoIndex::from_tree(&listing.tree);
        persist_cache(&cache_path, &index).await;

        info!(
            "Logo index: built {} entries from {} nodes via {}",
            index.len(),
            listing.tree.len(),
            self.source.label()
        );
        index
    }
}

async fn load_cache(path: &Path) -> Option<BTreeMap<String, String>> {
    let contents = fs::read(path).await.ok()?;
    match serde_json::from_slice(&contents) {
        Ok(entries) => Some(entries),
        Err(e) => {
            warn!("Ignoring malformed index cache {}: {}", path.display(), e);
            None
        }
    }
}

/// Best effort: a failed write only costs a refetch next pass.
async fn persist_cache(path: &Path, index: &LogoIndex) {
    let json = match serde_json::to_vec(index.entries()) {
        Ok(json) => json,
        Err(e) => {
            warn!("Failed to serialize index cache: {}", e);
            return;
        }
    };

    let tmp_path = path.with_extension("json.tmp");
    let result = async {
        fs::write(&tmp_path, &json).await?;
        fs::rename(&tmp_path, path).await
    }
    .await;

    match result {
        Ok(()) => debug!("Wrote index cache {}", path.display()),
        Err(e) => {
            warn!("Failed to write index cache {}: {}", path.display(), e);
            let _ = fs::remove_file(&tmp_path).await;
        }
    }
}
