#![allow(dead_code)]

use async_trait::async_trait;
use bytes::Bytes;
use std::collections::HashMap;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::Mutex;

use tvlogo_sync::config::Config;
use tvlogo_sync::errors::{SourceError, SourceResult, StoreError, StoreResult};
use tvlogo_sync::logo_assets::DownloadedLogo;
use tvlogo_sync::models::{ChannelRecord, LogoRef};
use tvlogo_sync::repositories::{ChannelSource, LogoAssigner};
use tvlogo_sync::sources::{LogoSource, TreeListing, TreeNode};

/// In-memory listing with call counters in place of GitHub
pub struct StubSource {
    paths: Vec<String>,
    tree_status: Option<u16>,
    raw_status: HashMap<String, u16>,
    tree_fetches: AtomicUsize,
    raw_fetches: AtomicUsize,
}

impl StubSource {
    pub fn with_paths(paths: &[&str]) -> Self {
        Self {
            paths: paths.iter().map(|p| p.to_string()).collect(),
            tree_status: None,
            raw_status: HashMap::new(),
            tree_fetches: AtomicUsize::new(0),
            raw_fetches: AtomicUsize::new(0),
        }
    }

    pub fn failing_tree(mut self, status: u16) -> Self {
        self.tree_status = Some(status);
        self
    }

    pub fn failing_raw(mut self, path: &str, status: u16) -> Self {
        self.raw_status.insert(path.to_string(), status);
        self
    }

    pub fn tree_fetches(&self) -> usize {
        self.tree_fetches.load(Ordering::SeqCst)
    }

    pub fn raw_fetches(&self) -> usize {
        self.raw_fetches.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl LogoSource for StubSource {
    fn label(&self) -> &str {
        "stub"
    }

    async fn fetch_tree(&self) -> SourceResult<TreeListing> {
        self.tree_fetches.fetch_add(1, Ordering::SeqCst);
        if let Some(status) = self.tree_status {
            return Err(SourceError::from_status("stub://tree", status));
        }
        Ok(TreeListing {
            tree: self.paths.iter().map(|p| TreeNode::blob(p.as_str())).collect(),
            truncated: false,
        })
    }

    async fn fetch_raw(&self, path: &str) -> SourceResult<Bytes> {
        self.raw_fetches.fetch_add(1, Ordering::SeqCst);
        if let Some(status) = self.raw_status.get(path) {
            return Err(SourceError::from_status(path, *status));
        }
        if !self.paths.iter().any(|p| p == path) {
            return Err(SourceError::from_status(path, 404));
        }
        Ok(Bytes::from(format!("image:{path}")))
    }
}

/// Channels held in memory; records every assignment
#[derive(Default)]
pub struct MemoryStore {
    channels: Vec<ChannelRecord>,
    fail_listing: bool,
    fail_assign_for: Option<String>,
    assignments: Mutex<Vec<(String, String)>>,
}

impl MemoryStore {
    pub fn new(channels: Vec<ChannelRecord>) -> Self {
        Self {
            channels,
            ..Default::default()
        }
    }

    pub fn failing_listing() -> Self {
        Self {
            fail_listing: true,
            ..Default::default()
        }
    }

    pub fn failing_assignment_for(mut self, channel_id: &str) -> Self {
        self.fail_assign_for = Some(channel_id.to_string());
        self
    }

    pub async fn assignments(&self) -> Vec<(String, String)> {
        self.assignments.lock().await.clone()
    }
}

#[async_trait]
impl ChannelSource for MemoryStore {
    async fn list_channels(&self) -> StoreResult<Vec<ChannelRecord>> {
        if self.fail_listing {
            return Err(StoreError::query("table missing"));
        }
        Ok(self.channels.clone())
    }
}

#[async_trait]
impl LogoAssigner for MemoryStore {
    async fn assign_logo(&self, channel: &ChannelRecord, logo: &DownloadedLogo) -> StoreResult<()> {
        if self.fail_assign_for.as_deref() == Some(channel.id.as_str()) {
            return Err(StoreError::assignment(&channel.id, "save failed"));
        }
        self.assignments
            .lock()
            .await
            .push((channel.id.clone(), logo.local_filename.clone()));
        Ok(())
    }
}

pub fn channel(id: &str, tvg_id: Option<&str>, name: Option<&str>, logo: LogoRef) -> ChannelRecord {
    ChannelRecord {
        id: id.to_string(),
        tvg_id: tvg_id.map(str::to_string),
        name: name.map(str::to_string),
        logo,
    }
}

/// Config rooted in a temp dir so tests never touch /data or /tmp
pub fn test_config(root: &Path) -> Config {
    let mut config = Config::default();
    config.storage.logos_dir = root.join("logos");
    config.lock.path = root.join("run.lock");
    config
}
