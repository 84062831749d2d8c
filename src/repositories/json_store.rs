//! Channel store backed by a single JSON document
//!
//! ```json
//! {
//!   "channels": [{"id": "1", "tvg_id": "espn.us", "name": "ESPN", "logo_url": null, "logo_id": null}],
//!   "logos": [{"id": "…", "name": "ESPN", "file_path": "/data/logos/ESPN.png", "created_at": "…", "updated_at": "…"}]
//! }
//! ```

use async_trait::async_trait;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::sync::Mutex;
use tracing::{debug, info};
use uuid::Uuid;

use super::traits::{ChannelSource, LogoAssigner};
use crate::errors::{StoreError, StoreResult};
use crate::logo_assets::DownloadedLogo;
use crate::models::{ChannelRecord, LogoAsset, LogoRef};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredChannel {
    pub id: String,
    #[serde(default)]
    pub tvg_id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub logo_url: Option<String>,
    #[serde(default)]
    pub logo_id: Option<Uuid>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StoreDocument {
    #[serde(default)]
    pub channels: Vec<StoredChannel>,
    #[serde(default)]
    pub logos: Vec<LogoAsset>,
}

impl StoreDocument {
    fn logo(&self, id: Uuid) -> Option<&LogoAsset> {
        self.logos.iter().find(|logo| logo.id == id)
    }

    fn to_record(&self, channel: &StoredChannel) -> ChannelRecord {
        let asset = channel.logo_id.and_then(|id| self.logo(id));
        let url = channel
            .logo_url
            .as_deref()
            .filter(|url| !url.trim().is_empty());

        // A linked asset with a file wins, then the plain URL, then an empty asset
        let logo = match (asset, url) {
            (Some(asset), _) if asset.file_path.as_deref().is_some_and(|f| !f.is_empty()) => {
                LogoRef::Asset {
                    name: asset.name.clone(),
                    file_path: asset.file_path.clone(),
                }
            }
            (_, Some(url)) => LogoRef::Url(url.to_string()),
            (Some(asset), None) => LogoRef::Asset {
                name: asset.name.clone(),
                file_path: None,
            },
            (None, None) => LogoRef::None,
        };

        ChannelRecord {
            id: channel.id.clone(),
            tvg_id: channel.tvg_id.clone(),
            name: channel.name.clone(),
            logo,
        }
    }
}

pub struct JsonChannelStore {
    path: PathBuf,
    document: Mutex<StoreDocument>,
}

impl JsonChannelStore {
    /// Open an existing store. A missing file means there is nothing to
    /// resolve against and is reported as [`StoreError::Unavailable`].
    pub async fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        let path = path.as_ref().to_path_buf();
        let contents = fs::read(&path).await.map_err(|e| {
            StoreError::unavailable(format!("cannot read {}: {}", path.display(), e))
        })?;
        let document: StoreDocument = serde_json::from_slice(&contents)?;

        info!(
            "Opened channel store {} ({} channels, {} logos)",
            path.display(),
            document.channels.len(),
            document.logos.len()
        );

        Ok(Self {
            path,
            document: Mutex::new(document),
        })
    }

    pub fn from_document(path: impl Into<PathBuf>, document: StoreDocument) -> Self {
        Self {
            path: path.into(),
            document: Mutex::new(document),
        }
    }

    pub async fn snapshot(&self) -> StoreDocument {
        self.document.lock().await.clone()
    }

    async fn persist(&self, document: &StoreDocument) -> StoreResult<()> {
        let json = serde_json::to_vec_pretty(document)?;
        let tmp_path = self.path.with_extension("json.tmp");
        fs::write(&tmp_path, json).await?;
        fs::rename(&tmp_path, &self.path).await?;
        Ok(())
    }
}

#[async_trait]
impl ChannelSource for JsonChannelStore {
    async fn list_channels(&self) -> StoreResult<Vec<ChannelRecord>> {
        let document = self.document.lock().await;
        Ok(document
            .channels
            .iter()
            .map(|channel| document.to_record(channel))
            .collect())
    }
}

#[async_trait]
impl LogoAssigner for JsonChannelStore {
    async fn assign_logo(&self, channel: &ChannelRecord, logo: &DownloadedLogo) -> StoreResult<()> {
        let mut document = self.document.lock().await;

        // Changes go to a copy; the guard only sees them once they are on disk
        let mut staged = document.clone();

        let channel_index = staged
            .channels
            .iter()
            .position(|c| c.id == channel.id)
            .ok_or_else(|| StoreError::assignment(&channel.id, "channel no longer exists"))?;

        let name = logo.logo_name();
        let file_path = logo.local_path.to_string_lossy().into_owned();

        let logo_id = match staged.logos.iter_mut().find(|l| l.name == name) {
            Some(existing) => {
                if existing.file_path.as_deref().is_none_or(str::is_empty) {
                    existing.file_path = Some(file_path);
                    existing.updated_at = Utc::now();
                }
                debug!("Reusing logo entry: {}", name);
                existing.id
            }
            None => {
                let created = LogoAsset::new(name, Some(file_path));
                let id = created.id;
                staged.logos.push(created);
                info!("Created new logo entry: {}", name);
                id
            }
        };

        staged.channels[channel_index].logo_id = Some(logo_id);

        self.persist(&staged)
            .await
            .map_err(|e| StoreError::assignment(channel.display_label(), e.to_string()))?;
        *document = staged;

        info!("Assigned {:?} -> Logo({:?})", channel.display_label(), name);
        Ok(())
    }
}
