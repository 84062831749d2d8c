use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A logo record owned by the host; channels point at it by id
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogoAsset {
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub file_path: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl LogoAsset {
    pub fn new<S: Into<String>>(name: S, file_path: Option<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            file_path,
            created_at: now,
            updated_at: now,
        }
    }
}

/// What a channel currently has in place of a logo
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum LogoRef {
    #[default]
    None,
    /// Plain string attribute, e.g. the `tvg-logo` URL from a playlist
    Url(String),
    /// Reference to a [`LogoAsset`]
    Asset { name: String, file_path: Option<String> },
}

impl LogoRef {
    /// The value the placeholder check runs against
    pub fn current_value(&self) -> Option<&str> {
        match self {
            LogoRef::None => None,
            LogoRef::Url(url) => Some(url.as_str()),
            LogoRef::Asset { file_path, .. } => file_path.as_deref(),
        }
    }
}

/// A channel as seen by a resolution pass
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelRecord {
    pub id: String,
    pub tvg_id: Option<String>,
    pub name: Option<String>,
    pub logo: LogoRef,
}

impl ChannelRecord {
    /// Best label for log lines
    pub fn display_label(&self) -> &str {
        self.name
            .as_deref()
            .or(self.tvg_id.as_deref())
            .unwrap_or("(unknown)")
    }
}
