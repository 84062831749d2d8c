use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use strum::{AsRefStr, Display};
use tracing::{debug, info};

use crate::errors::{AppError, AppResult};

pub mod defaults;
pub mod duration_serde;

use defaults::*;
use duration_serde::duration;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub remote: RemoteConfig,
    #[serde(default)]
    pub lock: LockConfig,
    #[serde(default)]
    pub autorun: AutorunConfig,
    #[serde(default)]
    pub matching: MatchingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Where downloaded logos and the index cache live
    #[serde(default = "default_logos_dir")]
    pub logos_dir: PathBuf,
    #[serde(default = "default_index_filename")]
    pub index_filename: String,
    #[serde(default = "default_index_ttl", with = "duration")]
    pub index_ttl: Duration,
    /// JSON channel store used by the binary
    #[serde(default)]
    pub channels_file: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoteConfig {
    #[serde(default = "default_tree_url")]
    pub tree_url: String,
    #[serde(default = "default_raw_base_url")]
    pub raw_base_url: String,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    #[serde(default = "default_request_timeout", with = "duration")]
    pub request_timeout: Duration,
    /// Optional bearer token; anonymous access works, just with a lower quota
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LockConfig {
    #[serde(default = "default_lock_path")]
    pub path: PathBuf,
    #[serde(default = "default_lock_freshness", with = "duration")]
    pub freshness: Duration,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AutorunConfig {
    #[serde(default = "default_autorun_enabled")]
    pub enabled: bool,
    #[serde(default = "default_autorun_delay", with = "duration")]
    pub delay: Duration,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MatchingConfig {
    #[serde(default)]
    pub candidate_policy: CandidatePolicy,
}

/// Order in which a channel's keys are probed against the index
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Display, AsRefStr,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum CandidatePolicy {
    /// tvg-id first, then display name
    #[default]
    IdFirst,
    NameFirst,
}

fn default_logos_dir() -> PathBuf {
    PathBuf::from(DEFAULT_LOGOS_DIR)
}

fn default_index_filename() -> String {
    DEFAULT_INDEX_FILENAME.to_string()
}

fn default_index_ttl() -> Duration {
    Duration::from_secs(DEFAULT_INDEX_TTL_SECS)
}

fn default_tree_url() -> String {
    DEFAULT_TREE_URL.to_string()
}

fn default_raw_base_url() -> String {
    DEFAULT_RAW_BASE_URL.to_string()
}

fn default_user_agent() -> String {
    DEFAULT_USER_AGENT.to_string()
}

fn default_request_timeout() -> Duration {
    Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS)
}

fn default_lock_path() -> PathBuf {
    std::env::temp_dir().join(DEFAULT_LOCK_FILENAME)
}

fn default_lock_freshness() -> Duration {
    Duration::from_secs(DEFAULT_LOCK_FRESHNESS_SECS)
}

fn default_autorun_enabled() -> bool {
    DEFAULT_AUTORUN_ENABLED
}

fn default_autorun_delay() -> Duration {
    Duration::from_secs(DEFAULT_AUTORUN_DELAY_SECS)
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            logos_dir: default_logos_dir(),
            index_filename: default_index_filename(),
            index_ttl: default_index_ttl(),
            channels_file: None,
        }
    }
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            tree_url: default_tree_url(),
            raw_base_url: default_raw_base_url(),
            user_agent: default_user_agent(),
            request_timeout: default_request_timeout(),
            token: None,
        }
    }
}

impl Default for LockConfig {
    fn default() -> Self {
        Self {
            path: default_lock_path(),
            freshness: default_lock_freshness(),
        }
    }
}

impl Default for AutorunConfig {
    fn default() -> Self {
        Self {
            enabled: default_autorun_enabled(),
            delay: default_autorun_delay(),
        }
    }
}

impl Config {
    /// Layer defaults, an optional TOML file and `TVLOGO_` env vars, then the
    /// host's legacy variables on top.
    pub fn load(config_file: Option<&Path>) -> AppResult<Self> {
        let mut figment = Figment::from(Serialized::defaults(Config::default()));

        if let Some(path) = config_file {
            if path.exists() {
                info!("Loading configuration from {}", path.display());
                figment = figment.merge(Toml::file(path));
            } else {
                debug!("Config file {} not found, using defaults", path.display());
            }
        }

        let mut config: Config = figment
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()
            .map_err(|e| AppError::configuration(e.to_string()))?;

        config.apply_env_overrides(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    /// Apply `DISPATCHARR_LOGO_DIR` and `GITHUB_TOKEN`/`GH_TOKEN`.
    pub fn apply_env_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(dir) = lookup(ENV_LOGOS_DIR).filter(|v| !v.trim().is_empty()) {
            self.storage.logos_dir = PathBuf::from(dir);
        }

        if self.remote.token.is_none() {
            self.remote.token = ENV_TOKEN_VARS
                .iter()
                .find_map(|key| lookup(key).filter(|v| !v.trim().is_empty()));
        }
    }

    pub fn validate(&self) -> AppResult<()> {
        for (field, value) in [
            ("remote.tree_url", &self.remote.tree_url),
            ("remote.raw_base_url", &self.remote.raw_base_url),
        ] {
            url::Url::parse(value)
                .map_err(|e| AppError::configuration(format!("{field}: {e}")))?;
        }

        if !self.remote.raw_base_url.ends_with('/') {
            return Err(AppError::configuration(
                "remote.raw_base_url must end with '/'",
            ));
        }

        if self.storage.index_filename.contains(['/', '\\']) {
            return Err(AppError::configuration(
                "storage.index_filename must be a bare file name",
            ));
        }

        Ok(())
    }
}
