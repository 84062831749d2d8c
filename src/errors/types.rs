//! Error type definitions for tvlogo-sync
//!
//! Errors are split by the layer that produces them. Only [`AppError`] is
//! meant to reach the binary; everything below the pass boundary is recovered
//! into a counter, a reason code or a stale-cache fallback.

use std::path::PathBuf;
use thiserror::Error;

/// Top-level application error type
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration errors
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// HTTP client construction errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

/// Errors talking to the remote logo listing
#[derive(Error, Debug)]
pub enum SourceError {
    /// Request exceeded the configured timeout
    #[error("Connection timeout: {url}")]
    Timeout { url: String },

    /// GitHub answers 403 (or 429) once the anonymous quota is spent
    #[error("Rate limited: {url} (HTTP {status})")]
    RateLimited { url: String, status: u16 },

    /// Any other non-success status
    #[error("HTTP error: {status} - {url}")]
    Http { status: u16, url: String },

    /// DNS, connect and body read failures
    #[error("Transport error: {url} - {message}")]
    Transport { url: String, message: String },

    /// Listing payload could not be decoded
    #[error("Parse error: {url} - {message}")]
    Parse { url: String, message: String },
}

/// Errors raised while fetching and persisting a single logo
#[derive(Error, Debug)]
pub enum DownloadError {
    #[error("Rate limited downloading {path}")]
    RateLimited { path: String },

    #[error("HTTP {status} downloading {path}")]
    Http { path: String, status: u16 },

    #[error("Transport error downloading {path}: {message}")]
    Transport { path: String, message: String },

    #[error("Failed to write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Errors from the channel store collaborators
#[derive(Error, Debug)]
pub enum StoreError {
    /// The backing store could not be reached at all
    #[error("Channel store unavailable: {message}")]
    Unavailable { message: String },

    /// Listing channels failed
    #[error("Query failed: {message}")]
    Query { message: String },

    /// A single assignment could not be persisted
    #[error("Assignment failed for {channel}: {message}")]
    Assignment { channel: String, message: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl AppError {
    /// Create a configuration error
    pub fn configuration<S: Into<String>>(message: S) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }
}

impl SourceError {
    /// Classify a reqwest transport failure
    pub fn from_reqwest(url: &str, error: reqwest::Error) -> Self {
        if error.is_timeout() {
            Self::Timeout {
                url: url.to_string(),
            }
        } else if error.is_decode() {
            Self::Parse {
                url: url.to_string(),
                message: error.to_string(),
            }
        } else {
            Self::Transport {
                url: url.to_string(),
                message: error.to_string(),
            }
        }
    }

    /// Classify a non-success status code
    pub fn from_status(url: &str, status: u16) -> Self {
        if is_rate_limit_status(status) {
            Self::RateLimited {
                url: url.to_string(),
                status,
            }
        } else {
            Self::Http {
                status,
                url: url.to_string(),
            }
        }
    }

    pub fn is_rate_limited(&self) -> bool {
        matches!(self, Self::RateLimited { .. })
    }
}

impl DownloadError {
    /// Map a remote fetch failure onto the download taxonomy
    pub fn from_source(path: &str, error: SourceError) -> Self {
        match error {
            SourceError::RateLimited { .. } => Self::RateLimited {
                path: path.to_string(),
            },
            SourceError::Http { status, .. } => Self::Http {
                path: path.to_string(),
                status,
            },
            other => Self::Transport {
                path: path.to_string(),
                message: other.to_string(),
            },
        }
    }

    pub fn is_rate_limited(&self) -> bool {
        matches!(self, Self::RateLimited { .. })
    }
}

impl StoreError {
    pub fn unavailable<S: Into<String>>(message: S) -> Self {
        Self::Unavailable {
            message: message.into(),
        }
    }

    pub fn query<S: Into<String>>(message: S) -> Self {
        Self::Query {
            message: message.into(),
        }
    }

    pub fn assignment<C: Into<String>, M: Into<String>>(channel: C, message: M) -> Self {
        Self::Assignment {
            channel: channel.into(),
            message: message.into(),
        }
    }
}

/// GitHub signals an exhausted quota with 403; 429 is the generic form.
pub fn is_rate_limit_status(status: u16) -> bool {
    status == 403 || status == 429
}
