//! Remote logo listing sources
//!
//! A [`LogoSource`] answers two questions: what files exist upstream, and
//! what are the bytes of one of them. The GitHub implementation talks to the
//! git trees API and raw.githubusercontent.com; tests provide their own.

use async_trait::async_trait;
use bytes::Bytes;
use serde::{Deserialize, Serialize};

use crate::errors::SourceResult;

pub mod github;

pub use github::GithubTreeSource;

/// Node type GitHub uses for regular files in a tree listing
pub const BLOB_NODE_TYPE: &str = "blob";

/// One `{type, path}` node of a recursive tree listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeNode {
    #[serde(rename = "type", default)]
    pub node_type: String,
    #[serde(default)]
    pub path: String,
}

/// Response body of the recursive tree endpoint. Other fields are ignored;
/// a body without `tree` is rejected as malformed.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TreeListing {
    pub tree: Vec<TreeNode>,
    #[serde(default)]
    pub truncated: bool,
}

impl TreeNode {
    pub fn blob<S: Into<String>>(path: S) -> Self {
        Self {
            node_type: BLOB_NODE_TYPE.to_string(),
            path: path.into(),
        }
    }

    pub fn is_blob(&self) -> bool {
        self.node_type == BLOB_NODE_TYPE
    }
}

#[async_trait]
pub trait LogoSource: Send + Sync {
    /// Human-readable label for logs
    fn label(&self) -> &str;

    /// Fetch the full recursive listing
    async fn fetch_tree(&self) -> SourceResult<TreeListing>;

    /// Fetch the raw bytes of a repository-relative path
    async fn fetch_raw(&self, path: &str) -> SourceResult<Bytes>;
}
