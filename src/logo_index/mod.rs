//! Normalized-name index over the remote logo listing
//!
//! The index maps a normalized key (see [`crate::utils::normalize_key`]) to the
//! repository-relative path of the first image file whose basename produced
//! that key. It is rebuilt or reloaded every pass and never shared between
//! passes except through the on-disk cache file.

use serde::Serialize;
use std::collections::BTreeMap;
use strum::{AsRefStr, Display};

use crate::sources::TreeNode;
use crate::utils::{basename, normalize_key, split_image_extension};

pub mod builder;
pub mod resolver;

pub use builder::IndexBuilder;
pub use resolver::{Candidates, pick_path};

/// Where the index handed to a pass came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Display, AsRefStr)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum IndexOrigin {
    /// Built from a successful listing fetch
    Fresh,
    /// Loaded from a cache file younger than the TTL
    Cached,
    /// Loaded from an expired cache file after the fetch failed
    Stale,
    /// Fetch failed and no usable cache existed
    Empty,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogoIndex {
    entries: BTreeMap<String, String>,
    origin: IndexOrigin,
}

impl LogoIndex {
    pub fn empty() -> Self {
        Self {
            entries: BTreeMap::new(),
            origin: IndexOrigin::Empty,
        }
    }

    pub fn from_entries(entries: BTreeMap<String, String>, origin: IndexOrigin) -> Self {
        Self { entries, origin }
    }

    /// Build from listing nodes: image blobs only, first path per key wins.
    pub fn from_tree<'a, I>(nodes: I) -> Self
    where
        I: IntoIterator<Item = &'a TreeNode>,
    {
        let mut index = Self {
            entries: BTreeMap::new(),
            origin: IndexOrigin::Fresh,
        };

        for node in nodes {
            if !node.is_blob() {
                continue;
            }
            let Some((stem, _ext)) = split_image_extension(basename(&node.path)) else {
                continue;
            };
            let key = normalize_key(stem);
            if key.is_empty() {
                continue;
            }
            index.insert_first(key, node.path.clone());
        }

        index
    }

    /// Insert unless the key is already taken. Returns whether it was inserted.
    pub fn insert_first(&mut self, key: String, path: String) -> bool {
        match self.entries.entry(key) {
            std::collections::btree_map::Entry::Vacant(slot) => {
                slot.insert(path);
                true
            }
            std::collections::btree_map::Entry::Occupied(_) => false,
        }
    }

    /// Exact lookup on an already-normalized key
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    pub fn entries(&self) -> &BTreeMap<String, String> {
        &self.entries
    }

    pub fn origin(&self) -> IndexOrigin {
        self.origin
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
