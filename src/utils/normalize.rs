//! Canonical key normalization
//!
//! Index keys (remote file basenames) and lookup candidates (tvg-id, channel
//! name) both go through [`normalize_key`] so that "ESPN  Network",
//! "espn network" and " Espn Network " land on the same key.

use regex::Regex;
use std::sync::LazyLock;

static MULTI_SPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

/// Everything outside this set is dropped.
static DISALLOWED: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^a-z0-9. +_-]").unwrap());

/// Extensions recognised as logo images, lowercase and without the dot.
pub const IMAGE_EXTENSIONS: [&str; 5] = ["png", "webp", "jpg", "jpeg", "svg"];

/// Normalize a free-text key for index lookups.
///
/// Idempotent: `normalize_key(&normalize_key(x)) == normalize_key(x)`.
pub fn normalize_key(text: &str) -> String {
    let lowered = text.trim().to_lowercase();
    let collapsed = MULTI_SPACE.replace_all(&lowered, " ");

    let replaced = collapsed
        .replace('&', "and")
        .replace([':', '|'], "")
        .replace(['/', '\\'], " ");

    let filtered = DISALLOWED.replace_all(&replaced, "");
    MULTI_SPACE.replace_all(&filtered, " ").trim().to_string()
}

/// Split a file name into `(stem, extension)` when the extension is a known
/// image type. Matching is case-insensitive; the extension is returned as found.
pub fn split_image_extension(file_name: &str) -> Option<(&str, &str)> {
    let (stem, ext) = file_name.rsplit_once('.')?;
    IMAGE_EXTENSIONS
        .iter()
        .any(|known| ext.eq_ignore_ascii_case(known))
        .then_some((stem, ext))
}

/// Final segment of a `/`-separated repository path
pub fn basename(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}
