//! Detection of logo references that stand in for "no logo"
//!
//! Hosts tend to seed channels with `logo.png`, `default.svg` or a generic
//! `download.jpg`. Those are treated exactly like an empty value: eligible for
//! replacement. Anything else is a real logo and is never overwritten.

use regex::Regex;
use std::sync::LazyLock;

static PLACEHOLDER_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    vec![
        Regex::new(r"(?i)(^|/)logo(\.(png|jpg|jpeg|webp|svg))?$").unwrap(),
        Regex::new(r"(?i)(^|/)default(\.(png|jpg|jpeg|webp|svg))?$").unwrap(),
        Regex::new(r"(?i)(^|/)download\.jpg$").unwrap(),
    ]
});

/// `true` when the value is missing, blank or a known placeholder file name.
pub fn is_placeholder(value: Option<&str>) -> bool {
    let Some(value) = value else {
        return true;
    };

    let trimmed = value.trim();
    if trimmed.is_empty() {
        return true;
    }

    PLACEHOLDER_PATTERNS.iter().any(|re| re.is_match(trimmed))
}
