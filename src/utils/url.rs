//! URL helpers for the remote listing and raw content endpoints

use regex::Regex;
use url::Url;

/// URL utilities for consistent URL handling
pub struct UrlUtils;

impl UrlUtils {
    /// Build the raw content URL for a repository-relative path.
    ///
    /// Each path segment is percent-escaped; the `/` separators are kept.
    ///
    /// ```rust
    /// use tvlogo_sync::utils::url::UrlUtils;
    ///
    /// assert_eq!(
    ///     UrlUtils::raw_content_url("https://raw.example.com/main/", "United States/A&E.png"),
    ///     "https://raw.example.com/main/United%20States/A%26E.png"
    /// );
    /// ```
    pub fn raw_content_url(base: &str, path: &str) -> String {
        let escaped = path
            .trim_start_matches('/')
            .split('/')
            .map(|segment| urlencoding::encode(segment).into_owned())
            .collect::<Vec<_>>()
            .join("/");
        format!("{base}{escaped}")
    }

    /// Obfuscate credentials in URLs and error messages for safe logging
    ///
    /// Masks `user:pass@` authority parts and token-like query parameters.
    pub fn obfuscate_credentials(url: &str) -> String {
        let mut obfuscated = url.to_string();

        if let Ok(parsed) = Url::parse(url)
            && (!parsed.username().is_empty() || parsed.password().is_some())
        {
            let mut new_url = parsed.clone();
            let _ = new_url.set_username("****");
            let _ = new_url.set_password(Some("****"));
            obfuscated = new_url.to_string();
        }

        let sensitive_params = ["access_token", "token", "password", "pass"];

        for param in &sensitive_params {
            let pattern = format!(r"(?i)([?&]{}=)[^&]*", regex::escape(param));
            if let Ok(re) = Regex::new(&pattern) {
                obfuscated = re.replace_all(&obfuscated, "${1}****").to_string();
            }
        }

        obfuscated
    }
}
