/// Configuration default values
///
/// This module contains all the default values for configuration options,
/// making them easily changeable in one central location.
// Storage defaults
pub const DEFAULT_LOGOS_DIR: &str = "/data/logos";
pub const DEFAULT_INDEX_FILENAME: &str = ".tvlogos_index.json";
pub const DEFAULT_INDEX_TTL_SECS: u64 = 6 * 60 * 60;

// Remote defaults
pub const DEFAULT_TREE_URL: &str =
    "https://api.github.com/repos/jesmannstl/tvlogos/git/trees/main?recursive=1";
pub const DEFAULT_RAW_BASE_URL: &str = "https://raw.githubusercontent.com/jesmannstl/tvlogos/main/";
pub const DEFAULT_USER_AGENT: &str = concat!("tvlogo-sync/", env!("CARGO_PKG_VERSION"));
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 45;

// Run lock defaults
pub const DEFAULT_LOCK_FILENAME: &str = "tvlogo_sync.lock";
pub const DEFAULT_LOCK_FRESHNESS_SECS: u64 = 60;

// Autorun defaults
pub const DEFAULT_AUTORUN_ENABLED: bool = true;
pub const DEFAULT_AUTORUN_DELAY_SECS: u64 = 2;

// Environment variables read on top of the prefixed ones
pub const ENV_PREFIX: &str = "TVLOGO_";
pub const ENV_LOGOS_DIR: &str = "DISPATCHARR_LOGO_DIR";
pub const ENV_TOKEN_VARS: [&str; 2] = ["GITHUB_TOKEN", "GH_TOKEN"];
