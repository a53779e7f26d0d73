use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Top-level configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub scrape: ScrapeConfig,
    #[serde(default)]
    pub http: HttpConfig,
}

/// What to scrape and where to put it
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ScrapeConfig {
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
    /// Raw per-feed item cap, normalized by [`normalize_limit`]
    #[serde(default = "default_limit")]
    pub limit: i64,
    #[serde(default)]
    pub front_page: bool,
    #[serde(default = "default_page_type")]
    pub page_type: String,
    /// Write every file straight into `output_dir`
    #[serde(default)]
    pub root_only: bool,
    #[serde(default)]
    pub subreddits: Vec<String>,
    #[serde(default = "default_max_concurrent_downloads")]
    pub max_concurrent_downloads: usize,
    #[serde(default = "default_display_loading")]
    pub display_loading: bool,
}

impl Default for ScrapeConfig {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
            limit: default_limit(),
            front_page: false,
            page_type: default_page_type(),
            root_only: false,
            subreddits: Vec::new(),
            max_concurrent_downloads: default_max_concurrent_downloads(),
            display_loading: default_display_loading(),
        }
    }
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("./")
}

fn default_limit() -> i64 {
    DEFAULT_LIMIT as i64
}

fn default_page_type() -> String {
    "hot".to_string()
}

fn default_max_concurrent_downloads() -> usize {
    25
}

fn default_display_loading() -> bool {
    true
}

/// HTTP client configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct HttpConfig {
    /// Root of the listing service, e.g. `https://www.reddit.com`
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
    /// Longest wait for the next piece of a response. Resets on every read,
    /// so large bodies on slow links are not cut off.
    #[serde(default = "default_read_timeout_secs")]
    pub read_timeout_secs: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            user_agent: default_user_agent(),
            connect_timeout_secs: default_connect_timeout_secs(),
            read_timeout_secs: default_read_timeout_secs(),
        }
    }
}

fn default_base_url() -> String {
    "https://www.reddit.com".to_string()
}

fn default_user_agent() -> String {
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64)".to_string()
}

fn default_connect_timeout_secs() -> u64 {
    10
}

fn default_read_timeout_secs() -> u64 {
    60
}

pub const DEFAULT_LIMIT: u32 = 50;
pub const MAX_LIMIT: u32 = 100;
const RESET_ABOVE: i64 = 500;

/// Clamp a requested per-feed cap into `[1, 100]`
///
/// Values `<= 0` or `> 500` fall back to the default; values in `(100, 500]`
/// are clamped down to 100 with a warning.
pub fn normalize_limit(requested: i64) -> u32 {
    if requested <= 0 || requested > RESET_ABOVE {
        return DEFAULT_LIMIT;
    }

    if requested > MAX_LIMIT as i64 {
        tracing::warn!(
            requested,
            limit = MAX_LIMIT,
            "Option 'limit' is enforced to {} or less",
            MAX_LIMIT
        );
        return MAX_LIMIT;
    }

    requested as u32
}
