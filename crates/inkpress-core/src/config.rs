//! Application configuration.
//!
//! All external knobs are read once at startup and passed by value into the
//! component constructors. Nothing reads the process environment after
//! [`AppConfig::from_env`] returns; dry-run in particular is a plain field,
//! not ambient state.

use std::path::PathBuf;

pub const DEFAULT_SCAFFOLD_MODEL: &str = "x-ai/grok-4-fast:free";
pub const DEFAULT_HYDRATE_MODEL: &str = "openai/gpt-5";
pub const DEFAULT_MAX_LINKS: usize = 5;
pub const DEFAULT_MAX_MEDIA_BYTES: u64 = 10 * 1024 * 1024;
pub const DEFAULT_CACHE_DIR: &str = ".cache";

const DEFAULT_COMPLETIONS_URL: &str = "https://openrouter.ai/api/v1/chat/completions";
const DEFAULT_SEARCH_URL: &str = "https://serpapi.com/search";

/// Process-wide configuration, constructed once at startup.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// WordPress site base URL.
    pub wp_url: Option<String>,
    /// WordPress username for basic auth.
    pub wp_user: Option<String>,
    /// WordPress application password.
    pub wp_app_pass: Option<String>,
    /// OpenRouter API key for LLM calls.
    pub openrouter_api_key: Option<String>,
    /// SerpAPI key for link search.
    pub serpapi_key: Option<String>,
    /// Chat completions endpoint.
    pub completions_url: String,
    /// Link search endpoint.
    pub search_url: String,
    /// Value sent in the User-Agent header on all outbound requests.
    pub user_agent: String,
    /// Hard cap on bytes fetched for a remote featured image.
    pub max_media_bytes: u64,
    /// When set, every external call is replaced by a deterministic stub.
    pub dry_run: bool,
    /// Root directory of the durable fingerprint cache.
    pub cache_dir: PathBuf,
    /// Model used for the outline stage.
    pub scaffold_model: String,
    /// Model used for the prose stage.
    pub hydrate_model: String,
    /// Default number of links fetched by the link search.
    pub max_links: usize,
}

impl AppConfig {
    /// Load configuration from the process environment, reading a `.env`
    /// file first if one is present.
    pub fn from_env() -> Self {
        let _ = dotenvy::dotenv();

        Self {
            wp_url: env_opt("WP_URL"),
            wp_user: env_opt("WP_USER"),
            wp_app_pass: env_opt("WP_APP_PASS"),
            openrouter_api_key: env_opt("OPENROUTER_API_KEY"),
            serpapi_key: env_opt("SERPAPI_KEY"),
            completions_url: env_or("COMPLETIONS_URL", DEFAULT_COMPLETIONS_URL),
            search_url: env_or("SEARCH_URL", DEFAULT_SEARCH_URL),
            user_agent: env_or("USER_AGENT", "inkpress"),
            max_media_bytes: env_opt("MAX_MEDIA_BYTES")
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_MAX_MEDIA_BYTES),
            dry_run: env_opt("DRY_RUN").as_deref() == Some("1"),
            cache_dir: PathBuf::from(env_or("CACHE_DIR", DEFAULT_CACHE_DIR)),
            scaffold_model: env_or("SCAFFOLD_MODEL", DEFAULT_SCAFFOLD_MODEL),
            hydrate_model: env_or("HYDRATE_MODEL", DEFAULT_HYDRATE_MODEL),
            max_links: DEFAULT_MAX_LINKS,
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            wp_url: None,
            wp_user: None,
            wp_app_pass: None,
            openrouter_api_key: None,
            serpapi_key: None,
            completions_url: DEFAULT_COMPLETIONS_URL.to_string(),
            search_url: DEFAULT_SEARCH_URL.to_string(),
            user_agent: "inkpress".to_string(),
            max_media_bytes: DEFAULT_MAX_MEDIA_BYTES,
            dry_run: false,
            cache_dir: PathBuf::from(DEFAULT_CACHE_DIR),
            scaffold_model: DEFAULT_SCAFFOLD_MODEL.to_string(),
            hydrate_model: DEFAULT_HYDRATE_MODEL.to_string(),
            max_links: DEFAULT_MAX_LINKS,
        }
    }
}

fn env_opt(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.is_empty())
}

fn env_or(key: &str, default: &str) -> String {
    env_opt(key).unwrap_or_else(|| default.to_string())
}
