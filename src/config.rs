//! Configuration System
//!
//! Handles loading configuration from files and environment variables.
//! Supports TOML config files and environment variable overrides.

use crate::prefs::DEFAULT_MAX_LIKED;
use crate::store::FirestoreConfig;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub store: StoreConfig,

    #[serde(default)]
    pub feed: FeedConfig,

    #[serde(default)]
    pub submission: SubmissionConfig,

    #[serde(default)]
    pub preferences: PreferencesConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Document store configuration
#[derive(Debug, Clone, Deserialize)]
pub struct StoreConfig {
    /// Talk to the remote store; when false the board runs on sample data
    #[serde(default)]
    pub use_remote_store: bool,

    #[serde(default)]
    pub project_id: String,

    #[serde(default)]
    pub api_key: Option<String>,

    #[serde(default = "default_collection")]
    pub collection: String,

    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default = "default_request_timeout")]
    pub request_timeout_ms: u64,
}

fn default_collection() -> String {
    "thankyous".to_string()
}

fn default_base_url() -> String {
    "https://firestore.googleapis.com/v1".to_string()
}

fn default_request_timeout() -> u64 {
    10_000
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            use_remote_store: false,
            project_id: String::new(),
            api_key: None,
            collection: default_collection(),
            base_url: default_base_url(),
            request_timeout_ms: default_request_timeout(),
        }
    }
}

impl StoreConfig {
    /// Client settings for the Firestore store
    pub fn firestore(&self) -> FirestoreConfig {
        FirestoreConfig {
            base_url: self.base_url.clone(),
            project_id: self.project_id.clone(),
            api_key: self.api_key.clone().filter(|k| !k.is_empty()),
            collection: self.collection.clone(),
            request_timeout_ms: self.request_timeout_ms,
            ..FirestoreConfig::default()
        }
    }
}

/// Feed paging and viewport configuration
#[derive(Debug, Clone, Deserialize)]
pub struct FeedConfig {
    /// First-page size on narrow viewports
    #[serde(default = "default_narrow_page_size")]
    pub narrow_page_size: usize,

    /// First-page size on wide viewports
    #[serde(default = "default_wide_page_size")]
    pub wide_page_size: usize,

    /// Size of each infinite-scroll continuation page
    #[serde(default = "default_scroll_page_size")]
    pub scroll_page_size: usize,

    /// Distance from the feed bottom that triggers the next page
    #[serde(default = "default_scroll_threshold")]
    pub scroll_threshold_px: u32,

    /// Widest viewport still treated as narrow
    #[serde(default = "default_narrow_max_width")]
    pub narrow_max_width: u32,

    /// Viewport width assumed by the terminal front-end
    #[serde(default = "default_viewport_width")]
    pub viewport_width: u32,

    /// Coalescing window for scroll/resize events
    #[serde(default = "default_debounce")]
    pub debounce_ms: u64,
}

fn default_narrow_page_size() -> usize {
    10
}

fn default_wide_page_size() -> usize {
    20
}

fn default_scroll_page_size() -> usize {
    10
}

fn default_scroll_threshold() -> u32 {
    200
}

fn default_narrow_max_width() -> u32 {
    768
}

fn default_viewport_width() -> u32 {
    1280
}

fn default_debounce() -> u64 {
    250
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            narrow_page_size: default_narrow_page_size(),
            wide_page_size: default_wide_page_size(),
            scroll_page_size: default_scroll_page_size(),
            scroll_threshold_px: default_scroll_threshold(),
            narrow_max_width: default_narrow_max_width(),
            viewport_width: default_viewport_width(),
            debounce_ms: default_debounce(),
        }
    }
}

impl FeedConfig {
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

/// Submission behaviour
#[derive(Debug, Clone, Deserialize)]
pub struct SubmissionConfig {
    /// Artificial delay of the simulated (local mode) submission
    #[serde(default = "default_simulated_delay")]
    pub simulated_delay_ms: u64,

    /// How long the confirmation notification stays up
    #[serde(default = "default_notification")]
    pub notification_ms: u64,
}

fn default_simulated_delay() -> u64 {
    1000
}

fn default_notification() -> u64 {
    3000
}

impl Default for SubmissionConfig {
    fn default() -> Self {
        Self {
            simulated_delay_ms: default_simulated_delay(),
            notification_ms: default_notification(),
        }
    }
}

impl SubmissionConfig {
    pub fn simulated_delay(&self) -> Duration {
        Duration::from_millis(self.simulated_delay_ms)
    }

    pub fn notification_ttl(&self) -> Duration {
        Duration::from_millis(self.notification_ms)
    }
}

/// Local preference storage
#[derive(Debug, Clone, Deserialize)]
pub struct PreferencesConfig {
    #[serde(default = "default_preferences_path")]
    pub path: String,

    #[serde(default = "default_max_liked")]
    pub max_liked: usize,
}

fn default_preferences_path() -> String {
    dirs::data_local_dir()
        .map(|p| {
            p.join("thankwall")
                .join("preferences.json")
                .to_string_lossy()
                .to_string()
        })
        .unwrap_or_else(|| "./thankwall_preferences.json".to_string())
}

fn default_max_liked() -> usize {
    DEFAULT_MAX_LIKED
}

impl Default for PreferencesConfig {
    fn default() -> Self {
        Self {
            path: default_preferences_path(),
            max_liked: default_max_liked(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl Config {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        Self::parse(&content).map_err(|error| ConfigError::Parse {
            path: path.to_path_buf(),
            error,
        })
    }

    /// Parse configuration from TOML text
    pub fn parse(content: &str) -> Result<Self, String> {
        toml::from_str(content).map_err(|e| e.to_string())
    }

    /// Load configuration from environment variables only
    pub fn from_env() -> Self {
        let mut config = Config::default();
        config.apply_env_overrides();
        config
    }

    /// Load configuration with environment variable overrides
    pub fn load_with_env(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Load from default locations or environment
    pub fn load_default() -> Self {
        let config_paths = [
            dirs::config_dir().map(|p| p.join("thankwall").join("config.toml")),
            Some(PathBuf::from("/etc/thankwall/config.toml")),
            Some(PathBuf::from("./config.toml")),
        ];

        for path_opt in config_paths.iter().flatten() {
            if path_opt.exists() {
                match Self::load_with_env(path_opt) {
                    Ok(config) => {
                        tracing::info!("Loaded config from {:?}", path_opt);
                        return config;
                    }
                    Err(e) => {
                        tracing::warn!("Failed to load config from {:?}: {}", path_opt, e);
                    }
                }
            }
        }

        tracing::info!("Using default config with environment overrides");
        Self::from_env()
    }

    /// Apply environment variable overrides to an existing config
    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Apply overrides from any `THANKWALL_*` lookup
    fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        // Store overrides
        if let Some(v) = lookup("THANKWALL_USE_REMOTE_STORE") {
            self.store.use_remote_store = matches!(v.trim(), "1" | "true" | "TRUE" | "yes");
        }
        if let Some(project) = lookup("THANKWALL_PROJECT_ID") {
            self.store.project_id = project;
        }
        if let Some(key) = lookup("THANKWALL_API_KEY") {
            self.store.api_key = Some(key);
        }
        if let Some(collection) = lookup("THANKWALL_COLLECTION") {
            self.store.collection = collection;
        }

        // Feed overrides
        if let Some(width) = lookup("THANKWALL_VIEWPORT_WIDTH") {
            if let Ok(w) = width.parse() {
                self.feed.viewport_width = w;
            }
        }

        // Preferences overrides
        if let Some(path) = lookup("THANKWALL_PREFERENCES_PATH") {
            self.preferences.path = path;
        }

        // Logging overrides
        if let Some(level) = lookup("THANKWALL_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Some(format) = lookup("THANKWALL_LOG_FORMAT") {
            self.logging.format = format;
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path:?}: {error}")]
    Io { path: PathBuf, error: String },

    #[error("Failed to parse config file {path:?}: {error}")]
    Parse { path: PathBuf, error: String },
}

/// Generate a default config file content
pub fn generate_default_config() -> String {
    r#"# Thankwall Configuration
#
# Environment variables override these settings:
# - THANKWALL_USE_REMOTE_STORE
# - THANKWALL_PROJECT_ID
# - THANKWALL_API_KEY
# - THANKWALL_COLLECTION
# - THANKWALL_VIEWPORT_WIDTH
# - THANKWALL_PREFERENCES_PATH
# - THANKWALL_LOG_LEVEL
# - THANKWALL_LOG_FORMAT

[store]
# Use the remote document store. When false the board shows sample data
# and submissions are simulated locally.
use_remote_store = false

# Firestore project and web API key
project_id = ""
# api_key = ""

# Collection holding the notes
collection = "thankyous"

# REST endpoint root
base_url = "https://firestore.googleapis.com/v1"

# Request timeout (ms)
request_timeout_ms = 10000

[feed]
# First page size on narrow / wide viewports
narrow_page_size = 10
wide_page_size = 20

# Continuation page size for infinite scroll (wide viewports only)
scroll_page_size = 10

# Load the next page when within this many pixels of the feed bottom
scroll_threshold_px = 200

# Viewports up to this width are narrow
narrow_max_width = 768

# Width assumed by the terminal front-end
viewport_width = 1280

# Coalescing window for scroll events (ms)
debounce_ms = 250

[submission]
# Delay of a simulated submission in local mode (ms)
simulated_delay_ms = 1000

# How long the confirmation stays visible (ms)
notification_ms = 3000

[preferences]
# File holding liked notes and the remote-store override
# path = "~/.local/share/thankwall/preferences.json"

# Maximum number of remembered likes
max_liked = 1000

[logging]
# Log level: trace, debug, info, warn, error
level = "info"

# Log format: pretty (for development) or json (for production)
format = "pretty"
"#
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert!(!config.store.use_remote_store);
        assert_eq!(config.store.collection, "thankyous");
        assert_eq!(config.feed.narrow_page_size, 10);
        assert_eq!(config.feed.wide_page_size, 20);
        assert_eq!(config.feed.scroll_page_size, 10);
        assert_eq!(config.feed.scroll_threshold_px, 200);
        assert_eq!(config.submission.simulated_delay_ms, 1000);
        assert_eq!(config.preferences.max_liked, DEFAULT_MAX_LIKED);
    }

    #[test]
    fn test_generated_config_parses() {
        let config = Config::parse(&generate_default_config()).unwrap();
        assert!(!config.store.use_remote_store);
        assert_eq!(config.feed.viewport_width, 1280);
        assert_eq!(config.logging.format, "pretty");
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config = Config::parse(
            r#"
            [store]
            use_remote_store = true
            project_id = "thanks-demo"
            "#,
        )
        .unwrap();

        assert!(config.store.use_remote_store);
        assert_eq!(config.store.project_id, "thanks-demo");
        assert_eq!(config.store.request_timeout_ms, 10_000);
        assert_eq!(config.feed.wide_page_size, 20);
    }

    #[test]
    fn test_overrides() {
        let env: HashMap<&str, &str> = [
            ("THANKWALL_USE_REMOTE_STORE", "true"),
            ("THANKWALL_PROJECT_ID", "p1"),
            ("THANKWALL_VIEWPORT_WIDTH", "600"),
            ("THANKWALL_LOG_FORMAT", "json"),
        ]
        .into_iter()
        .collect();

        let mut config = Config::default();
        config.apply_overrides(|k| env.get(k).map(|v| v.to_string()));

        assert!(config.store.use_remote_store);
        assert_eq!(config.store.project_id, "p1");
        assert_eq!(config.feed.viewport_width, 600);
        assert_eq!(config.logging.format, "json");
    }

    #[test]
    fn test_firestore_settings_drop_empty_key() {
        let mut config = StoreConfig::default();
        config.project_id = "p".into();
        config.api_key = Some(String::new());

        let fs = config.firestore();
        assert_eq!(fs.project_id, "p");
        assert_eq!(fs.api_key, None);
        assert_eq!(fs.database, "(default)");
    }
}
