use anyhow::{Context, Result};
use confyg::{env, Confygery};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::spotify::SpotifyCredentials;

/// Default catalog API root.
pub const DEFAULT_CATALOG_BASE_URL: &str = "https://timikeys.up.railway.app/api/v1";

/// Default per-request timeout in seconds.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Configuration for cadenza.
///
/// Configuration is loaded from multiple sources with the following priority:
/// 1. CLI arguments (highest priority)
/// 2. Environment variables (CADENZA_* prefix)
/// 3. Config file (~/.config/cadenza/config.toml)
/// 4. Built-in defaults (lowest priority)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Root URL of the performance catalog API.
    ///
    /// Can be set via:
    /// - CLI: --catalog-url https://...
    /// - ENV: CADENZA_CATALOG_BASE_URL
    /// - Config: catalog_base_url = "..."
    #[serde(default = "default_catalog_base_url")]
    pub catalog_base_url: String,

    /// Spotify client ID, used to look up album track order.
    ///
    /// Can be set via:
    /// - ENV: CADENZA_SPOTIFY_CLIENT_ID
    /// - Config: spotify_client_id = "..."
    pub spotify_client_id: Option<String>,

    /// Spotify client secret, paired with `spotify_client_id`.
    ///
    /// Can be set via:
    /// - ENV: CADENZA_SPOTIFY_CLIENT_SECRET
    /// - Config: spotify_client_secret = "..."
    pub spotify_client_secret: Option<String>,

    /// Timeout applied to every outbound HTTP request, in seconds.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            catalog_base_url: default_catalog_base_url(),
            spotify_client_id: None,
            spotify_client_secret: None,
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

impl Config {
    /// Load configuration from file and environment variables.
    ///
    /// Searches for config file at: ~/.config/cadenza/config.toml
    /// Reads environment variables with CADENZA_ prefix.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed.
    pub fn load() -> Result<Self> {
        Self::load_from(&config_file_path())
    }

    /// Load configuration from a specific file plus environment variables.
    ///
    /// A missing file is not an error; defaults and environment apply.
    pub fn load_from(config_path: &Path) -> Result<Self> {
        let mut builder = Confygery::new().context("Failed to create config builder")?;

        if config_path.exists() {
            let path_str = config_path
                .to_str()
                .ok_or_else(|| anyhow::anyhow!("Config path contains invalid UTF-8"))?;
            builder
                .add_file(path_str)
                .context("Failed to load config file")?;
        }

        let env_opts = env::Options::with_top_level("cadenza");
        builder
            .add_env(env_opts)
            .context("Failed to load environment variables")?;

        let config: Self = builder
            .build()
            .context("Failed to build configuration")?;

        anyhow::ensure!(
            config.request_timeout_secs > 0,
            "request_timeout_secs must be positive"
        );

        Ok(config)
    }

    /// Load configuration with a custom catalog URL.
    ///
    /// This is used when the --catalog-url CLI flag is provided.
    pub fn load_with_catalog_url(catalog_base_url: String) -> Result<Self> {
        let mut config = Self::load()?;
        config.catalog_base_url = catalog_base_url;
        Ok(config)
    }

    /// Spotify credentials, if both halves are configured and non-empty.
    pub fn spotify_credentials(&self) -> Option<SpotifyCredentials> {
        let client_id = self.spotify_client_id.as_deref().filter(|s| !s.is_empty())?;
        let client_secret = self
            .spotify_client_secret
            .as_deref()
            .filter(|s| !s.is_empty())?;
        Some(SpotifyCredentials::new(client_id, client_secret))
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

fn default_catalog_base_url() -> String {
    DEFAULT_CATALOG_BASE_URL.to_string()
}

fn default_request_timeout_secs() -> u64 {
    DEFAULT_REQUEST_TIMEOUT_SECS
}

/// Get the config file path.
///
/// Returns:
/// - Linux: ~/.config/cadenza/config.toml
/// - macOS: ~/Library/Application Support/cadenza/config.toml
/// - Windows: %APPDATA%\cadenza\config.toml
pub fn config_file_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("cadenza")
        .join("config.toml")
}

/// Get the example config file content.
pub fn example_config() -> &'static str {
    r#"# Cadenza Configuration File
#
# Configuration is loaded from multiple sources with the following priority:
# 1. CLI arguments (highest priority)
# 2. Environment variables (CADENZA_* prefix)
# 3. This config file
# 4. Built-in defaults (lowest priority)

# Root URL of the performance catalog API
#
# Can also be set via:
# - CLI: cadenza --catalog-url https://example.com/api/v1 search ...
# - Environment: CADENZA_CATALOG_BASE_URL=https://example.com/api/v1
catalog_base_url = "https://timikeys.up.railway.app/api/v1"

# Spotify client credentials
# Used to put album searches in the album's real track order.
# Without them, album searches fall back to grouping duplicate songs.
#
# Create an app at: https://developer.spotify.com/dashboard
#
# Can also be set via:
# - Environment: CADENZA_SPOTIFY_CLIENT_ID / CADENZA_SPOTIFY_CLIENT_SECRET
#spotify_client_id = "your-client-id"
#spotify_client_secret = "your-client-secret"

# Timeout for every outbound HTTP request, in seconds
#request_timeout_secs = 30
"#
}

/// Create default config file if it doesn't exist.
///
/// Returns true if a new file was created, false if it already existed.
pub fn ensure_config_file() -> Result<bool> {
    ensure_config_file_at(&config_file_path())
}

/// Create a default config file at `config_path` if it doesn't exist.
pub fn ensure_config_file_at(config_path: &Path) -> Result<bool> {
    if config_path.exists() {
        return Ok(false);
    }

    if let Some(parent) = config_path.parent() {
        std::fs::create_dir_all(parent).context("Failed to create config directory")?;
    }

    std::fs::write(config_path, example_config()).context("Failed to write config file")?;

    Ok(true)
}
