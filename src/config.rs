//! Runtime configuration.
//!
//! Sources, lowest priority first: compiled defaults, TOML file
//! (`~/.config/art-explorer/config.toml` or an explicit path), environment
//! variables (`ARTX_*`), then command-line flags applied by the binary.

use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_BASE_URL: &str = "https://api.harvardartmuseums.org";
pub const DEFAULT_GEOCODER_URL: &str = "https://nominatim.openstreetmap.org/search";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Cannot read config file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid config file {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("No API key configured. Set ARTX_API_KEY, pass --api-key, or add api_key to the config file")]
    MissingApiKey,

    #[error("Invalid setting '{0}': {1}")]
    Invalid(&'static str, String),
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api_key: Option<String>,
    pub base_url: String,
    /// Records requested per object listing.
    pub page_size: u32,
    /// Total attempts per artwork fetch, first one included.
    pub max_attempts: u32,
    pub debounce_ms: u64,
    pub timeout_secs: u64,
    pub user_agent: String,
    pub cache_path: Option<PathBuf>,
    pub geocoder_url: String,
    pub host: String,
    pub port: u16,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            page_size: 50,
            max_attempts: 3,
            debounce_ms: 500,
            timeout_secs: 15,
            user_agent: concat!("ArtExplorer/", env!("CARGO_PKG_VERSION")).to_string(),
            cache_path: None,
            geocoder_url: DEFAULT_GEOCODER_URL.to_string(),
            host: "127.0.0.1".to_string(),
            port: 3070,
        }
    }
}

/// Settings the Harvard API client needs, with the key already resolved.
#[derive(Debug, Clone)]
pub struct ApiSettings {
    pub base_url: String,
    pub api_key: String,
    pub page_size: u32,
    pub max_attempts: u32,
}

impl Config {
    /// Load from an explicit file, or from the default location when it exists,
    /// then apply `ARTX_*` environment overrides.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match explicit {
            Some(path) => Self::from_file(path)?,
            None => match Self::default_path() {
                Some(path) if path.exists() => Self::from_file(&path)?,
                _ => Self::default(),
            },
        };
        config.apply_env(|key| std::env::var(key).ok());
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("art-explorer").join("config.toml"))
    }

    /// Overlay environment variables. `lookup` is injected so tests need not
    /// touch the process environment.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(key) = lookup("ARTX_API_KEY").filter(|k| !k.trim().is_empty()) {
            self.api_key = Some(key);
        }
        if let Some(url) = lookup("ARTX_BASE_URL") {
            self.base_url = url;
        }
        if let Some(path) = lookup("ARTX_CACHE_PATH") {
            self.cache_path = Some(PathBuf::from(path));
        }
    }

    pub fn api_settings(&self) -> Result<ApiSettings, ConfigError> {
        let api_key = self
            .api_key
            .clone()
            .filter(|k| !k.trim().is_empty())
            .ok_or(ConfigError::MissingApiKey)?;
        if self.max_attempts == 0 {
            return Err(ConfigError::Invalid("max_attempts", "must be at least 1".into()));
        }
        if self.page_size == 0 {
            return Err(ConfigError::Invalid("page_size", "must be at least 1".into()));
        }
        Ok(ApiSettings {
            base_url: self.base_url.trim_end_matches('/').to_string(),
            api_key,
            page_size: self.page_size,
            max_attempts: self.max_attempts,
        })
    }

    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Culture cache file: configured path or `~/.art-explorer/cultures.json`.
    pub fn culture_cache_path(&self) -> PathBuf {
        self.cache_path.clone().unwrap_or_else(|| {
            dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".art-explorer")
                .join("cultures.json")
        })
    }

    pub fn http_agent(&self) -> ureq::Agent {
        ureq::AgentBuilder::new()
            .timeout(self.timeout())
            .user_agent(&self.user_agent)
            .build()
    }
}
