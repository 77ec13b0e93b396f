//! Client configuration: defaults, optional TOML file, environment

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::fs;

use itms_core::constants::{
    DEFAULT_API_PREFIX, DEFAULT_ORIGIN, DEFAULT_TIMEOUT_SECS, ITMS_API_BASE_URL, ITMS_CONFIG_FILE,
    ITMS_HTTP_TIMEOUT_SECS, ITMS_ORIGIN, ITMS_TOKEN_FILE, VITE_API_BASE_URL,
};

use crate::error::{ClientError, ClientResult};

/// Resolved settings the transport is built from
#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    /// Absolute base URL every REST path is appended to, without trailing slash
    pub base_url: String,

    pub timeout: Duration,

    /// Where the token pair is persisted; `None` keeps tokens in memory
    pub token_file: Option<PathBuf>,
}

/// `config.toml` layout
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FileConfig {
    #[serde(default)]
    pub api: ApiSection,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ApiSection {
    pub base_url: Option<String>,
    pub origin: Option<String>,
    pub timeout_secs: Option<u64>,
    pub token_file: Option<PathBuf>,
}

impl FileConfig {
    /// Read a config file; a missing file yields the empty layer
    pub async fn load(path: &Path) -> ClientResult<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .await
            .map_err(|e| ClientError::config(format!("Failed to read config: {}", e)))?;

        toml::from_str(&content)
            .map_err(|e| ClientError::config(format!("Invalid config format: {}", e)))
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: resolve_base_url(None, DEFAULT_ORIGIN),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            token_file: Some(itms_core::token_file()),
        }
    }
}

impl ClientConfig {
    /// Resolve from `.env`, the process environment and the config file.
    ///
    /// Environment values win over the file; the file wins over defaults.
    pub async fn load() -> ClientResult<Self> {
        dotenvy::dotenv().ok();

        let file_path = std::env::var(ITMS_CONFIG_FILE)
            .map(PathBuf::from)
            .unwrap_or_else(|_| itms_core::config_file());
        let file = FileConfig::load(&file_path).await?;

        Self::from_sources(&file, |name| std::env::var(name).ok())
    }

    /// Resolve from `.env` and the process environment only
    pub fn from_env() -> ClientResult<Self> {
        dotenvy::dotenv().ok();
        Self::from_sources(&FileConfig::default(), |name| std::env::var(name).ok())
    }

    /// Layer `lookup` (an environment) over `file` over the defaults
    pub fn from_sources<F>(file: &FileConfig, lookup: F) -> ClientResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let lookup = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let origin = lookup(ITMS_ORIGIN)
            .or_else(|| file.api.origin.clone())
            .unwrap_or_else(|| DEFAULT_ORIGIN.to_string());

        let base_override = lookup(ITMS_API_BASE_URL)
            .or_else(|| lookup(VITE_API_BASE_URL))
            .or_else(|| file.api.base_url.clone());

        let timeout_secs = match lookup(ITMS_HTTP_TIMEOUT_SECS) {
            Some(raw) => raw.trim().parse::<u64>().map_err(|_| {
                ClientError::config(format!(
                    "{} must be a whole number of seconds",
                    ITMS_HTTP_TIMEOUT_SECS
                ))
            })?,
            None => file.api.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS),
        };

        let token_file = lookup(ITMS_TOKEN_FILE)
            .map(PathBuf::from)
            .or_else(|| file.api.token_file.clone())
            .unwrap_or_else(itms_core::token_file);

        let config = Self {
            base_url: resolve_base_url(base_override.as_deref(), &origin),
            timeout: Duration::from_secs(timeout_secs),
            token_file: Some(token_file),
        };
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> ClientResult<()> {
        let url = url::Url::parse(&self.base_url).map_err(|e| {
            ClientError::config(format!("Invalid base URL {}: {}", self.base_url, e))
        })?;

        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(ClientError::config(format!(
                "Base URL must use http or https, got {}",
                url.scheme()
            )));
        }
        if self.timeout.is_zero() {
            return Err(ClientError::config("Timeout must be greater than zero"));
        }
        Ok(())
    }

    /// Absolute URL of a REST path such as `/projects/3`
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

/// Turn an optional base URL override into an absolute base URL.
///
/// Without an override the `/api` prefix is used on `origin`; overrides that
/// start with `/` are joined onto `origin` the same way.
pub fn resolve_base_url(base_override: Option<&str>, origin: &str) -> String {
    let origin = origin.trim().trim_end_matches('/');
    let resolved = match base_override.map(str::trim).filter(|v| !v.is_empty()) {
        Some(path) if path.starts_with('/') => format!("{}{}", origin, path),
        Some(absolute) => absolute.to_string(),
        None => format!("{}{}", origin, DEFAULT_API_PREFIX),
    };
    resolved.trim_end_matches('/').to_string()
}

/// Configuration builder
#[derive(Debug, Clone, Default)]
pub struct ClientConfigBuilder {
    config: ClientConfig,
}

impl ClientConfigBuilder {
    /// Start from the defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from an already resolved configuration
    pub fn from_config(config: ClientConfig) -> Self {
        Self { config }
    }

    /// Absolute base URL, or a `/path` joined onto the default origin
    pub fn base_url(mut self, url: impl AsRef<str>) -> Self {
        self.config.base_url = resolve_base_url(Some(url.as_ref()), DEFAULT_ORIGIN);
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    pub fn token_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.token_file = Some(path.into());
        self
    }

    /// Keep tokens in memory only
    pub fn ephemeral(mut self) -> Self {
        self.config.token_file = None;
        self
    }

    /// Build and validate the configuration
    pub fn build(self) -> ClientResult<ClientConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}
