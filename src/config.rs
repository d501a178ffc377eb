//! Configuration module for Droply.

use serde::Deserialize;
use std::path::Path;

use crate::file::DEFAULT_MAX_DEPTH;
use crate::{DroplyError, Result};

/// Web API configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct WebConfig {
    /// Host address to bind.
    #[serde(default = "default_web_host")]
    pub host: String,
    /// Port number for the API.
    #[serde(default = "default_web_port")]
    pub port: u16,
    /// CORS allowed origins.
    #[serde(default)]
    pub cors_origins: Vec<String>,
    /// Secret used to verify bearer tokens.
    #[serde(default)]
    pub jwt_secret: String,
}

fn default_web_host() -> String {
    "0.0.0.0".to_string()
}

fn default_web_port() -> u16 {
    8080
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            host: default_web_host(),
            port: default_web_port(),
            cors_origins: vec![],
            jwt_secret: String::new(),
        }
    }
}

/// Database configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Path to the SQLite database file.
    #[serde(default = "default_db_path")]
    pub path: String,
}

fn default_db_path() -> String {
    "data/droply.db".to_string()
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
        }
    }
}

/// Which object store backend holds the file bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ObjectStoreProvider {
    /// ImageKit media API.
    ImageKit,
    /// In-process store, for local development.
    Memory,
}

/// Remote object store configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ObjectStoreConfig {
    /// Backend to use.
    #[serde(default = "default_provider")]
    pub provider: ObjectStoreProvider,
    /// Base URL of the provider's management API.
    #[serde(default = "default_api_base")]
    pub api_base: String,
    /// Private API key (used for authenticated management calls).
    #[serde(default)]
    pub private_key: String,
    /// Total request timeout in seconds.
    #[serde(default = "default_object_store_timeout")]
    pub timeout_secs: u64,
}

fn default_provider() -> ObjectStoreProvider {
    ObjectStoreProvider::ImageKit
}

fn default_api_base() -> String {
    "https://api.imagekit.io".to_string()
}

fn default_object_store_timeout() -> u64 {
    30
}

impl Default for ObjectStoreConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            api_base: default_api_base(),
            private_key: String::new(),
            timeout_secs: default_object_store_timeout(),
        }
    }
}

/// Recursive deletion configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DeletionConfig {
    /// Deepest folder level the engine descends into (root is level 0).
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,
    /// Time budget for one subtree deletion in seconds (0 = unlimited).
    #[serde(default)]
    pub timeout_secs: u64,
}

fn default_max_depth() -> usize {
    DEFAULT_MAX_DEPTH
}

impl Default for DeletionConfig {
    fn default() -> Self {
        Self {
            max_depth: default_max_depth(),
            timeout_secs: 0,
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Path to the log file (empty for console only).
    #[serde(default = "default_log_file")]
    pub file: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_file() -> String {
    "logs/droply.log".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: default_log_file(),
        }
    }
}

/// Main configuration structure.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct Config {
    /// Web API configuration.
    #[serde(default)]
    pub web: WebConfig,
    /// Database configuration.
    #[serde(default)]
    pub database: DatabaseConfig,
    /// Object store configuration.
    #[serde(default)]
    pub object_store: ObjectStoreConfig,
    /// Deletion engine configuration.
    #[serde(default)]
    pub deletion: DeletionConfig,
    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(DroplyError::Io)?;
        Self::parse(&content)
    }

    /// Load configuration from a TOML file and apply environment variable overrides.
    pub fn load_with_env<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Parse configuration from a TOML string.
    pub fn parse(s: &str) -> Result<Self> {
        toml::from_str(s).map_err(|e| DroplyError::Config(format!("config parse error: {e}")))
    }

    /// Apply environment variable overrides to the configuration.
    ///
    /// Supported environment variables:
    /// - `DROPLY_JWT_SECRET`: token verification secret
    /// - `IMAGEKIT_PRIVATE_KEY`: object store management key
    ///
    /// Empty values are ignored.
    pub fn apply_env_overrides(&mut self) {
        let overrides: [(&str, &mut String); 2] = [
            ("DROPLY_JWT_SECRET", &mut self.web.jwt_secret),
            ("IMAGEKIT_PRIVATE_KEY", &mut self.object_store.private_key),
        ];

        for (name, target) in overrides {
            if let Ok(value) = std::env::var(name) {
                if !value.is_empty() {
                    *target = value;
                }
            }
        }
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        if self.web.jwt_secret.is_empty() {
            return Err(DroplyError::Config(
                "jwt_secret is not set. \
                 Set it in config.toml or via DROPLY_JWT_SECRET environment variable."
                    .to_string(),
            ));
        }
        if self.object_store.provider == ObjectStoreProvider::ImageKit
            && self.object_store.private_key.is_empty()
        {
            return Err(DroplyError::Config(
                "object_store.private_key is required for the imagekit provider".to_string(),
            ));
        }
        if self.deletion.max_depth == 0 {
            return Err(DroplyError::Config(
                "deletion.max_depth must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
