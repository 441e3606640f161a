use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::domain::cache::{DEFAULT_MAX_ENTRIES, DEFAULT_TTL};
use crate::domain::fingerprint::FingerprintRule;

/// Remote model service configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RemoteConfig {
    /// Chat-completions endpoint.
    pub endpoint: String,
    /// Model name sent with every request.
    pub model: String,
    /// Environment variable holding the bearer token.
    pub api_key_env: String,
    /// Timeout for validation requests, in seconds.
    pub validation_timeout_secs: u64,
    /// Timeout for feedback requests, in seconds.
    pub feedback_timeout_secs: u64,
    /// Timeout for chat requests, in seconds.
    pub chat_timeout_secs: u64,
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://api.deepseek.com/v1/chat/completions".to_string(),
            model: "deepseek-chat".to_string(),
            api_key_env: "DEEPSEEK_API_KEY".to_string(),
            validation_timeout_secs: 60,
            feedback_timeout_secs: 30,
            chat_timeout_secs: 30,
        }
    }
}

impl RemoteConfig {
    pub fn validation_timeout(&self) -> Duration {
        Duration::from_secs(self.validation_timeout_secs)
    }

    pub fn feedback_timeout(&self) -> Duration {
        Duration::from_secs(self.feedback_timeout_secs)
    }

    pub fn chat_timeout(&self) -> Duration {
        Duration::from_secs(self.chat_timeout_secs)
    }
}

/// Outbound network policy.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkConfig {
    /// When true, every network request is refused.
    pub offline: bool,
    /// Hosts the client may talk to (subdomains included).
    pub allowed_domains: Vec<String>,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            offline: false,
            allowed_domains: Self::default_allowed_domains(),
        }
    }
}

impl NetworkConfig {
    pub fn default_allowed_domains() -> Vec<String> {
        vec!["api.deepseek.com".to_string()]
    }
}

/// Request cache configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Maximum number of cached reports (0 disables the cache).
    pub max_entries: usize,
    /// Hours before a cached report is ignored.
    pub ttl_hours: u64,
    /// Which request fields make up the cache key.
    pub fingerprint: FingerprintRule,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            max_entries: DEFAULT_MAX_ENTRIES,
            ttl_hours: DEFAULT_TTL.as_secs() / 3600,
            fingerprint: FingerprintRule::default(),
        }
    }
}

impl CacheConfig {
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_hours * 3600)
    }
}

/// File locations.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    /// Capability database, relative to the working directory unless absolute.
    pub database: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            database: PathBuf::from("software_db.json"),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level: "trace", "debug", "info", "warn", "error".
    pub level: String,
    /// Enable file logging with rotation.
    pub file_logging: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file_logging: true,
        }
    }
}

/// Main application configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    pub remote: RemoteConfig,
    pub network: NetworkConfig,
    pub cache: CacheConfig,
    pub paths: PathsConfig,
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Create a new AppConfig with default values.
    pub fn new() -> Self {
        Self::default()
    }
}
