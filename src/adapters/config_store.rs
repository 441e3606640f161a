use std::fs;
use std::path::PathBuf;

use tracing::{debug, info};

use crate::domain::{AppConfig, DomainError};
use crate::ports::ConfigStore;

const APP_DIR: &str = "DeviceCheck";
const CONFIG_FILE: &str = "config.toml";

/// `config.toml` plus state files under the per-user application directory.
///
/// - macOS: `~/Library/Application Support/DeviceCheck/`
/// - Windows: `%APPDATA%\DeviceCheck\`
/// - Linux: `~/.config/DeviceCheck/`
pub struct TomlConfigStore {
    root: PathBuf,
    logs: PathBuf,
}

impl TomlConfigStore {
    pub fn new() -> Result<Self, DomainError> {
        #[cfg(target_os = "macos")]
        let root = dirs::data_dir();
        #[cfg(not(target_os = "macos"))]
        let root = dirs::config_dir();

        let root = root
            .map(|p| p.join(APP_DIR))
            .ok_or_else(|| DomainError::Config("no per-user configuration directory on this system".to_string()))?;

        // Linux keeps logs out of ~/.config
        #[cfg(any(target_os = "macos", target_os = "windows"))]
        let logs = root.join("logs");
        #[cfg(not(any(target_os = "macos", target_os = "windows")))]
        let logs = dirs::data_dir()
            .map(|p| p.join(APP_DIR).join("logs"))
            .unwrap_or_else(|| root.join("logs"));

        Self::rooted(root, logs)
    }

    /// Store everything, logs included, under `root`.
    pub fn with_data_dir(root: PathBuf) -> Result<Self, DomainError> {
        let logs = root.join("logs");
        Self::rooted(root, logs)
    }

    fn rooted(root: PathBuf, logs: PathBuf) -> Result<Self, DomainError> {
        fs::create_dir_all(&root)?;
        debug!(root = ?root, logs = ?logs, "Config store ready");
        Ok(Self { root, logs })
    }
}

impl ConfigStore for TomlConfigStore {
    fn load(&self) -> Result<AppConfig, DomainError> {
        let path = self.config_path();

        if !path.exists() {
            info!(path = ?path, "No config.toml yet, writing defaults");
            let config = AppConfig::new();
            self.save(&config)?;
            return Ok(config);
        }

        let config: AppConfig = toml::from_str(&fs::read_to_string(&path)?)?;
        debug!(path = ?path, offline = config.network.offline, "Configuration loaded");
        Ok(config)
    }

    fn save(&self, config: &AppConfig) -> Result<(), DomainError> {
        let path = self.config_path();
        fs::write(&path, toml::to_string_pretty(config)?)?;
        debug!(path = ?path, "Configuration written");
        Ok(())
    }

    fn config_path(&self) -> PathBuf {
        self.root.join(CONFIG_FILE)
    }

    fn data_dir(&self) -> PathBuf {
        self.root.clone()
    }

    fn logs_dir(&self) -> PathBuf {
        self.logs.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::FingerprintRule;

    fn store() -> (tempfile::TempDir, TomlConfigStore) {
        let temp = tempfile::tempdir().unwrap();
        let store = TomlConfigStore::with_data_dir(temp.path().join("DeviceCheck")).unwrap();
        (temp, store)
    }

    #[test]
    fn test_state_files_live_under_data_dir() {
        let (temp, store) = store();

        assert!(store.config_path().ends_with("config.toml"));
        assert!(store.feedback_log_path().ends_with("feedback_logs.json"));
        assert!(store.last_dir_path().starts_with(temp.path()));
        assert_eq!(store.logs_dir(), store.data_dir().join("logs"));
    }

    #[test]
    fn test_first_load_writes_defaults() {
        let (_temp, store) = store();

        let config = store.load().unwrap();
        assert_eq!(config.cache.max_entries, 100);
        assert_eq!(config.paths.database, PathBuf::from("software_db.json"));
        assert!(store.config_path().exists());
    }

    #[test]
    fn test_saved_settings_survive_reload() {
        let (_temp, store) = store();

        let mut config = AppConfig::new();
        config.network.offline = true;
        config.cache.ttl_hours = 1;
        config.cache.fingerprint = FingerprintRule::FullInput;
        store.save(&config).unwrap();

        let loaded = store.load().unwrap();
        assert!(loaded.network.offline);
        assert_eq!(loaded.cache.ttl_hours, 1);
        assert_eq!(loaded.cache.fingerprint, FingerprintRule::FullInput);
    }

    #[test]
    fn test_malformed_config_is_config_error() {
        let (_temp, store) = store();
        fs::write(store.config_path(), "[cache\nmax_entries = ").unwrap();

        assert!(matches!(store.load(), Err(DomainError::Config(_))));
    }
}
