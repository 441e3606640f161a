use std::path::PathBuf;

use crate::domain::{AppConfig, DomainError};

/// Where DeviceCheck keeps its settings and per-user state.
///
/// The capability database is not part of this; its path comes from
/// [`AppConfig::paths`] and is resolved against the working directory.
pub trait ConfigStore: Send + Sync {
    /// Read `config.toml`, writing a default one first if it is missing.
    fn load(&self) -> Result<AppConfig, DomainError>;

    fn save(&self, config: &AppConfig) -> Result<(), DomainError>;

    fn config_path(&self) -> PathBuf;

    /// Root of all per-user files.
    fn data_dir(&self) -> PathBuf;

    fn logs_dir(&self) -> PathBuf;

    /// Append-only feedback document.
    fn feedback_log_path(&self) -> PathBuf {
        self.data_dir().join("feedback_logs.json")
    }

    /// Remembered input directory.
    fn last_dir_path(&self) -> PathBuf {
        self.data_dir().join("last_dir.json")
    }
}
