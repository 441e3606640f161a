use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::domain::DomainError;
use crate::ports::DirectoryMemory;

#[derive(Debug, Serialize, Deserialize)]
struct LastDirState {
    last_dir: PathBuf,
}

/// Directory memory persisted as `{"last_dir": ...}`.
pub struct JsonLastDirStore {
    path: PathBuf,
}

impl JsonLastDirStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn stored(&self) -> Result<PathBuf, DomainError> {
        let content = fs::read_to_string(&self.path)?;
        let state: LastDirState = serde_json::from_str(&content)?;
        Ok(state.last_dir)
    }
}

fn current_dir() -> PathBuf {
    std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."))
}

impl DirectoryMemory for JsonLastDirStore {
    fn last_dir(&self) -> PathBuf {
        match self.stored() {
            Ok(dir) if dir.is_dir() => dir,
            Ok(dir) => {
                debug!(dir = ?dir, "Remembered directory no longer exists");
                current_dir()
            }
            Err(e) => {
                debug!(path = ?self.path, error = %e, "No remembered directory");
                current_dir()
            }
        }
    }

    fn remember(&self, file: &Path) -> Result<(), DomainError> {
        let Some(dir) = file.parent().filter(|d| !d.as_os_str().is_empty()) else {
            warn!(file = ?file, "File has no parent directory; nothing to remember");
            return Ok(());
        };
        let dir = dir.canonicalize().unwrap_or_else(|_| dir.to_path_buf());

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let state = LastDirState { last_dir: dir };
        fs::write(&self.path, serde_json::to_string(&state)?)?;

        debug!(dir = ?state.last_dir, "Remembered input directory");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remember_then_recall() {
        let temp = tempfile::tempdir().unwrap();
        let inputs = temp.path().join("inputs");
        fs::create_dir_all(&inputs).unwrap();
        let store = JsonLastDirStore::new(temp.path().join("last_dir.json"));

        store.remember(&inputs.join("device.json")).unwrap();
        assert_eq!(store.last_dir(), inputs.canonicalize().unwrap());
    }

    #[test]
    fn test_missing_state_falls_back_to_cwd() {
        let temp = tempfile::tempdir().unwrap();
        let store = JsonLastDirStore::new(temp.path().join("last_dir.json"));
        assert_eq!(store.last_dir(), current_dir());
    }

    #[test]
    fn test_vanished_directory_falls_back_to_cwd() {
        let temp = tempfile::tempdir().unwrap();
        let inputs = temp.path().join("gone");
        fs::create_dir_all(&inputs).unwrap();
        let store = JsonLastDirStore::new(temp.path().join("last_dir.json"));
        store.remember(&inputs.join("device.json")).unwrap();

        fs::remove_dir_all(&inputs).unwrap();
        assert_eq!(store.last_dir(), current_dir());
    }
}
