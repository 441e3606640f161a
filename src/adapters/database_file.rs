use std::fs;
use std::path::PathBuf;

use tracing::debug;

use crate::domain::{CapabilityDatabase, DomainError};
use crate::ports::DatabaseSource;

/// Capability database read from a JSON file on every load.
pub struct JsonFileDatabase {
    path: PathBuf,
}

impl JsonFileDatabase {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl DatabaseSource for JsonFileDatabase {
    fn load(&self) -> Result<CapabilityDatabase, DomainError> {
        let content = fs::read_to_string(&self.path).map_err(|e| {
            DomainError::DatabaseLoad(format!("{}: {}", self.path.display(), e))
        })?;
        let database = CapabilityDatabase::from_json_str(&content)?;

        debug!(path = ?self.path, hardware_count = database.len(), "Capability database loaded");
        Ok(database)
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_loads_file() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("software_db.json");
        fs::write(&path, r#"{"HW1": {"Softwares": ["S1"], "Regioes": {"EU": ["S1"]}}}"#).unwrap();

        let database = JsonFileDatabase::new(&path).load().unwrap();
        assert!(database.hardware("HW1").is_some());
    }

    #[test]
    fn test_missing_file_is_load_error() {
        let temp = tempfile::tempdir().unwrap();
        let source = JsonFileDatabase::new(temp.path().join("absent.json"));
        match source.load() {
            Err(DomainError::DatabaseLoad(msg)) => assert!(msg.contains("absent.json")),
            other => panic!("expected DatabaseLoad, got {other:?}"),
        }
    }

    #[test]
    fn test_malformed_file_is_load_error() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("software_db.json");
        fs::write(&path, "{ broken").unwrap();

        assert!(matches!(
            JsonFileDatabase::new(&path).load(),
            Err(DomainError::DatabaseLoad(_))
        ));
    }
}
