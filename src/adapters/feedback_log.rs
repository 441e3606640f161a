use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{info, warn};

use crate::domain::{DomainError, FeedbackRecord};
use crate::ports::FeedbackLog;

/// On-disk document. Entries stay untyped so records written by other
/// versions survive a rewrite unchanged.
#[derive(Debug, Default, Serialize, Deserialize)]
struct FeedbackDocument {
    #[serde(default)]
    feedbacks: Vec<Value>,
}

/// Feedback log kept as a single pretty-printed JSON document.
pub struct JsonFeedbackLog {
    path: PathBuf,
}

impl JsonFeedbackLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// A missing file or one that is not JSON at all starts a fresh log.
    /// Well-formed JSON of the wrong shape is an error and is left untouched.
    fn read_document(&self) -> Result<FeedbackDocument, DomainError> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(FeedbackDocument::default()),
            Err(e) => return Err(e.into()),
        };

        match serde_json::from_str::<FeedbackDocument>(&content) {
            Ok(document) => Ok(document),
            Err(e) if e.is_syntax() || e.is_eof() => {
                warn!(path = ?self.path, error = %e, "Feedback log is not valid JSON, starting a new one");
                Ok(FeedbackDocument::default())
            }
            Err(e) => Err(DomainError::Serialization(format!(
                "{}: unexpected feedback log layout: {}",
                self.path.display(),
                e
            ))),
        }
    }
}

impl FeedbackLog for JsonFeedbackLog {
    fn append(&self, record: &FeedbackRecord) -> Result<(), DomainError> {
        let mut document = self.read_document()?;
        document.feedbacks.push(serde_json::to_value(record)?);

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, serde_json::to_string_pretty(&document)?)?;

        info!(path = ?self.path, kind = %record.kind, total = document.feedbacks.len(), "Feedback saved");
        Ok(())
    }

    /// Entries this version cannot read are skipped.
    fn load(&self) -> Result<Vec<FeedbackRecord>, DomainError> {
        let records = self
            .read_document()?
            .feedbacks
            .into_iter()
            .filter_map(|entry| match serde_json::from_value(entry) {
                Ok(record) => Some(record),
                Err(e) => {
                    warn!(path = ?self.path, error = %e, "Skipping unreadable feedback entry");
                    None
                }
            })
            .collect();
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::FeedbackKind;

    #[test]
    fn test_append_accumulates() {
        let temp = tempfile::tempdir().unwrap();
        let log = JsonFeedbackLog::new(temp.path().join("feedback_logs.json"));

        log.append(&FeedbackRecord::new(FeedbackKind::Correction, "wrong NFC", "r1", Some("ok".into())))
            .unwrap();
        log.append(&FeedbackRecord::new(FeedbackKind::Other, "thanks", "r2", None))
            .unwrap();

        let records = log.load().unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].feedback, "wrong NFC");
        assert_eq!(records[1].remote_reply, None);
    }

    #[test]
    fn test_corrupt_file_is_replaced() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("feedback_logs.json");
        fs::write(&path, "not json").unwrap();
        let log = JsonFeedbackLog::new(&path);

        assert!(log.load().unwrap().is_empty());
        log.append(&FeedbackRecord::new(FeedbackKind::Question, "why?", "r", None))
            .unwrap();

        let raw: serde_json::Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(raw["feedbacks"].as_array().unwrap().len(), 1);
    }

    #[test]
    fn test_unfamiliar_entries_survive_append() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("feedback_logs.json");
        let legacy = serde_json::json!({
            "feedbacks": [
                {"timestamp": "2024-05-01 10:00:00", "kind": "outro", "feedback": "x"},
                {"timestamp": "2024-05-01 10:05:00", "kind": "correction", "feedback": "y",
                 "original_result": "r", "remote_reply": null}
            ]
        });
        fs::write(&path, legacy.to_string()).unwrap();
        let log = JsonFeedbackLog::new(&path);

        log.append(&FeedbackRecord::new(FeedbackKind::Improvement, "z", "r", None))
            .unwrap();

        let raw: serde_json::Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        let entries = raw["feedbacks"].as_array().unwrap();
        assert_eq!(entries.len(), 3);
        assert_eq!(entries[0], legacy["feedbacks"][0]);
        assert_eq!(entries[2]["kind"], "improvement");

        let records = log.load().unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].feedback, "y");
    }

    #[test]
    fn test_wrong_layout_is_error_and_kept() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("feedback_logs.json");
        fs::write(&path, r#"{"feedbacks": "none"}"#).unwrap();
        let log = JsonFeedbackLog::new(&path);

        let result = log.append(&FeedbackRecord::new(FeedbackKind::Other, "a", "r", None));
        assert!(matches!(result, Err(DomainError::Serialization(_))));
        assert_eq!(fs::read_to_string(&path).unwrap(), r#"{"feedbacks": "none"}"#);
    }
}
