use thiserror::Error;

use crate::domain::input::RequiredField;

/// Domain-level errors for DeviceCheck.
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Network request blocked: {reason}")]
    NetworkBlocked { reason: String },

    #[error("HTTP request failed: {0}")]
    HttpRequest(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("IO error: {0}")]
    Io(String),

    #[error("Failed to read input document: {0}")]
    InputLoad(String),

    #[error("Missing required field: {0}")]
    MissingField(RequiredField),

    #[error("Failed to load capability database: {0}")]
    DatabaseLoad(String),

    #[error("Hardware '{0}' not found in the capability database")]
    HardwareUnknown(String),

    #[error("Invalid hardware/software/region relation: {hardware} / {software} / {region}")]
    RelationInvalid {
        hardware: String,
        software: String,
        region: String,
    },

    #[error("Remote analysis failed: {0}")]
    RemoteAnalysis(String),

    #[error("No analysis has been run yet")]
    NoPriorResult,

    #[error("Feedback text is empty")]
    EmptyFeedback,

    #[error("Question is empty")]
    EmptyQuestion,
}

impl DomainError {
    /// Whether this error came from talking to the remote model service.
    pub fn is_remote(&self) -> bool {
        matches!(
            self,
            DomainError::RemoteAnalysis(_)
                | DomainError::HttpRequest(_)
                | DomainError::NetworkBlocked { .. }
        )
    }
}

impl From<std::io::Error> for DomainError {
    fn from(err: std::io::Error) -> Self {
        DomainError::Io(err.to_string())
    }
}

impl From<toml::de::Error> for DomainError {
    fn from(err: toml::de::Error) -> Self {
        DomainError::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for DomainError {
    fn from(err: toml::ser::Error) -> Self {
        DomainError::Serialization(err.to_string())
    }
}

impl From<serde_json::Error> for DomainError {
    fn from(err: serde_json::Error) -> Self {
        DomainError::Serialization(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_field_message_names_key() {
        let err = DomainError::MissingField(RequiredField::Bluetooth);
        assert_eq!(err.to_string(), "Missing required field: Bluetooth");
    }

    #[test]
    fn test_remote_classification() {
        assert!(DomainError::RemoteAnalysis("boom".to_string()).is_remote());
        assert!(DomainError::NetworkBlocked {
            reason: "offline".to_string()
        }
        .is_remote());
        assert!(!DomainError::HardwareUnknown("HW9".to_string()).is_remote());
    }
}
