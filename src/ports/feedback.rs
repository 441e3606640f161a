use crate::domain::{DomainError, FeedbackRecord};

/// Append-only store of user feedback.
pub trait FeedbackLog: Send + Sync {
    fn append(&self, record: &FeedbackRecord) -> Result<(), DomainError>;

    /// All records, oldest first.
    fn load(&self) -> Result<Vec<FeedbackRecord>, DomainError>;
}
