use std::sync::Arc;
use std::time::Duration;

use tracing::warn;

use crate::domain::prompt;
use crate::domain::{DomainError, FeedbackKind, FeedbackRecord};
use crate::ports::{AnalysisClient, FeedbackLog};

/// Sends user feedback on a report to the model and keeps a record of it.
pub struct FeedbackDesk {
    client: Arc<dyn AnalysisClient>,
    log: Arc<dyn FeedbackLog>,
    timeout: Duration,
}

impl FeedbackDesk {
    pub fn new(client: Arc<dyn AnalysisClient>, log: Arc<dyn FeedbackLog>, timeout: Duration) -> Self {
        Self {
            client,
            log,
            timeout,
        }
    }

    /// Submit feedback about `original_result`.
    ///
    /// The record is persisted even when the model cannot be reached; in that
    /// case it has no reply and the remote error is returned.
    pub async fn submit(
        &self,
        kind: FeedbackKind,
        feedback: &str,
        original_result: &str,
    ) -> Result<FeedbackRecord, DomainError> {
        let feedback = feedback.trim();
        if feedback.is_empty() {
            return Err(DomainError::EmptyFeedback);
        }

        let request = prompt::feedback_request(kind, original_result, feedback, self.timeout);
        match self.client.analyze(&request).await {
            Ok(reply) => {
                let record = FeedbackRecord::new(kind, feedback, original_result, Some(reply));
                self.log.append(&record)?;
                Ok(record)
            }
            Err(err) => {
                let record = FeedbackRecord::new(kind, feedback, original_result, None);
                if let Err(log_err) = self.log.append(&record) {
                    warn!(error = %log_err, "Failed to persist feedback after remote failure");
                }
                Err(err)
            }
        }
    }

    pub fn history(&self) -> Result<Vec<FeedbackRecord>, DomainError> {
        self.log.load()
    }
}
