use async_trait::async_trait;

use crate::domain::{AnalysisRequest, DomainError};

/// Port for the remote analysis model.
///
/// Implementations send a prompt to a language model and return its free-form
/// text answer. Failures are returned as errors, never as answer text.
#[async_trait]
pub trait AnalysisClient: Send + Sync {
    async fn analyze(&self, request: &AnalysisRequest) -> Result<String, DomainError>;
}
