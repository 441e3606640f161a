use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Local};
use tracing::{info, warn};

use crate::domain::prompt::{self, CHAT_GREETING};
use crate::domain::{CapabilityDatabase, DomainError};
use crate::ports::{AnalysisClient, DatabaseSource};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Speaker {
    Assistant,
    User,
    System,
}

impl std::fmt::Display for Speaker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Speaker::Assistant => write!(f, "Assistant"),
            Speaker::User => write!(f, "You"),
            Speaker::System => write!(f, "System"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct TranscriptEntry {
    pub at: DateTime<Local>,
    pub speaker: Speaker,
    pub text: String,
}

impl std::fmt::Display for TranscriptEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}:\n{}", self.at.format("%H:%M:%S"), self.speaker, self.text)
    }
}

/// Question-and-answer session over the capability database.
///
/// The database is read once when the session opens.
pub struct ChatSession {
    database: CapabilityDatabase,
    client: Arc<dyn AnalysisClient>,
    timeout: Duration,
    transcript: Vec<TranscriptEntry>,
}

impl ChatSession {
    /// Open a session. A database that fails to load leaves the session
    /// running with an empty database and a system note in the transcript.
    pub fn open(source: &dyn DatabaseSource, client: Arc<dyn AnalysisClient>, timeout: Duration) -> Self {
        let mut session = Self {
            database: CapabilityDatabase::default(),
            client,
            timeout,
            transcript: Vec::new(),
        };

        match source.load() {
            Ok(database) => {
                info!(source = %source.describe(), hardware_count = database.len(), "Chat session opened");
                session.database = database;
            }
            Err(e) => {
                warn!(source = %source.describe(), error = %e, "Chat session opened without database");
                session.record(Speaker::System, e.to_string());
            }
        }

        session.record(Speaker::Assistant, CHAT_GREETING.to_string());
        session
    }

    /// Ask a question; the answer is returned and appended to the transcript.
    pub async fn ask(&mut self, question: &str) -> Result<String, DomainError> {
        let question = question.trim();
        if question.is_empty() {
            return Err(DomainError::EmptyQuestion);
        }
        self.record(Speaker::User, question.to_string());

        let request = prompt::chat_request(&self.database.to_pretty_json()?, question, self.timeout);
        match self.client.analyze(&request).await {
            Ok(answer) => {
                self.record(Speaker::Assistant, answer.clone());
                Ok(answer)
            }
            Err(e) => {
                self.record(Speaker::System, e.to_string());
                Err(e)
            }
        }
    }

    pub fn transcript(&self) -> &[TranscriptEntry] {
        &self.transcript
    }

    pub fn has_database(&self) -> bool {
        !self.database.is_empty()
    }

    fn record(&mut self, speaker: Speaker, text: String) {
        self.transcript.push(TranscriptEntry {
            at: Local::now(),
            speaker,
            text,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    use crate::domain::AnalysisRequest;

    struct Source(Result<&'static str, ()>);

    impl DatabaseSource for Source {
        fn load(&self) -> Result<CapabilityDatabase, DomainError> {
            match self.0 {
                Ok(json) => CapabilityDatabase::from_json_str(json),
                Err(()) => Err(DomainError::DatabaseLoad("software_db.json: not found".to_string())),
            }
        }

        fn describe(&self) -> String {
            "test".to_string()
        }
    }

    /// Answers with the number of characters in the user prompt.
    struct LengthClient;

    #[async_trait]
    impl AnalysisClient for LengthClient {
        async fn analyze(&self, request: &AnalysisRequest) -> Result<String, DomainError> {
            if request.user.contains("fail please") {
                return Err(DomainError::RemoteAnalysis("timeout".to_string()));
            }
            Ok(format!("{} chars", request.user.len()))
        }
    }

    #[tokio::test]
    async fn test_session_answers_and_records() {
        let mut session = ChatSession::open(
            &Source(Ok(r#"{"HW1": {"Regioes": ["EU"]}}"#)),
            Arc::new(LengthClient),
            Duration::from_secs(30),
        );
        assert!(session.has_database());

        let answer = session.ask("Which regions does HW1 support?").await.unwrap();
        assert!(answer.ends_with("chars"));

        let speakers: Vec<Speaker> = session.transcript().iter().map(|e| e.speaker).collect();
        assert_eq!(speakers, vec![Speaker::Assistant, Speaker::User, Speaker::Assistant]);
    }

    #[tokio::test]
    async fn test_missing_database_keeps_session_usable() {
        let mut session = ChatSession::open(&Source(Err(())), Arc::new(LengthClient), Duration::from_secs(30));
        assert!(!session.has_database());
        assert_eq!(session.transcript()[0].speaker, Speaker::System);

        assert!(session.ask("hello").await.is_ok());
    }

    #[tokio::test]
    async fn test_blank_question_rejected() {
        let mut session = ChatSession::open(&Source(Ok("{}")), Arc::new(LengthClient), Duration::from_secs(30));
        assert!(matches!(session.ask("  ").await, Err(DomainError::EmptyQuestion)));
        assert_eq!(session.transcript().len(), 1);
    }

    #[tokio::test]
    async fn test_remote_error_recorded_as_system() {
        let mut session = ChatSession::open(&Source(Ok("{}")), Arc::new(LengthClient), Duration::from_secs(30));
        assert!(session.ask("fail please").await.is_err());
        assert_eq!(session.transcript().last().unwrap().speaker, Speaker::System);
    }
}
