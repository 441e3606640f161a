use serde::{Deserialize, Serialize};

/// What the user's feedback on a report is about.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeedbackKind {
    #[default]
    Correction,
    Improvement,
    Question,
    Other,
}

impl FeedbackKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FeedbackKind::Correction => "correction",
            FeedbackKind::Improvement => "improvement",
            FeedbackKind::Question => "question",
            FeedbackKind::Other => "other",
        }
    }

    /// Description sent to the model along with the feedback.
    pub fn label(&self) -> &'static str {
        match self {
            FeedbackKind::Correction => "Correction of an incorrect result",
            FeedbackKind::Improvement => "Suggestion to improve the analysis",
            FeedbackKind::Question => "Question about the result",
            FeedbackKind::Other => "General feedback",
        }
    }
}

impl std::fmt::Display for FeedbackKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A persisted piece of user feedback on an analysis report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedbackRecord {
    /// Local time, `YYYY-MM-DD HH:MM:SS`.
    pub timestamp: String,
    pub kind: FeedbackKind,
    pub feedback: String,
    pub original_result: String,
    /// Model reply; `None` when the remote call failed.
    pub remote_reply: Option<String>,
}

impl FeedbackRecord {
    pub fn new(
        kind: FeedbackKind,
        feedback: impl Into<String>,
        original_result: impl Into<String>,
        remote_reply: Option<String>,
    ) -> Self {
        Self {
            timestamp: chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
            kind,
            feedback: feedback.into(),
            original_result: original_result.into(),
            remote_reply,
        }
    }
}
