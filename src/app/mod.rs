pub mod chat;
pub mod controller;
pub mod feedback;
pub mod pipeline;

pub use chat::{ChatSession, Speaker, TranscriptEntry};
pub use controller::{AppController, AppPaths, Overrides, RemoteStatus};
pub use feedback::FeedbackDesk;
pub use pipeline::{AnalysisOutcome, ReportSource, ValidationPipeline};
