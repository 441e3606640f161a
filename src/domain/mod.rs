pub mod cache;
pub mod config;
pub mod database;
pub mod error;
pub mod feedback;
pub mod fingerprint;
pub mod input;
pub mod prompt;

pub use cache::RequestCache;
pub use config::AppConfig;
pub use database::{CapabilityDatabase, HardwareRecord, RegionShape};
pub use error::DomainError;
pub use feedback::{FeedbackKind, FeedbackRecord};
pub use fingerprint::{Fingerprint, FingerprintRule};
pub use input::{InputDocument, RequiredField};
pub use prompt::AnalysisRequest;
