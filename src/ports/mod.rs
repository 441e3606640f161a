pub mod analysis;
pub mod clock;
pub mod config;
pub mod database;
pub mod feedback;
pub mod http;
pub mod state;

pub use analysis::AnalysisClient;
pub use clock::Clock;
pub use config::ConfigStore;
pub use database::DatabaseSource;
pub use feedback::FeedbackLog;
pub use http::HttpClient;
pub use state::DirectoryMemory;
