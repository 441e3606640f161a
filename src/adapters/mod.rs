pub mod chat_completions;
pub mod clock;
pub mod config_store;
pub mod database_file;
pub mod egress_guard;
pub mod feedback_log;
pub mod last_dir;

pub use chat_completions::ChatCompletionsClient;
pub use clock::SystemClock;
pub use config_store::TomlConfigStore;
pub use database_file::JsonFileDatabase;
pub use egress_guard::EgressGuard;
pub use feedback_log::JsonFeedbackLog;
pub use last_dir::JsonLastDirStore;
