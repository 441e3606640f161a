use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, info, warn};
use tracing_appender::non_blocking::WorkerGuard;

use crate::adapters::{
    ChatCompletionsClient, EgressGuard, JsonFeedbackLog, JsonFileDatabase, JsonLastDirStore,
    SystemClock, TomlConfigStore,
};
use crate::app::chat::ChatSession;
use crate::app::feedback::FeedbackDesk;
use crate::app::pipeline::{AnalysisOutcome, ValidationPipeline};
use crate::domain::{AppConfig, DomainError, FeedbackKind, FeedbackRecord, RequestCache};
use crate::infrastructure::init_logging;
use crate::ports::{AnalysisClient, ConfigStore, DatabaseSource, DirectoryMemory, HttpClient};

/// Command-line overrides applied on top of the stored configuration.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub database: Option<PathBuf>,
    pub offline: bool,
}

/// Application paths information.
#[derive(Debug, Clone, serde::Serialize)]
pub struct AppPaths {
    pub data_dir: String,
    pub logs_dir: String,
    pub config_path: String,
    pub database: String,
    pub last_dir: String,
}

/// What the remote side of the application can reach.
#[derive(Debug, Clone, serde::Serialize)]
pub struct RemoteStatus {
    pub network_blocked: bool,
    pub allowed_domains: Vec<String>,
    pub api_key_env: String,
    pub api_key_set: bool,
}

/// Application controller that wires configuration, logging and services together.
pub struct AppController {
    config: AppConfig,
    config_store: Arc<TomlConfigStore>,
    http: Arc<EgressGuard>,
    client: Arc<dyn AnalysisClient>,
    database: Arc<dyn DatabaseSource>,
    pipeline: ValidationPipeline,
    feedback: FeedbackDesk,
    directories: Arc<dyn DirectoryMemory>,
    api_key_set: bool,
    _log_guard: Option<WorkerGuard>,
}

impl AppController {
    /// Initialize the application controller.
    pub fn new(overrides: Overrides) -> Result<Self, DomainError> {
        // Step 1: Initialize config store
        let config_store = Arc::new(TomlConfigStore::new()?);

        // Step 2: Load configuration and apply overrides
        let mut config = config_store.load()?;
        if let Some(database) = overrides.database {
            config.paths.database = database;
        }
        config.network.offline |= overrides.offline;

        // Step 3: Initialize logging
        let log_guard = init_logging(&config_store.logs_dir(), &config.logging)?;

        info!("DeviceCheck starting up");

        // Step 4: Network egress and the remote model client
        let http = Arc::new(EgressGuard::new(&config.network)?);
        let remote = ChatCompletionsClient::from_config(http.clone(), &config.remote);
        let api_key_set = remote.has_api_key();
        let client: Arc<dyn AnalysisClient> = Arc::new(remote);

        // Step 5: Validation pipeline and its collaborators
        let database: Arc<dyn DatabaseSource> =
            Arc::new(JsonFileDatabase::new(config.paths.database.clone()));
        let cache = RequestCache::new(
            config.cache.max_entries,
            config.cache.ttl(),
            Arc::new(SystemClock),
        );
        let pipeline = ValidationPipeline::new(
            database.clone(),
            client.clone(),
            cache,
            config.cache.fingerprint,
            config.remote.validation_timeout(),
        );
        let feedback = FeedbackDesk::new(
            client.clone(),
            Arc::new(JsonFeedbackLog::new(config_store.feedback_log_path())),
            config.remote.feedback_timeout(),
        );
        let directories: Arc<dyn DirectoryMemory> =
            Arc::new(JsonLastDirStore::new(config_store.last_dir_path()));

        info!(
            offline = config.network.offline,
            database = ?config.paths.database,
            cache_entries = config.cache.max_entries,
            "AppController initialized"
        );

        Ok(Self {
            config,
            config_store,
            http,
            client,
            database,
            pipeline,
            feedback,
            directories,
            api_key_set,
            _log_guard: log_guard,
        })
    }

    /// Validate one input file.
    ///
    /// Relative paths missing from the working directory are looked up in the
    /// last directory an input was read from.
    pub async fn check(&self, input: &Path) -> Result<AnalysisOutcome, DomainError> {
        let path = resolve_input(input, self.directories.as_ref());
        if path.is_file() {
            if let Err(e) = self.directories.remember(&path) {
                warn!(error = %e, "Failed to remember input directory");
            }
        }
        self.pipeline.run_file(&path).await
    }

    /// Send feedback about the most recent report.
    pub async fn submit_feedback(
        &self,
        kind: FeedbackKind,
        text: &str,
    ) -> Result<FeedbackRecord, DomainError> {
        let original = self.pipeline.last_report().ok_or(DomainError::NoPriorResult)?;
        self.feedback.submit(kind, text, &original).await
    }

    /// Start a chat session over the configured database.
    pub fn open_chat(&self) -> ChatSession {
        ChatSession::open(
            self.database.as_ref(),
            self.client.clone(),
            self.config.remote.chat_timeout(),
        )
    }

    /// Saved feedback, oldest first.
    pub fn feedback_history(&self) -> Result<Vec<FeedbackRecord>, DomainError> {
        self.feedback.history()
    }

    /// Remote access summary for `devicecheck paths`.
    pub fn remote_status(&self) -> RemoteStatus {
        RemoteStatus {
            network_blocked: self.http.is_network_blocked(),
            allowed_domains: self.http.allowed_domains(),
            api_key_env: self.config.remote.api_key_env.clone(),
            api_key_set: self.api_key_set,
        }
    }

    pub fn paths(&self) -> AppPaths {
        AppPaths {
            data_dir: self.config_store.data_dir().to_string_lossy().to_string(),
            logs_dir: self.config_store.logs_dir().to_string_lossy().to_string(),
            config_path: self.config_store.config_path().to_string_lossy().to_string(),
            database: self.database.describe(),
            last_dir: self.directories.last_dir().to_string_lossy().to_string(),
        }
    }
}

/// Resolve an input path, falling back to the remembered directory.
fn resolve_input(input: &Path, directories: &dyn DirectoryMemory) -> PathBuf {
    if input.is_absolute() || input.exists() {
        return input.to_path_buf();
    }

    let candidate = directories.last_dir().join(input);
    if candidate.exists() {
        debug!(path = ?candidate, "Resolved input against last directory");
        candidate
    } else {
        input.to_path_buf()
    }
}
