use std::fs;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::domain::prompt;
use crate::domain::{
    DomainError, Fingerprint, FingerprintRule, InputDocument, RequestCache, RequiredField,
};
use crate::ports::{AnalysisClient, DatabaseSource};

/// Where a report came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportSource {
    Cache,
    Remote,
}

/// A successful validation run.
#[derive(Debug, Clone)]
pub struct AnalysisOutcome {
    pub report: String,
    pub source: ReportSource,
    pub fingerprint: Fingerprint,
    pub hardware: String,
}

/// Runs one input document through the local gates, the cache and the remote model.
///
/// Order: structure, database load, hardware lookup, relation check, cache,
/// remote call. Each gate aborts the run with its own error. Remote failures
/// are returned to the caller and never cached.
pub struct ValidationPipeline {
    database: Arc<dyn DatabaseSource>,
    client: Arc<dyn AnalysisClient>,
    cache: Mutex<RequestCache<String>>,
    fingerprint_rule: FingerprintRule,
    timeout: Duration,
    last_report: Mutex<Option<String>>,
}

impl ValidationPipeline {
    pub fn new(
        database: Arc<dyn DatabaseSource>,
        client: Arc<dyn AnalysisClient>,
        cache: RequestCache<String>,
        fingerprint_rule: FingerprintRule,
        timeout: Duration,
    ) -> Self {
        Self {
            database,
            client,
            cache: Mutex::new(cache),
            fingerprint_rule,
            timeout,
            last_report: Mutex::new(None),
        }
    }

    /// Validate the input document stored at `path`.
    pub async fn run_file(&self, path: &Path) -> Result<AnalysisOutcome, DomainError> {
        let content = fs::read_to_string(path)
            .map_err(|e| DomainError::InputLoad(format!("{}: {}", path.display(), e)))?;
        self.run(&content).await
    }

    /// Validate an input document given as JSON text.
    pub async fn run(&self, content: &str) -> Result<AnalysisOutcome, DomainError> {
        let input = InputDocument::parse(content)?;
        debug!(hardware = input.hardware(), "Input structure checked");

        let database = self.database.load()?;
        debug!(source = %self.database.describe(), "Database loaded");

        let hardware = input.hardware();
        // database keys are strings; any other JSON type names no hardware
        let excerpt = input
            .value(RequiredField::Hardware)
            .as_str()
            .and_then(|id| database.excerpt(id));
        let Some(excerpt) = excerpt else {
            warn!(hardware, "Hardware not found in database");
            return Err(DomainError::HardwareUnknown(hardware.to_string()));
        };

        if !database.relation_holds(
            hardware,
            input.value(RequiredField::Software),
            input.value(RequiredField::Region),
        ) {
            warn!(
                hardware,
                software = input.software(),
                region = input.region(),
                "Relation check failed, skipping remote analysis"
            );
            return Err(DomainError::RelationInvalid {
                hardware: hardware.to_string(),
                software: input.software().to_string(),
                region: input.region().to_string(),
            });
        }

        let fingerprint = Fingerprint::of(&input, self.fingerprint_rule);
        let cached = self.cache.lock().get(&fingerprint);

        let (report, source) = match cached {
            Some(report) => {
                info!(fingerprint = %fingerprint, "Cache hit");
                (report, ReportSource::Cache)
            }
            None => {
                debug!(fingerprint = %fingerprint, "Cache miss, calling remote model");
                let request =
                    prompt::validation_request(&excerpt, &input.to_pretty_json()?, self.timeout);

                let report = self.client.analyze(&request).await.map_err(|e| {
                    warn!(error = %e, "Remote analysis failed; result not cached");
                    e
                })?;

                self.cache.lock().put(fingerprint.clone(), report.clone());
                info!(fingerprint = %fingerprint, "Remote analysis stored in cache");
                (report, ReportSource::Remote)
            }
        };

        *self.last_report.lock() = Some(report.clone());

        Ok(AnalysisOutcome {
            report,
            source,
            fingerprint,
            hardware: hardware.to_string(),
        })
    }

    /// The most recent successful report, if any.
    pub fn last_report(&self) -> Option<String> {
        self.last_report.lock().clone()
    }

    /// Number of occupied cache slots.
    pub fn cached_entries(&self) -> usize {
        self.cache.lock().len()
    }
}
