use std::fs;
use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

use crate::domain::config::LoggingConfig;
use crate::domain::DomainError;

const LOG_TARGET: &str = "devicecheck_lib";
const LOG_FILE_PREFIX: &str = "devicecheck.log";

/// Install the global subscriber.
///
/// Human-readable events go to stderr so stdout carries only reports and chat
/// answers. With `file_logging` on, JSON lines are also written to a daily
/// file in `logs_dir`; keep the returned guard alive until exit so the
/// background writer flushes. `RUST_LOG` overrides the console filter.
pub fn init_logging(
    logs_dir: &Path,
    config: &LoggingConfig,
) -> Result<Option<WorkerGuard>, DomainError> {
    let console = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(console_directive(&config.level))),
        );

    let (file, guard) = if config.file_logging {
        fs::create_dir_all(logs_dir)?;
        let appender = RollingFileAppender::new(Rotation::DAILY, logs_dir, LOG_FILE_PREFIX);
        let (writer, guard) = tracing_appender::non_blocking(appender);

        let layer = tracing_subscriber::fmt::layer()
            .json()
            .with_writer(writer)
            .with_ansi(false)
            .with_span_events(FmtSpan::CLOSE)
            .with_filter(EnvFilter::new(format!("{}={}", LOG_TARGET, config.level)));
        (Some(layer), Some(guard))
    } else {
        (None, None)
    };

    // Tests may install a subscriber more than once; later attempts are no-ops.
    let installed = tracing_subscriber::registry()
        .with(console)
        .with(file)
        .try_init()
        .is_ok();

    if installed {
        tracing::debug!(
            level = %config.level,
            file_logging = config.file_logging,
            logs_dir = ?logs_dir,
            "Logging initialized"
        );
    }

    Ok(guard)
}

/// Our crate at `level`, dependencies at warn.
fn console_directive(level: &str) -> String {
    format!("{}={},warn", LOG_TARGET, level)
}
