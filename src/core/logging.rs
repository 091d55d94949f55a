//! Tracing setup: human-readable stdout plus a daily rolling `logs/server.log`.

use std::sync::OnceLock;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use crate::core::config::AppPaths;

const LOG_FILE: &str = "server.log";

// sqlx logs every statement at info.
const DEFAULT_FILTER: &str = "info,sqlx=warn";

static LOG_GUARD: OnceLock<WorkerGuard> = OnceLock::new();

/// Installs the global subscriber. Safe to call more than once; later calls are no-ops.
pub fn init(paths: &AppPaths) {
    if let Err(e) = std::fs::create_dir_all(&paths.log_dir) {
        eprintln!(
            "Cannot create log directory {}: {}",
            paths.log_dir.display(),
            e
        );
    }

    let file_appender = tracing_appender::rolling::daily(&paths.log_dir, LOG_FILE);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
    let _ = LOG_GUARD.set(guard);

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let stdout_layer = tracing_subscriber::fmt::layer().with_target(false);
    let file_layer = tracing_subscriber::fmt::layer()
        .with_ansi(false)
        .with_writer(non_blocking);

    if tracing_subscriber::registry()
        .with(env_filter)
        .with(stdout_layer)
        .with(file_layer)
        .try_init()
        .is_ok()
    {
        tracing::info!("Logging to {}", paths.log_dir.join(LOG_FILE).display());
    }
}
