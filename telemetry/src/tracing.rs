use std::path::Path;
use std::sync::Once;

use thiserror::Error;
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_log::LogTracer;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

/// Filter used when `RUST_LOG` is not set.
const DEFAULT_FILTER: &str = "info";

static TEST_TRACING: Once = Once::new();

/// Errors raised while installing the global tracing subscriber.
#[derive(Debug, Error)]
pub enum TracingError {
    #[error("failed to install the log to tracing bridge: {0}")]
    LogTracer(#[from] tracing_log::log::SetLoggerError),

    #[error("failed to install the global tracing subscriber: {0}")]
    Subscriber(#[from] tracing_subscriber::util::TryInitError),
}

/// Output format of the log lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Human readable lines, for local runs.
    Pretty,
    /// One JSON object per line, for log collectors.
    Json,
}

/// Flushes buffered log lines when dropped.
///
/// Must be held for the lifetime of the process, dropping it early stops log output.
#[must_use]
pub struct LogFlusher {
    _guard: WorkerGuard,
}

/// Installs the global tracing subscriber for a service.
///
/// Logs go through a non-blocking writer to stdout or, when `log_dir` is set, to a daily
/// rolling file named after `app_name`. Records emitted through the `log` crate are bridged
/// into tracing.
pub fn init_tracing(
    app_name: &str,
    format: LogFormat,
    log_dir: Option<&Path>,
) -> Result<LogFlusher, TracingError> {
    LogTracer::init()?;

    let (writer, guard) = match log_dir {
        Some(dir) => tracing_appender::non_blocking(tracing_appender::rolling::daily(
            dir,
            format!("{app_name}.log"),
        )),
        None => tracing_appender::non_blocking(std::io::stdout()),
    };

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    let registry = tracing_subscriber::registry().with(filter);

    match format {
        LogFormat::Pretty => registry
            .with(fmt::layer().with_writer(writer))
            .try_init()?,
        LogFormat::Json => registry
            .with(fmt::layer().json().with_writer(writer))
            .try_init()?,
    }

    info!(app_name, ?format, "tracing initialized");

    Ok(LogFlusher { _guard: guard })
}

/// Installs a test subscriber writing through the test harness capture.
///
/// Safe to call from every test, only the first call installs the subscriber.
pub fn init_test_tracing() {
    TEST_TRACING.call_once(|| {
        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
        let _ = fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .try_init();
    });
}
