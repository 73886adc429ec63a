use std::fs;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::data_dir;

/// Logs to stderr, `RUST_LOG` filtered, `warn` by default.
pub fn init_stderr() {
    let _ = tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init();
}

/// Logs to `tasklet.log` in the data directory so the TUI keeps the terminal.
///
/// The returned guard flushes pending lines when dropped; hold it until exit.
pub fn init_file() -> Option<WorkerGuard> {
    let dir = data_dir();
    if fs::create_dir_all(&dir).is_err() {
        return None;
    }
    let appender = tracing_appender::rolling::never(dir, "tasklet.log");
    let (writer, guard) = tracing_appender::non_blocking(appender);
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(tracing_subscriber::fmt::layer().with_ansi(false).with_writer(writer))
        .try_init()
        .ok()?;
    Some(guard)
}
