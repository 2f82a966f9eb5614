//! Logging Infrastructure
//!
//! Structured logging for development (pretty, stdout) and production (JSON,
//! optionally to a daily rolling file).

use std::path::Path;

use tracing_subscriber::EnvFilter;

/// Initialize the logger with defaults (info, text, stdout)
pub fn init_logger() {
    init_logger_with_file(None, false, None);
}

/// Initialize the logger with optional file output
///
/// `RUST_LOG`, when set, takes precedence over `log_level`. Calling this more
/// than once is harmless: later calls are ignored.
pub fn init_logger_with_file(log_level: Option<&str>, json: bool, log_dir: Option<&str>) {
    let level = log_level.unwrap_or("info");
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_file(false)
        .with_line_number(false)
        .with_thread_ids(false)
        .with_target(false);

    // File output only if the directory exists or can be created
    let appender = log_dir.and_then(|dir| {
        let path = Path::new(dir);
        if !path.exists() && std::fs::create_dir_all(path).is_err() {
            eprintln!("Cannot create log directory {dir}, logging to stdout");
            return None;
        }
        Some(tracing_appender::rolling::daily(path, "gym-server"))
    });

    let result = match (appender, json) {
        (Some(appender), true) => builder.json().with_writer(appender).try_init(),
        (Some(appender), false) => builder.with_ansi(false).with_writer(appender).try_init(),
        (None, true) => builder.json().try_init(),
        (None, false) => builder.try_init(),
    };

    if result.is_err() {
        tracing::debug!("Logger already initialized");
    }
}
