//! Logging Module
//!
//! Structured logging with file output for diagnostics.

use std::path::Path;

use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

pub const LOG_FILE_NAME: &str = "ems-client.log";

fn default_filter() -> EnvFilter {
    #[cfg(debug_assertions)]
    {
        EnvFilter::new("debug,hyper=warn,reqwest=warn")
    }
    #[cfg(not(debug_assertions))]
    {
        EnvFilter::new("info,hyper=warn,reqwest=warn")
    }
}

/// Initialize logging into `log_dir`, plus stderr in debug builds.
///
/// Calling this twice keeps the first subscriber.
pub fn init(log_dir: &Path) {
    // Logging is best effort; the file layer simply writes nowhere if this fails
    let _ = std::fs::create_dir_all(log_dir);

    let file_appender = RollingFileAppender::new(Rotation::DAILY, log_dir, LOG_FILE_NAME);

    let file_layer = fmt::layer()
        .with_ansi(false)
        .with_target(true)
        .with_writer(file_appender);

    // Stdout carries command output, so the console layer goes to stderr
    #[cfg(debug_assertions)]
    let console_layer = Some(
        fmt::layer()
            .with_target(true)
            .with_writer(std::io::stderr),
    );

    #[cfg(not(debug_assertions))]
    let console_layer: Option<fmt::Layer<_, _, _, fn() -> std::io::Stderr>> = None;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter());

    let subscriber = tracing_subscriber::registry()
        .with(filter)
        .with(file_layer)
        .with(console_layer);

    let _ = tracing::subscriber::set_global_default(subscriber);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn init_creates_log_directory() {
        let dir = tempfile::tempdir().expect("tempdir");
        let log_dir = dir.path().join("logs");

        init(&log_dir);
        tracing::info!("logging initialised for test");

        assert!(log_dir.is_dir());
    }
}
