//! Tracing setup. The terminal belongs to the UI, so log output goes to a
//! file instead of stderr.

use std::fs::{self, File, OpenOptions};
use std::io;
use std::path::Path;
use std::sync::Mutex;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use super::config::LoggingConfig;

const FALLBACK_FILTER: &str = "info";

pub fn build_filter(level: &str) -> EnvFilter {
    EnvFilter::try_new(level).unwrap_or_else(|_| EnvFilter::new(FALLBACK_FILTER))
}

pub fn open_log_file(path: &Path) -> io::Result<File> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    OpenOptions::new().create(true).append(true).open(path)
}

/// Installs the global subscriber.
///
/// Returns `Ok(false)` without touching the log file's contents when a
/// subscriber is already installed; the file handle is dropped with the
/// rejected layer.
pub fn init_tracing(config: &LoggingConfig, log_file: &Path) -> io::Result<bool> {
    let file = open_log_file(log_file)?;

    let fmt_layer = fmt::layer()
        .with_writer(Mutex::new(file))
        .with_target(true)
        .with_level(true)
        .with_ansi(false)
        .compact();

    match tracing_subscriber::registry()
        .with(build_filter(&config.level))
        .with(fmt_layer)
        .try_init()
    {
        Ok(()) => {
            tracing::info!(target: "system", path = %log_file.display(), "logging initialized");
            Ok(true)
        }
        Err(_) => Ok(false),
    }
}
