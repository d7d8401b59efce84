//! Logging setup.
//!
//! Installs the process-wide `tracing` subscriber once at startup, writing
//! either to an append-mode log file or to stderr so the report on stdout
//! stays clean. The filter comes from `RUST_LOG` when set, otherwise from
//! the `[logging]` section of the settings file.

use std::fs::OpenOptions;
use std::io;

use tracing_subscriber::{self, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

use crate::config::LoggingSettings;

pub fn initialize(settings: &LoggingSettings) -> io::Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(settings.level.clone()));

    match settings.file.as_deref() {
        Some(path) if !path.is_empty() => {
            let log_file = OpenOptions::new().create(true).append(true).open(path)?;
            let file_layer = tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_ansi(false)
                .with_writer(log_file)
                .with_filter(filter);
            tracing_subscriber::registry().with(file_layer).init();
        }
        _ => {
            let stderr_layer = tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(io::stderr)
                .with_filter(filter);
            tracing_subscriber::registry().with(stderr_layer).init();
        }
    }

    Ok(())
}
