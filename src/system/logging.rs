//! Logging system initialization
//!
//! Log records are emitted with `tracing`. Every part of the framework logs
//! under its own target (see [`targets`]) so that the output of a single
//! context can be filtered with the level directive, for example
//! `warn,mxxn::registration=debug`.

use std::path::Path;

use tracing_appender::rolling;

use crate::errors::{MxxnError, Result};
use crate::settings::LoggingSettings;

/// Log targets of the framework contexts.
pub mod targets {
    pub const SETTINGS: &str = "mxxn::settings";
    pub const FILESYSTEM: &str = "mxxn::filesystem";
    pub const DATABASE: &str = "mxxn::database";
    pub const REGISTRATION: &str = "mxxn::registration";
    pub const REQUEST: &str = "mxxn::request";
    pub const TEMPLATE: &str = "mxxn::template";
}

/// Initialize the global subscriber from the logging settings.
///
/// The returned guard must be kept alive for the lifetime of the program,
/// otherwise buffered records of the non-blocking writer are lost.
pub fn init_logging(
    settings: &LoggingSettings,
) -> Result<tracing_appender::non_blocking::WorkerGuard> {
    let log_file = settings.file.as_deref().filter(|f| !f.is_empty());

    let writer: Box<dyn std::io::Write + Send + Sync> = match log_file {
        Some(log_file) if settings.enable_rotation => {
            let path = Path::new(log_file);
            let dir = path.parent().unwrap_or(Path::new("."));
            let prefix = path
                .file_name()
                .and_then(|name| name.to_str())
                .unwrap_or("mxxn.log")
                .trim_end_matches(".log");
            let appender = rolling::Builder::new()
                .rotation(rolling::Rotation::DAILY)
                .filename_prefix(prefix)
                .filename_suffix("log")
                .max_log_files(settings.max_backups.max(1) as usize)
                .build(dir)
                .map_err(|e| {
                    MxxnError::file_operation(format!(
                        "Failed to create rolling log appender: {}",
                        e
                    ))
                })?;
            Box::new(appender)
        }
        Some(log_file) => {
            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(log_file)?;
            Box::new(file)
        }
        None => Box::new(std::io::stdout()),
    };

    let (non_blocking_writer, guard) = tracing_appender::non_blocking(writer);
    let filter = tracing_subscriber::EnvFilter::try_new(&settings.level).map_err(|e| {
        MxxnError::settings_format(format!(
            "The level \"{}\" in the \"logging\" section is invalid: {}",
            settings.level, e
        ))
    })?;

    let subscriber_builder = tracing_subscriber::fmt()
        .with_writer(non_blocking_writer)
        .with_env_filter(filter)
        .with_target(true)
        .with_level(true)
        .with_ansi(log_file.is_none());

    let installed = if settings.format == "json" {
        subscriber_builder.json().try_init()
    } else {
        subscriber_builder.try_init()
    };

    installed.map_err(|e| {
        MxxnError::file_operation(format!("Failed to install the log subscriber: {}", e))
    })?;

    Ok(guard)
}
