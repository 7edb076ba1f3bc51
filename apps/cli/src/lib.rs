//! Command-line host for the certchain ledger.
//!
//! Each invocation loads the configuration, opens the ledger from its store, runs
//! one command, and prints the outcome as a single JSON line on stdout. Logs go
//! to stderr (and optionally to rolling files).

pub mod args;
pub mod commands;

use certchain::domain::config::LoggingConfig;
use certchain_logger::{FileFormat, FileOutput, Logger, LoggerError, parse_level};
use std::path::{Path, PathBuf};

/// Logger name; prefixes rolling log files.
pub const LOG_NAME: &str = "certchain";

/// Config file picked up from the working directory when `--config` is absent.
pub const DEFAULT_CONFIG: &str = "certchain.toml";

/// The explicit config path, or [`DEFAULT_CONFIG`] if it exists.
#[must_use]
pub fn config_path(explicit: Option<PathBuf>) -> Option<PathBuf> {
    explicit.or_else(|| {
        let fallback = Path::new(DEFAULT_CONFIG);
        fallback.is_file().then(|| fallback.to_path_buf())
    })
}

/// Installs the global subscriber described by `config`.
///
/// Returns `None` when both console and file output are disabled.
///
/// # Errors
/// Returns [`LoggerError`] for an unknown level, malformed filter directives, or if
/// the subscriber cannot be installed.
pub fn init_logger(config: &LoggingConfig) -> Result<Option<Logger>, LoggerError> {
    if !config.console && config.dir.is_none() {
        return Ok(None);
    }

    let mut builder = Logger::builder()
        .name(LOG_NAME)
        .console(config.console)
        .level(parse_level(&config.level)?);

    if let Some(filter) = &config.filter {
        builder = builder.directives(filter);
    }
    if let Some(dir) = &config.dir {
        let format = if config.json { FileFormat::Json } else { FileFormat::Text };
        builder = builder.file(FileOutput::new(dir).max_files(config.max_files).format(format));
    }

    builder.init().map(Some)
}
