//! Tracing setup shared by the certchain binaries.
//!
//! Two sinks, each optional:
//!
//! * a compact console layer on **stderr**, so command results printed on stdout
//!   stay machine-readable;
//! * a rolling [`FileOutput`] fed by a non-blocking worker, as plain text or JSON lines.
//!
//! Both sinks share one [`EnvFilter`]: a default level, plus per-target
//! [`directives`](LoggerBuilder::directives) such as
//! `"certchain_issuer=debug,certchain_storage=warn"`. Without directives, `RUST_LOG`
//! is honoured.
//!
//! ```rust
//! use certchain_logger::{LevelFilter, Logger};
//!
//! let _logger = Logger::builder()
//!     .name("certchain")
//!     .level(LevelFilter::DEBUG)
//!     .init()
//!     .unwrap();
//! ```

mod error;

pub use crate::error::{LoggerError, LoggerErrorExt};
pub use tracing::level_filters::LevelFilter;
pub use tracing_appender::rolling::Rotation;

use private::Sealed;
use std::fs;
use std::path::PathBuf;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::RollingFileAppender;
use tracing_subscriber::fmt::layer;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

const LOG_FILE_SUFFIX: &str = "log";

/// Line format of a [`FileOutput`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FileFormat {
    #[default]
    Text,
    Json,
}

/// A rolling log directory. Files are named `<logger name>.<date>.log`.
#[derive(Debug, Clone)]
pub struct FileOutput {
    dir: PathBuf,
    rotation: Rotation,
    max_files: usize,
    format: FileFormat,
}

impl FileOutput {
    /// Daily rotation, ten files kept, plain text.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into(), rotation: Rotation::DAILY, max_files: 10, format: FileFormat::Text }
    }

    #[must_use]
    pub fn rotation(mut self, rotation: Rotation) -> Self {
        self.rotation = rotation;
        self
    }

    /// Number of rotated files kept on disk. Must be at least one.
    #[must_use]
    pub const fn max_files(mut self, max: usize) -> Self {
        self.max_files = max;
        self
    }

    #[must_use]
    pub const fn format(mut self, format: FileFormat) -> Self {
        self.format = format;
        self
    }
}

#[derive(Debug)]
pub struct Unnamed;
#[derive(Debug)]
pub struct Named(String);

mod private {
    pub trait Sealed {}
}
impl Sealed for Unnamed {}
impl Sealed for Named {}

/// Collects sink and filter settings; [`init`](LoggerBuilder::init) becomes
/// available once a name is set.
#[derive(Debug)]
pub struct LoggerBuilder<N: Sealed = Unnamed> {
    name: N,
    console: bool,
    level: LevelFilter,
    directives: Option<String>,
    file: Option<FileOutput>,
}

impl LoggerBuilder<Unnamed> {
    /// Names the logger. The name prefixes rolling log files.
    pub fn name(self, name: impl Into<String>) -> LoggerBuilder<Named> {
        LoggerBuilder {
            name: Named(name.into()),
            console: self.console,
            level: self.level,
            directives: self.directives,
            file: self.file,
        }
    }
}

impl<N: Sealed> LoggerBuilder<N> {
    /// Toggles the stderr console layer. On by default.
    #[must_use]
    pub const fn console(mut self, enabled: bool) -> Self {
        self.console = enabled;
        self
    }

    /// Level applied to every target without a more specific directive.
    #[must_use]
    pub const fn level(mut self, level: LevelFilter) -> Self {
        self.level = level;
        self
    }

    /// Per-target filter directives. Replaces `RUST_LOG` when set.
    ///
    /// Malformed directives make [`LoggerBuilder::init`] fail.
    #[must_use]
    pub fn directives(mut self, directives: impl Into<String>) -> Self {
        self.directives = Some(directives.into());
        self
    }

    /// Adds the rolling file sink.
    #[must_use]
    pub fn file(mut self, output: FileOutput) -> Self {
        self.file = Some(output);
        self
    }
}

impl LoggerBuilder<Named> {
    /// Installs the global subscriber.
    ///
    /// Keep the returned [`Logger`] alive until shutdown: dropping it flushes and
    /// stops the file worker.
    ///
    /// # Errors
    /// * [`LoggerError::InvalidConfiguration`] for a blank name, malformed directives,
    ///   `max_files == 0`, or when no sink is enabled.
    /// * [`LoggerError::Io`] / [`LoggerError::Appender`] if the log directory is unusable.
    /// * [`LoggerError::Subscriber`] if a global subscriber is already installed.
    pub fn init(self) -> Result<Logger, LoggerError> {
        let name = self.name.0.trim();
        if name.is_empty() {
            return Err(invalid("Logger name cannot be empty"));
        }
        if !self.console && self.file.is_none() {
            return Err(invalid("No sink enabled; turn on the console or a log directory"));
        }
        let filter = build_filter(self.level, self.directives.as_deref())?;

        let mut layers = Vec::new();
        if self.console {
            layers.push(layer().compact().with_writer(std::io::stderr).boxed());
        }

        let guard = match self.file {
            Some(output) => {
                if output.max_files == 0 {
                    return Err(invalid("max_files must be greater than zero"));
                }
                fs::create_dir_all(&output.dir)
                    .context(format!("Failed to create log directory: {}", output.dir.display()))?;

                let appender = RollingFileAppender::builder()
                    .rotation(output.rotation)
                    .filename_prefix(name)
                    .filename_suffix(LOG_FILE_SUFFIX)
                    .max_log_files(output.max_files)
                    .build(&output.dir)?;
                let (writer, guard) = tracing_appender::non_blocking(appender);

                let plain = layer().with_writer(writer).with_ansi(false);
                layers.push(match output.format {
                    FileFormat::Text => plain.boxed(),
                    FileFormat::Json => plain.json().boxed(),
                });
                Some(guard)
            },
            None => None,
        };

        tracing_subscriber::registry().with(filter).with(layers).try_init()?;
        Ok(Logger { guard })
    }
}

/// Handle to the installed subscriber. Owns the file worker, if any.
#[must_use = "Dropping this handle stops the file logging worker."]
#[derive(Debug)]
pub struct Logger {
    guard: Option<WorkerGuard>,
}

impl Logger {
    #[must_use]
    pub const fn builder() -> LoggerBuilder {
        LoggerBuilder {
            name: Unnamed,
            console: true,
            level: LevelFilter::INFO,
            directives: None,
            file: None,
        }
    }

    /// Whether a file sink is running behind this handle.
    #[must_use]
    pub const fn writes_files(&self) -> bool {
        self.guard.is_some()
    }
}

/// Parses a level name such as `"info"` or `"WARN"`. `"off"` disables logging.
///
/// # Errors
/// Returns [`LoggerError::InvalidConfiguration`] for unknown names.
pub fn parse_level(level: &str) -> Result<LevelFilter, LoggerError> {
    level.trim().parse().map_err(|_| LoggerError::InvalidConfiguration {
        message: format!("Unknown log level '{level}'").into(),
        context: Some("Expected one of: off, error, warn, info, debug, trace".into()),
    })
}

fn build_filter(level: LevelFilter, directives: Option<&str>) -> Result<EnvFilter, LoggerError> {
    let builder = EnvFilter::builder().with_default_directive(level.into());
    match directives {
        None => Ok(builder.from_env_lossy()),
        Some(directives) => builder.parse(directives).map_err(|e| {
            LoggerError::InvalidConfiguration {
                message: format!("Invalid filter directives '{directives}': {e}").into(),
                context: None,
            }
        }),
    }
}

fn invalid(message: &'static str) -> LoggerError {
    LoggerError::InvalidConfiguration { message: message.into(), context: None }
}
