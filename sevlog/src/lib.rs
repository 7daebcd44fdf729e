//! # sevlog
//! Leveled, thread-safe logging to a file or the console.
//!
//! ## Usage
//! ```toml
//! // Cargo.toml
//! ...
//! [dependencies]
//! sevlog = "0.1.0"
//! ```
//!
//! Build a sink, keep it where your application can reach it and log through
//! the macros. Each line carries a timestamp, a level tag and the calling
//! function.
//!
//! ```rust
//! use sevlog::{Severity, logger_config};
//!
//! let sink = logger_config()
//!     .with_log_file("/tmp/sevlog_doc_usage.log")
//!     .expect("Unable to open log file")
//!     .with_level(Severity::Warning)
//!     .build();
//!
//! sevlog::info!(sink: sink, "not written, Info is above Warning");
//! sevlog::error!(sink: sink, "connection lost", "retries", 3);
//! sevlog::always!(sink: sink, "written whatever the level");
//!
//! let content = std::fs::read_to_string("/tmp/sevlog_doc_usage.log").unwrap();
//! assert!(content.contains("[ERROR]: "));
//! assert!(content.contains(" - connection lost, retries, 3,\n"));
//! ```
//!
//! ## Global sink
//! Macros without `sink:` log to the process-wide sink. It is created on first
//! use from the `SEVLOG_*` environment variables and the settings file they
//! point to, unless [`ConfigBuilder::init_global`] installed one before.
//!
//! ```rust,no_run
//! use sevlog::{Destination, logger_config};
//!
//! logger_config()
//!     .console()
//!     .init_global()
//!     .expect("global sink already initialized");
//!
//! sevlog::info!("Hello, world!");
//! sevlog::global().set_destination(Destination::None);
//! sevlog::warning!("dropped, no destination");
//! ```
//!
//! ## `log` facade
//! [`install_log_facade`] routes `log::info!` and friends through the global
//! sink, gated by the sink's own level.

mod macros;

#[doc(hidden)]
pub use macros::__private;

use std::{
    io,
    path::{Path, PathBuf},
    sync::OnceLock,
};

pub use sevlog_core::{
    CallContext, Destination, LogFile, LogSink, LogStdout, LogWriter, Severity, SettingsError,
    join_args,
};
use sevlog_core::{SEVLOG_CONFIG, initial_level};

static GLOBAL_SINK: OnceLock<LogSink> = OnceLock::new();

/// Returns the process-wide sink, creating it from the environment on first
/// call.
pub fn global() -> &'static LogSink {
    GLOBAL_SINK.get_or_init(LogSink::from_env)
}

#[derive(Debug, thiserror::Error)]
#[error("the global log sink is already initialized")]
pub struct AlreadyInitialized;

/// Routes records of the `log` crate to the global sink.
pub fn install_log_facade() -> Result<(), log::SetLoggerError> {
    log::set_logger(global())?;
    log::set_max_level(log::LevelFilter::Trace);
    Ok(())
}

/// Builder for configuring a sink.
#[derive(Default)]
pub struct ConfigBuilder {
    log_file: Option<LogFile>,
    level: Option<Severity>,
    destination: Option<Destination>,
    settings_path: Option<PathBuf>,
}

impl ConfigBuilder {
    /// Builds the sink.
    ///
    /// Without an explicit level, the level is read from the settings file.
    /// Without an explicit log file, the default one is opened, whatever the
    /// destination, so switching to [`Destination::File`] later still works.
    pub fn build(self) -> LogSink {
        let Self {
            log_file,
            level,
            destination,
            settings_path,
        } = self;
        let level = level.unwrap_or_else(|| match settings_path {
            Some(path) => initial_level(path),
            None => initial_level(&SEVLOG_CONFIG.SETTINGS_PATH),
        });
        let destination = destination.unwrap_or_else(|| SEVLOG_CONFIG.destination());
        match log_file {
            Some(log_file) => LogSink::with_writers(
                level,
                destination,
                Some(Box::new(log_file)),
                Box::new(LogStdout),
            ),
            None => LogSink::open(SEVLOG_CONFIG.log_file(), level, destination),
        }
    }

    /// Sets a log file, opened in append mode.
    pub fn with_log_file<P: AsRef<Path>>(self, path: P) -> Result<Self, io::Error> {
        Ok(Self {
            log_file: Some(LogFile::new(path)?),
            ..self
        })
    }
    /// Maybe sets a log file.
    pub fn maybe_with_log_file<P: AsRef<Path>>(self, path: Option<P>) -> Result<Self, io::Error> {
        Ok(Self {
            log_file: path.map(LogFile::new).transpose()?,
            ..self
        })
    }
    /// Sets the initial level, skipping the settings file.
    pub fn with_level(self, level: Severity) -> Self {
        Self {
            level: Some(level),
            ..self
        }
    }
    pub fn with_destination(self, destination: Destination) -> Self {
        Self {
            destination: Some(destination),
            ..self
        }
    }
    /// Log to stdout.
    pub fn console(self) -> Self {
        self.with_destination(Destination::Console)
    }
    /// Log nowhere until a destination is set.
    pub fn no_output(self) -> Self {
        self.with_destination(Destination::None)
    }
    /// Reads the initial level from this settings file.
    pub fn with_settings_file<P: AsRef<Path>>(self, path: P) -> Self {
        Self {
            settings_path: Some(path.as_ref().to_path_buf()),
            ..self
        }
    }
    /// Installs the built sink as the global one.
    pub fn init_global(self) -> Result<&'static LogSink, AlreadyInitialized> {
        if GLOBAL_SINK.get().is_some() {
            return Err(AlreadyInitialized);
        }
        GLOBAL_SINK.set(self.build()).map_err(|_| AlreadyInitialized)?;
        Ok(global())
    }
}

/// Returns a default ConfigBuilder for configuring a sink.
pub fn logger_config() -> ConfigBuilder {
    ConfigBuilder::default()
}
