//! # sevlog-core
//! Core of sevlog: severity gating, line formatting and the locked file/console sink.

mod bridge;
mod config;
mod destination;
mod format;
mod log_writer;
mod settings;
mod severity;
mod sink;

pub use config::{DEFAULT_LOG_FILE, DEFAULT_SETTINGS_PATH, SEVLOG_CONFIG, SevlogConfig};
pub use destination::{Destination, UnknownDestination};
pub use format::{
    CallContext, TIMESTAMP_FORMAT, TIMESTAMP_SEPARATOR, format_line, format_tagged, join_args,
};
pub use log_writer::{LogFile, LogStdout, LogWriter};
pub use settings::{LOGGING_LEVEL_KEY, Settings, SettingsError, initial_level, read_logging_level};
pub use severity::Severity;
pub use sink::LogSink;
