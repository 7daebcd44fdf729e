use std::{
    collections::HashMap,
    fs,
    io::{self, ErrorKind},
    path::{Path, PathBuf},
    sync::LazyLock,
};

use colored::Colorize;
use regex::Regex;

use crate::severity::Severity;

/// Key holding the integer rank of the initial severity threshold.
pub const LOGGING_LEVEL_KEY: &str = "logging_level";

static ENTRY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*([A-Za-z_][A-Za-z0-9_.\-]*)\s*[=:]\s*(.*?)\s*$").unwrap()
});

#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("settings file {} not found", .0.display())]
    NotFound(PathBuf),

    #[error("unable to read settings file {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("malformed settings entry on line {line}: `{content}`")]
    Malformed { line: usize, content: String },

    #[error("settings key `{0}` is missing")]
    MissingKey(&'static str),

    #[error("settings key `{key}` is not an integer: `{value}`")]
    InvalidNumber { key: &'static str, value: String },

    #[error("{0} is not a valid logging level")]
    InvalidLevel(i64),
}

/// Key-value settings read from a `key = value` file.
///
/// Blank lines and lines starting with `#` or `;` are ignored. Values may be
/// wrapped in double quotes.
#[derive(Debug, Default, Clone)]
pub struct Settings {
    entries: HashMap<String, String>,
}

impl Settings {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| match source.kind() {
            ErrorKind::NotFound => SettingsError::NotFound(path.to_path_buf()),
            _ => SettingsError::Io {
                path: path.to_path_buf(),
                source,
            },
        })?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self, SettingsError> {
        let mut entries = HashMap::new();
        for (index, line) in content.lines().enumerate() {
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') || trimmed.starts_with(';') {
                continue;
            }
            let Some(captures) = ENTRY.captures(line) else {
                return Err(SettingsError::Malformed {
                    line: index + 1,
                    content: line.into(),
                });
            };
            let value = captures[2].trim_matches('"');
            entries.insert(captures[1].to_string(), value.to_string());
        }
        Ok(Self { entries })
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    pub fn read_int(&self, key: &'static str) -> Result<i64, SettingsError> {
        let value = self.get(key).ok_or(SettingsError::MissingKey(key))?;
        value.parse().map_err(|_| SettingsError::InvalidNumber {
            key,
            value: value.into(),
        })
    }

    pub fn logging_level(&self) -> Result<Severity, SettingsError> {
        let rank = self.read_int(LOGGING_LEVEL_KEY)?;
        Severity::try_from(rank).map_err(SettingsError::InvalidLevel)
    }
}

/// Reads `logging_level` from the settings file at `path`.
pub fn read_logging_level<P: AsRef<Path>>(path: P) -> Result<Severity, SettingsError> {
    Settings::load(path)?.logging_level()
}

/// Reads `logging_level`, falling back to [`Severity::Info`] when the file is
/// missing or unusable. A missing file is expected and stays silent; any
/// other failure is reported on stderr.
pub fn initial_level<P: AsRef<Path>>(path: P) -> Severity {
    match read_logging_level(path) {
        Ok(level) => level,
        Err(SettingsError::NotFound(_)) => Severity::default(),
        Err(err) => {
            eprintln!(
                "{} {err}, using {} level",
                "sevlog:".yellow(),
                Severity::default()
            );
            Severity::default()
        }
    }
}
