use std::sync::LazyLock;

use derive_from_env::FromEnv;

use crate::destination::Destination;

/// Log file used when neither the environment nor the builder names one.
/// Set `SEVLOG_FILE_NAME` at compile time to change it.
pub const DEFAULT_LOG_FILE: &str = match option_env!("SEVLOG_FILE_NAME") {
    Some(path) => path,
    None => "sevlog.log",
};

pub const DEFAULT_SETTINGS_PATH: &str = "settings.conf";

/// Runtime overrides read from `SEVLOG_*` environment variables.
#[derive(FromEnv)]
#[from_env(prefix = "SEVLOG")]
#[allow(non_snake_case)]
pub struct SevlogConfig {
    /// Empty means [`DEFAULT_LOG_FILE`].
    #[from_env(default = "")]
    pub FILE_NAME: String,
    #[from_env(default = "settings.conf")]
    pub SETTINGS_PATH: String,
    #[from_env(default = "file")]
    pub DESTINATION: String,
}

impl SevlogConfig {
    pub fn log_file(&self) -> &str {
        if self.FILE_NAME.is_empty() {
            DEFAULT_LOG_FILE
        } else {
            &self.FILE_NAME
        }
    }

    /// Unknown names fall back to [`Destination::File`].
    pub fn destination(&self) -> Destination {
        self.DESTINATION.parse().unwrap_or_default()
    }
}

impl Default for SevlogConfig {
    fn default() -> Self {
        Self {
            FILE_NAME: String::new(),
            SETTINGS_PATH: DEFAULT_SETTINGS_PATH.into(),
            DESTINATION: Destination::File.to_string(),
        }
    }
}

pub static SEVLOG_CONFIG: LazyLock<SevlogConfig> =
    LazyLock::new(|| SevlogConfig::from_env().unwrap_or_default());

#[test]
fn test_config_defaults() {
    let config = SevlogConfig::default();
    assert_eq!(config.log_file(), DEFAULT_LOG_FILE);
    assert_eq!(config.SETTINGS_PATH, DEFAULT_SETTINGS_PATH);
    assert_eq!(config.destination(), Destination::File);

    let config = SevlogConfig {
        FILE_NAME: "/var/log/app.log".into(),
        DESTINATION: "console".into(),
        ..SevlogConfig::default()
    };
    assert_eq!(config.log_file(), "/var/log/app.log");
    assert_eq!(config.destination(), Destination::Console);

    let config = SevlogConfig {
        DESTINATION: "carrier pigeon".into(),
        ..SevlogConfig::default()
    };
    assert_eq!(config.destination(), Destination::File);
}
