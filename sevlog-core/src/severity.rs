use std::fmt;

/// Severity of a log message, ordered from least to most verbose.
///
/// The numeric rank is what the sink compares against its threshold: a message
/// is written when its rank is lower than or equal to the threshold's rank.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(i8)]
pub enum Severity {
    /// Passes every threshold, `Disabled` included.
    Always = i8::MIN,
    /// Threshold that turns regular logging off.
    Disabled = 0,
    /// Very severe error events that will presumably lead the application to abort.
    Fatal = 1,
    /// Error events that might still allow the application to continue running.
    Error = 2,
    /// Potentially harmful situations.
    Warning = 3,
    /// Coarse-grained progress of the application.
    #[default]
    Info = 4,
    /// Fine-grained events that are most useful to debug an application.
    Debug = 5,
    /// Finer-grained events than `Debug`.
    Trace = 6,
    /// Raw text, written without tag or context.
    Buffer = 7,
    /// Threshold that lets everything through.
    All = 8,
}

impl Severity {
    pub const fn rank(self) -> i8 {
        self as i8
    }

    /// Returns the severity with the given rank, if any.
    pub const fn from_rank(rank: i8) -> Option<Self> {
        Some(match rank {
            i8::MIN => Self::Always,
            0 => Self::Disabled,
            1 => Self::Fatal,
            2 => Self::Error,
            3 => Self::Warning,
            4 => Self::Info,
            5 => Self::Debug,
            6 => Self::Trace,
            7 => Self::Buffer,
            8 => Self::All,
            _ => return None,
        })
    }

    /// Whether a message of this severity passes the given threshold.
    pub const fn passes(self, threshold: Severity) -> bool {
        self.rank() <= threshold.rank()
    }

    /// Bracketed prefix written in front of the calling context.
    pub const fn tag(self) -> &'static str {
        match self {
            Self::Always => "[ALWAYS]: ",
            Self::Fatal => "[FATAL]: ",
            Self::Error => "[ERROR]: ",
            Self::Warning => "[WARNING]: ",
            Self::Info => "[INFO]: ",
            Self::Debug => "[DEBUG]: ",
            Self::Trace => "[TRACE]: ",
            Self::Disabled | Self::Buffer | Self::All => "",
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::Always => "ALWAYS",
            Self::Disabled => "DISABLED",
            Self::Fatal => "FATAL",
            Self::Error => "ERROR",
            Self::Warning => "WARNING",
            Self::Info => "INFO",
            Self::Debug => "DEBUG",
            Self::Trace => "TRACE",
            Self::Buffer => "BUFFER",
            Self::All => "ALL",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl TryFrom<i64> for Severity {
    type Error = i64;

    fn try_from(rank: i64) -> Result<Self, i64> {
        i8::try_from(rank)
            .ok()
            .and_then(Severity::from_rank)
            .ok_or(rank)
    }
}

impl From<log::Level> for Severity {
    fn from(level: log::Level) -> Self {
        match level {
            log::Level::Error => Self::Error,
            log::Level::Warn => Self::Warning,
            log::Level::Info => Self::Info,
            log::Level::Debug => Self::Debug,
            log::Level::Trace => Self::Trace,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [Severity; 10] = [
        Severity::Always,
        Severity::Disabled,
        Severity::Fatal,
        Severity::Error,
        Severity::Warning,
        Severity::Info,
        Severity::Debug,
        Severity::Trace,
        Severity::Buffer,
        Severity::All,
    ];

    #[test]
    fn test_ranks_are_strictly_increasing() {
        for pair in ALL.windows(2) {
            assert!(pair[0].rank() < pair[1].rank());
            assert!(pair[0] < pair[1]);
        }
        for severity in ALL {
            assert_eq!(Severity::from_rank(severity.rank()), Some(severity));
        }
        assert_eq!(Severity::from_rank(9), None);
        assert_eq!(Severity::from_rank(-1), None);
    }

    #[test]
    fn test_passes_threshold() {
        for level in ALL {
            for threshold in ALL {
                assert_eq!(level.passes(threshold), level.rank() <= threshold.rank());
            }
        }
        assert!(Severity::Always.passes(Severity::Disabled));
        assert!(!Severity::Fatal.passes(Severity::Disabled));
        assert!(Severity::Error.passes(Severity::Warning));
        assert!(!Severity::Info.passes(Severity::Warning));
    }

    #[test]
    fn test_tags() {
        assert_eq!(Severity::Fatal.tag(), "[FATAL]: ");
        assert_eq!(Severity::Error.tag(), "[ERROR]: ");
        assert_eq!(Severity::Warning.tag(), "[WARNING]: ");
        assert_eq!(Severity::Info.tag(), "[INFO]: ");
        assert_eq!(Severity::Debug.tag(), "[DEBUG]: ");
        assert_eq!(Severity::Trace.tag(), "[TRACE]: ");
        assert_eq!(Severity::Always.tag(), "[ALWAYS]: ");
        assert_eq!(Severity::Buffer.tag(), "");
        assert_eq!(Severity::All.tag(), "");
        assert_eq!(Severity::Disabled.tag(), "");
    }

    #[test]
    fn test_try_from_integer() {
        assert_eq!(Severity::try_from(4_i64), Ok(Severity::Info));
        assert_eq!(Severity::try_from(0_i64), Ok(Severity::Disabled));
        assert_eq!(Severity::try_from(-128_i64), Ok(Severity::Always));
        assert_eq!(Severity::try_from(42_i64), Err(42));
        assert_eq!(Severity::try_from(1_000_i64), Err(1_000));
    }

    #[test]
    fn test_log_level_conversions() {
        assert_eq!(Severity::from(log::Level::Warn), Severity::Warning);
        assert_eq!(Severity::from(log::Level::Trace), Severity::Trace);
        assert_eq!(Severity::from(log::Level::Error), Severity::Error);
    }
}
