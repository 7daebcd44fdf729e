use std::{fmt, str::FromStr};

/// Where the sink writes its lines.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Destination {
    None = 0,
    Console = 1,
    #[default]
    File = 2,
}

impl Destination {
    pub(crate) const fn from_u8(value: u8) -> Self {
        match value {
            1 => Self::Console,
            2 => Self::File,
            _ => Self::None,
        }
    }
}

impl fmt::Display for Destination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::None => "none",
            Self::Console => "console",
            Self::File => "file",
        })
    }
}

/// Error returned when parsing an unknown destination name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown log destination `{0}` (expected `file`, `console` or `none`)")]
pub struct UnknownDestination(pub String);

impl FromStr for Destination {
    type Err = UnknownDestination;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "file" => Ok(Self::File),
            "console" | "stdout" => Ok(Self::Console),
            "none" | "off" => Ok(Self::None),
            _ => Err(UnknownDestination(s.into())),
        }
    }
}

#[test]
fn test_destination_parse() {
    assert_eq!("file".parse(), Ok(Destination::File));
    assert_eq!(" Console ".parse(), Ok(Destination::Console));
    assert_eq!("stdout".parse(), Ok(Destination::Console));
    assert_eq!("none".parse(), Ok(Destination::None));
    assert_eq!(
        "syslog".parse::<Destination>(),
        Err(UnknownDestination("syslog".into()))
    );
    for destination in [Destination::None, Destination::Console, Destination::File] {
        assert_eq!(Destination::from_u8(destination as u8), destination);
        assert_eq!(destination.to_string().parse(), Ok(destination));
    }
}
