use std::fmt::{self, Display, Write};

use chrono::Utc;

use crate::severity::Severity;

/// Timestamp layout written at the start of every line.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3f";

/// Separator between the timestamp and the rest of the line.
pub const TIMESTAMP_SEPARATOR: &str = "  ";

/// Where a log call originated: `class::function()` in the written line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallContext<'a> {
    class: &'a str,
    function: &'a str,
}

impl<'a> CallContext<'a> {
    pub const fn new(class: &'a str, function: &'a str) -> Self {
        Self { class, function }
    }

    /// Builds a context from the type path of an item declared inside the
    /// calling function, e.g. `app::net::Server::start::__f`.
    ///
    /// The marker item name and closure segments are dropped; the last
    /// remaining segment is the function and the one before it the class.
    pub fn from_type_path(path: &'a str) -> Self {
        let mut path = path.rsplit_once("::").map_or(path, |(head, _)| head);
        while let Some(head) = path.strip_suffix("::{{closure}}") {
            path = head;
        }
        match path.rsplit_once("::") {
            Some((head, function)) => Self {
                class: class_name(head),
                function,
            },
            None => Self {
                class: path,
                function: "",
            },
        }
    }

    pub fn class(&self) -> &'a str {
        self.class
    }

    pub fn function(&self) -> &'a str {
        self.function
    }
}

/// Last path segment of a type path; for `<Type as Trait>` the type's.
fn class_name(path: &str) -> &str {
    let path = match path.strip_prefix('<').and_then(|p| p.strip_suffix('>')) {
        Some(qualified) => qualified.split(" as ").next().unwrap_or(qualified),
        None => path,
    };
    path.rsplit_once("::").map_or(path, |(_, class)| class)
}

impl Display for CallContext<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.function.is_empty() {
            f.write_str(self.class)
        } else {
            write!(f, "{}::{}()", self.class, self.function)
        }
    }
}

/// Appends every value as `" " + value + ","`.
///
/// ```
/// use sevlog_core::join_args;
/// assert_eq!(join_args(&[&"retry", &3, &1.5]), " retry, 3, 1.5,");
/// ```
pub fn join_args(values: &[&dyn Display]) -> String {
    values.iter().fold(String::new(), |mut text, value| {
        // Writing into a String cannot fail.
        let _ = write!(text, " {value},");
        text
    })
}

/// `tag + context + " - " + text`
pub fn format_line(level: Severity, context: &CallContext<'_>, text: &str) -> String {
    format!("{}{context} - {text}", level.tag())
}

/// Same as [`format_line`] with a caller-supplied tag.
pub fn format_tagged(tag: &str, context: &CallContext<'_>, text: &str) -> String {
    format!("{tag}{context} - {text}")
}

pub(crate) fn timestamp() -> impl Display {
    Utc::now().format(TIMESTAMP_FORMAT)
}
