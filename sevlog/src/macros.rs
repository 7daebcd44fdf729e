//! Call-site macros.
//!
//! Every macro captures the calling function as context and accepts one or
//! more [`Display`](std::fmt::Display) values. A single string (`&str`,
//! `String`, anything `AsRef<str>`) becomes the message text as is; any other
//! value, and every value of a longer list, goes through
//! [`join_args`](crate::join_args), so `info!(5)` writes ` 5,`. Pass
//! `sink: <expr>,` first to log to an explicit sink instead of the global one.
//!
//! Arguments are only formatted when the level is enabled.

/// Message text of a single macro argument.
///
/// `(&Single(&value)).text()` resolves to [`PlainText`] when the value is a
/// string and falls back to [`FoldedText`] through one more autoref otherwise.
#[doc(hidden)]
pub mod __private {
    use std::fmt::Display;

    pub struct Single<'a, T: ?Sized>(pub &'a T);

    pub trait PlainText {
        fn text(&self) -> String;
    }

    impl<T: AsRef<str> + ?Sized> PlainText for Single<'_, T> {
        fn text(&self) -> String {
            self.0.as_ref().to_owned()
        }
    }

    pub trait FoldedText {
        fn text(&self) -> String;
    }

    impl<T: Display + ?Sized> FoldedText for &Single<'_, T> {
        fn text(&self) -> String {
            crate::join_args(&[&self.0])
        }
    }
}

/// Captures the enclosing function as a [`CallContext`](crate::CallContext).
#[macro_export]
macro_rules! call_context {
    () => {{
        fn __sevlog_marker() {}
        $crate::CallContext::from_type_path(::std::any::type_name_of_val(&__sevlog_marker))
    }};
}

#[doc(hidden)]
#[macro_export]
macro_rules! __text {
    ($text:expr) => {{
        #[allow(unused_imports)]
        use $crate::__private::{FoldedText as _, PlainText as _};
        (&$crate::__private::Single(&$text)).text()
    }};
    ($($arg:expr),+) => {
        $crate::join_args(&[$(&$arg as &dyn ::std::fmt::Display),+])
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __log {
    ($sink:expr, $level:expr, $($arg:expr),+) => {{
        let sink: &$crate::LogSink = &$sink;
        let level: $crate::Severity = $level;
        if sink.enabled(level) {
            sink.log(level, &$crate::call_context!(), &$crate::__text!($($arg),+));
        }
    }};
}

/// Logs at [`Severity::Fatal`](crate::Severity::Fatal).
#[macro_export]
macro_rules! fatal {
    (sink: $sink:expr, $($arg:expr),+ $(,)?) => {
        $crate::__log!($sink, $crate::Severity::Fatal, $($arg),+)
    };
    ($($arg:expr),+ $(,)?) => {
        $crate::__log!($crate::global(), $crate::Severity::Fatal, $($arg),+)
    };
}

/// Logs at [`Severity::Error`](crate::Severity::Error).
#[macro_export]
macro_rules! error {
    (sink: $sink:expr, $($arg:expr),+ $(,)?) => {
        $crate::__log!($sink, $crate::Severity::Error, $($arg),+)
    };
    ($($arg:expr),+ $(,)?) => {
        $crate::__log!($crate::global(), $crate::Severity::Error, $($arg),+)
    };
}

/// Logs at [`Severity::Warning`](crate::Severity::Warning).
#[macro_export]
macro_rules! warning {
    (sink: $sink:expr, $($arg:expr),+ $(,)?) => {
        $crate::__log!($sink, $crate::Severity::Warning, $($arg),+)
    };
    ($($arg:expr),+ $(,)?) => {
        $crate::__log!($crate::global(), $crate::Severity::Warning, $($arg),+)
    };
}

/// Logs at [`Severity::Info`](crate::Severity::Info).
#[macro_export]
macro_rules! info {
    (sink: $sink:expr, $($arg:expr),+ $(,)?) => {
        $crate::__log!($sink, $crate::Severity::Info, $($arg),+)
    };
    ($($arg:expr),+ $(,)?) => {
        $crate::__log!($crate::global(), $crate::Severity::Info, $($arg),+)
    };
}

/// Logs at [`Severity::Debug`](crate::Severity::Debug).
#[macro_export]
macro_rules! debug {
    (sink: $sink:expr, $($arg:expr),+ $(,)?) => {
        $crate::__log!($sink, $crate::Severity::Debug, $($arg),+)
    };
    ($($arg:expr),+ $(,)?) => {
        $crate::__log!($crate::global(), $crate::Severity::Debug, $($arg),+)
    };
}

/// Logs at [`Severity::Trace`](crate::Severity::Trace).
#[macro_export]
macro_rules! trace {
    (sink: $sink:expr, $($arg:expr),+ $(,)?) => {
        $crate::__log!($sink, $crate::Severity::Trace, $($arg),+)
    };
    ($($arg:expr),+ $(,)?) => {
        $crate::__log!($crate::global(), $crate::Severity::Trace, $($arg),+)
    };
}

/// Logs with the `[ALWAYS]: ` tag whatever the sink's level, even when
/// logging is disabled.
#[macro_export]
macro_rules! always {
    (sink: $sink:expr, $($arg:expr),+ $(,)?) => {{
        let sink: &$crate::LogSink = &$sink;
        sink.log_unconditional(
            $crate::Severity::Always.tag(),
            &$crate::call_context!(),
            &$crate::__text!($($arg),+),
        );
    }};
    ($($arg:expr),+ $(,)?) => {
        $crate::always!(sink: $crate::global(), $($arg),+)
    };
}

/// Logs raw text at [`Severity::Buffer`](crate::Severity::Buffer): no tag and
/// no context, only the timestamp.
#[macro_export]
macro_rules! buffer {
    (sink: $sink:expr, $($arg:expr),+ $(,)?) => {{
        let sink: &$crate::LogSink = &$sink;
        if sink.enabled($crate::Severity::Buffer) {
            sink.log_raw($crate::Severity::Buffer, &$crate::__text!($($arg),+));
        }
    }};
    ($($arg:expr),+ $(,)?) => {
        $crate::buffer!(sink: $crate::global(), $($arg),+)
    };
}
