use log::{Log, Metadata, Record};

use crate::{format::CallContext, severity::Severity, sink::LogSink};

/// Lets a sink serve as the `log` crate's logger. The record target is used
/// as calling context.
impl Log for LogSink {
    fn enabled(&self, metadata: &Metadata) -> bool {
        LogSink::enabled(self, Severity::from(metadata.level()))
    }

    fn log(&self, record: &Record) {
        let level = Severity::from(record.level());
        if !LogSink::enabled(self, level) {
            return;
        }
        let context = CallContext::new(record.target(), "");
        LogSink::log(self, level, &context, &record.args().to_string());
    }

    fn flush(&self) {
        LogSink::flush(self);
    }
}
