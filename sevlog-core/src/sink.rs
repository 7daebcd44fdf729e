use std::{
    fmt::Display,
    path::Path,
    sync::{
        Mutex, PoisonError,
        atomic::{AtomicI8, AtomicU8, Ordering},
    },
};

use colored::Colorize;

use crate::{
    config::SEVLOG_CONFIG,
    destination::Destination,
    format::{CallContext, TIMESTAMP_SEPARATOR, format_line, format_tagged, join_args, timestamp},
    log_writer::{LogFile, LogStdout, LogWriter},
    settings::initial_level,
    severity::Severity,
};

/// A writer slot. Once its writer fails the slot is emptied and every later
/// line sent to it is dropped. An empty slot is reported on stderr once.
struct Output {
    name: &'static str,
    writer: Option<Box<dyn LogWriter>>,
    reported: bool,
}

impl Output {
    fn new(name: &'static str, writer: Option<Box<dyn LogWriter>>) -> Self {
        Self {
            name,
            writer,
            reported: false,
        }
    }

    fn write_line(&mut self, line: &str) {
        let Some(writer) = self.writer.as_mut() else {
            if !self.reported {
                eprintln!(
                    "{} no {} available; lines sent to it are dropped",
                    "sevlog:".red(),
                    self.name
                );
                self.reported = true;
            }
            return;
        };
        if let Err(err) = writer.write_line(line) {
            eprintln!(
                "{} unable to write to {}: {err}; further lines are dropped",
                "sevlog:".red(),
                self.name
            );
            self.writer = None;
            self.reported = true;
        }
    }

    fn flush(&mut self) {
        if let Some(writer) = self.writer.as_mut() {
            writer.flush().ok();
        }
    }
}

struct Outputs {
    file: Output,
    console: Output,
}

/// Leveled sink writing timestamped lines to a file or the console.
///
/// Level and destination can be changed at any time from any thread. Lines
/// are written one at a time under a single lock so concurrent callers never
/// interleave partial lines.
pub struct LogSink {
    level: AtomicI8,
    destination: AtomicU8,
    outputs: Mutex<Outputs>,
}

impl LogSink {
    /// Builds a sink over arbitrary writers. `file` is `None` when the file
    /// output is unavailable; lines sent to it are then dropped.
    pub fn with_writers(
        level: Severity,
        destination: Destination,
        file: Option<Box<dyn LogWriter>>,
        console: Box<dyn LogWriter>,
    ) -> Self {
        Self {
            level: AtomicI8::new(level.rank()),
            destination: AtomicU8::new(destination as u8),
            outputs: Mutex::new(Outputs {
                file: Output::new("log file", file),
                console: Output::new("stdout", Some(console)),
            }),
        }
    }

    /// Opens `path` in append mode. If the file cannot be opened the failure
    /// is reported once on stderr and the file output stays silent.
    pub fn open<P: AsRef<Path>>(path: P, level: Severity, destination: Destination) -> Self {
        match LogFile::new(&path) {
            Ok(file) => Self::with_writers(
                level,
                destination,
                Some(Box::new(file)),
                Box::new(LogStdout),
            ),
            Err(err) => {
                eprintln!(
                    "{} unable to open log file {}: {err}; file logging is disabled",
                    "sevlog:".red(),
                    path.as_ref().display()
                );
                let mut sink = Self::with_writers(level, destination, None, Box::new(LogStdout));
                sink.outputs
                    .get_mut()
                    .unwrap_or_else(PoisonError::into_inner)
                    .file
                    .reported = true;
                sink
            }
        }
    }

    /// Builds a sink from the `SEVLOG_*` environment and the settings file it
    /// names. Never fails: a missing or broken settings file yields
    /// [`Severity::Info`].
    pub fn from_env() -> Self {
        let config = &*SEVLOG_CONFIG;
        Self::open(
            config.log_file(),
            initial_level(&config.SETTINGS_PATH),
            config.destination(),
        )
    }

    pub fn level(&self) -> Severity {
        Severity::from_rank(self.level.load(Ordering::Relaxed)).unwrap_or_default()
    }

    pub fn set_level(&self, level: Severity) {
        self.level.store(level.rank(), Ordering::Relaxed);
    }

    pub fn destination(&self) -> Destination {
        Destination::from_u8(self.destination.load(Ordering::Relaxed))
    }

    pub fn set_destination(&self, destination: Destination) {
        self.destination.store(destination as u8, Ordering::Relaxed);
    }

    pub fn enable_all(&self) {
        self.set_level(Severity::All);
    }

    /// Only unconditional messages get through afterwards.
    pub fn disable(&self) {
        self.set_level(Severity::Disabled);
    }

    /// Whether a message at `level` would be written.
    pub fn enabled(&self, level: Severity) -> bool {
        level.passes(self.level())
    }

    /// Writes `tag(level) + context + " - " + text` if `level` is enabled.
    /// Disabled calls return before formatting or locking anything.
    pub fn log(&self, level: Severity, context: &CallContext<'_>, text: &str) {
        if !self.enabled(level) {
            return;
        }
        self.write_line(&format_line(level, context, text));
    }

    /// [`LogSink::log`] with the text built by [`join_args`].
    pub fn log_args(&self, level: Severity, context: &CallContext<'_>, args: &[&dyn Display]) {
        if !self.enabled(level) {
            return;
        }
        self.write_line(&format_line(level, context, &join_args(args)));
    }

    /// Writes `text` as is, without tag or context, if `level` is enabled.
    pub fn log_raw(&self, level: Severity, text: &str) {
        if !self.enabled(level) {
            return;
        }
        self.write_line(text);
    }

    /// Writes regardless of the current level.
    pub fn log_unconditional(&self, tag: &str, context: &CallContext<'_>, text: &str) {
        self.write_line(&format_tagged(tag, context, text));
    }

    pub fn flush(&self) {
        let mut outputs = self.outputs.lock().unwrap_or_else(PoisonError::into_inner);
        outputs.file.flush();
        outputs.console.flush();
    }

    fn write_line(&self, line: &str) {
        let mut outputs = self.outputs.lock().unwrap_or_else(PoisonError::into_inner);
        let output = match self.destination() {
            Destination::None => return,
            Destination::Console => &mut outputs.console,
            Destination::File => &mut outputs.file,
        };
        output.write_line(&format!("{}{TIMESTAMP_SEPARATOR}{line}", timestamp()));
    }
}

#[cfg(test)]
mod tests {
    use std::{
        fs, io,
        sync::{Arc, atomic::AtomicUsize, mpsc},
        thread,
        time::Duration,
    };

    use regex::Regex;

    use super::*;
    use crate::format::TIMESTAMP_FORMAT;

    /// Records every line and counts writer calls.
    #[derive(Clone, Default)]
    struct Capture {
        lines: Arc<Mutex<Vec<String>>>,
        calls: Arc<AtomicUsize>,
    }

    impl Capture {
        fn lines(&self) -> Vec<String> {
            self.lines.lock().unwrap().clone()
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl LogWriter for Capture {
        fn write_line(&mut self, line: &str) -> io::Result<()> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.lines.lock().unwrap().push(line.to_string());
            Ok(())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    struct Broken(Arc<AtomicUsize>);

    impl LogWriter for Broken {
        fn write_line(&mut self, _: &str) -> io::Result<()> {
            self.0.fetch_add(1, Ordering::SeqCst);
            Err(io::Error::other("disk full"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn capture_sink(level: Severity) -> (LogSink, Capture, Capture) {
        let file = Capture::default();
        let console = Capture::default();
        let sink = LogSink::with_writers(
            level,
            Destination::File,
            Some(Box::new(file.clone())),
            Box::new(console.clone()),
        );
        (sink, file, console)
    }

    fn strip_timestamp(line: &str) -> &str {
        let (stamp, rest) = line.split_once(TIMESTAMP_SEPARATOR).unwrap();
        assert!(chrono::NaiveDateTime::parse_from_str(stamp, TIMESTAMP_FORMAT).is_ok());
        rest
    }

    fn test_path(name: &str) -> String {
        let path = format!("/tmp/sevlog_test_{name}.log");
        fs::remove_file(&path).ok();
        path
    }

    const CONTEXT: CallContext<'static> = CallContext::new("Server", "start");

    #[test]
    fn test_level_gate() {
        let levels = [
            Severity::Fatal,
            Severity::Error,
            Severity::Warning,
            Severity::Info,
            Severity::Debug,
            Severity::Trace,
        ];
        let thresholds = [
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
        for threshold in thresholds {
            for level in levels {
                let (sink, file, _) = capture_sink(threshold);
                sink.log(level, &CONTEXT, "message");
                let expected = usize::from(level.rank() <= threshold.rank());
                assert_eq!(file.calls(), expected, "{level} at threshold {threshold}");
            }
        }
    }

    #[test]
    fn test_suppressed_call_never_locks() {
        let (sink, file, _) = capture_sink(Severity::Warning);
        let sink = Arc::new(sink);
        let guard = sink.outputs.lock().unwrap();
        let (done_tx, done_rx) = mpsc::channel();
        let worker = {
            let sink = Arc::clone(&sink);
            thread::spawn(move || {
                sink.log(Severity::Info, &CONTEXT, "x");
                sink.log_args(Severity::Debug, &CONTEXT, &[&1, &"two"]);
                sink.log_raw(Severity::Buffer, "raw");
                done_tx.send(()).unwrap();
            })
        };
        assert!(done_rx.recv_timeout(Duration::from_secs(5)).is_ok());
        drop(guard);
        worker.join().unwrap();
        assert_eq!(file.calls(), 0);
    }

    #[test]
    fn test_warning_threshold_scenario() {
        let path = test_path("warning_threshold");
        let sink = LogSink::open(&path, Severity::Warning, Destination::File);
        sink.log(Severity::Info, &CONTEXT, "x");
        assert_eq!(fs::read_to_string(&path).unwrap(), "");
        sink.log(Severity::Error, &CONTEXT, "y");
        let content = fs::read_to_string(&path).unwrap();
        let lines: Vec<_> = content.lines().collect();
        assert_eq!(lines.len(), 1);
        assert_eq!(
            strip_timestamp(lines[0]),
            "[ERROR]: Server::start() - y"
        );
    }

    #[test]
    fn test_log_args() {
        let (sink, file, _) = capture_sink(Severity::Info);
        sink.log_args(Severity::Info, &CONTEXT, &[&"listening on", &8080]);
        assert_eq!(
            strip_timestamp(&file.lines()[0]),
            "[INFO]: Server::start() - listening on, 8080,"
        );
    }

    #[test]
    fn test_raw_has_no_tag() {
        let (sink, file, _) = capture_sink(Severity::Buffer);
        sink.log_raw(Severity::Buffer, "rawbytes");
        assert_eq!(strip_timestamp(&file.lines()[0]), "rawbytes");

        sink.set_level(Severity::Trace);
        sink.log_raw(Severity::Buffer, "hidden");
        assert_eq!(file.calls(), 1);
    }

    #[test]
    fn test_unconditional_ignores_threshold() {
        let (sink, file, _) = capture_sink(Severity::Info);
        sink.disable();
        assert_eq!(sink.level(), Severity::Disabled);
        sink.log(Severity::Fatal, &CONTEXT, "dropped");
        sink.log_unconditional(Severity::Always.tag(), &CONTEXT, "starting");
        sink.log_unconditional("[BOOT]: ", &CONTEXT, "ready");
        let lines = file.lines();
        assert_eq!(lines.len(), 2);
        assert_eq!(strip_timestamp(&lines[0]), "[ALWAYS]: Server::start() - starting");
        assert_eq!(strip_timestamp(&lines[1]), "[BOOT]: Server::start() - ready");

        sink.enable_all();
        assert_eq!(sink.level(), Severity::All);
        sink.log(Severity::Trace, &CONTEXT, "now visible");
        assert_eq!(file.calls(), 3);
    }

    #[test]
    fn test_destination_switch() {
        let (sink, file, console) = capture_sink(Severity::Info);
        sink.log(Severity::Info, &CONTEXT, "to file");
        sink.set_destination(Destination::Console);
        assert_eq!(sink.destination(), Destination::Console);
        sink.log(Severity::Info, &CONTEXT, "to console");
        sink.set_destination(Destination::None);
        sink.log(Severity::Info, &CONTEXT, "nowhere");
        assert_eq!(file.calls(), 1);
        assert_eq!(console.calls(), 1);
        assert_eq!(
            strip_timestamp(&console.lines()[0]),
            "[INFO]: Server::start() - to console"
        );
    }

    #[test]
    fn test_unopenable_file_is_reported() {
        fs::remove_dir_all("/tmp/sevlog_test_no_such_dir").ok();
        let sink = LogSink::open(
            "/tmp/sevlog_test_no_such_dir/app.log",
            Severity::All,
            Destination::File,
        );
        assert!(sink.outputs.lock().unwrap().file.reported);
        sink.log(Severity::Error, &CONTEXT, "lost");
        sink.log_raw(Severity::Buffer, "lost too");
        sink.flush();
    }

    #[test]
    fn test_missing_file_output_reported_once() {
        let console = Capture::default();
        let sink = LogSink::with_writers(
            Severity::All,
            Destination::Console,
            None,
            Box::new(console.clone()),
        );
        sink.log(Severity::Info, &CONTEXT, "on console");
        assert!(!sink.outputs.lock().unwrap().file.reported);

        sink.set_destination(Destination::File);
        sink.log(Severity::Error, &CONTEXT, "dropped");
        assert!(sink.outputs.lock().unwrap().file.reported);
        sink.log(Severity::Error, &CONTEXT, "dropped again");
        assert_eq!(console.calls(), 1);
    }

    #[test]
    fn test_failing_writer_reports_once() {
        let calls = Arc::new(AtomicUsize::new(0));
        let sink = LogSink::with_writers(
            Severity::Info,
            Destination::File,
            Some(Box::new(Broken(Arc::clone(&calls)))),
            Box::new(Capture::default()),
        );
        for _ in 0..3 {
            sink.log(Severity::Error, &CONTEXT, "boom");
        }
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_concurrent_writers_keep_lines_whole() {
        const THREADS: usize = 8;
        const MESSAGES: usize = 200;
        let path = test_path("concurrent");
        let sink = Arc::new(LogSink::open(&path, Severity::Info, Destination::File));
        let handles: Vec<_> = (0..THREADS)
            .map(|t| {
                let sink = Arc::clone(&sink);
                thread::spawn(move || {
                    let class = format!("worker{t}");
                    for m in 0..MESSAGES {
                        let context = CallContext::new(&class, "run");
                        sink.log_args(Severity::Info, &context, &[&"message", &m]);
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
        drop(sink);

        let line_re = Regex::new(
            r"^\d{4}-\d{2}-\d{2}T\d{2}:\d{2}:\d{2}\.\d{3}  \[INFO\]: worker\d+::run\(\) - message, \d+,$",
        )
        .unwrap();
        let content = fs::read_to_string(&path).unwrap();
        assert!(content.ends_with('\n'));
        assert!(!content.contains("\n\n"));
        let lines: Vec<_> = content.lines().collect();
        assert_eq!(lines.len(), THREADS * MESSAGES);
        for line in lines {
            assert!(line_re.is_match(line), "torn line: {line}");
        }
    }

    #[test]
    fn test_message_survives_reopen() {
        let path = test_path("reopen");
        {
            let sink = LogSink::open(&path, Severity::Info, Destination::File);
            sink.log(Severity::Warning, &CONTEXT, "disk almost full");
        }
        let content = fs::read_to_string(&path).unwrap();
        let line = content.lines().next().unwrap();
        assert_eq!(
            strip_timestamp(line),
            "[WARNING]: Server::start() - disk almost full"
        );

        let sink = LogSink::open(&path, Severity::Info, Destination::File);
        sink.log(Severity::Info, &CONTEXT, "appended");
        assert_eq!(fs::read_to_string(&path).unwrap().lines().count(), 2);
    }

    #[test]
    fn test_sink_from_env() {
        let settings = "/tmp/sevlog_test_env_settings.conf";
        let path = test_path("env");
        fs::write(settings, "logging_level = 2\n").unwrap();
        // SAFETY: no other test in this crate reads the environment, and the
        // variables are set before `SEVLOG_CONFIG` is first read.
        unsafe {
            std::env::set_var("SEVLOG_FILE_NAME", &path);
            std::env::set_var("SEVLOG_SETTINGS_PATH", settings);
            std::env::set_var("SEVLOG_DESTINATION", "file");
        }
        let sink = LogSink::from_env();
        assert_eq!(sink.level(), Severity::Error);
        assert_eq!(sink.destination(), Destination::File);

        sink.log(Severity::Warning, &CONTEXT, "filtered by the settings level");
        sink.log(Severity::Error, &CONTEXT, "configured from the environment");
        let content = fs::read_to_string(&path).unwrap();
        let lines: Vec<_> = content.lines().collect();
        assert_eq!(lines.len(), 1);
        assert_eq!(
            strip_timestamp(lines[0]),
            "[ERROR]: Server::start() - configured from the environment"
        );

        fs::write(settings, "logging_level = loud\n").unwrap();
        assert_eq!(LogSink::from_env().level(), Severity::Info);
        fs::remove_file(settings).unwrap();
        assert_eq!(LogSink::from_env().level(), Severity::Info);
    }
}
