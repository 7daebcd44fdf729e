use std::{
    fs::File,
    io::{self, BufWriter, Seek, SeekFrom, Write},
    path::{Path, PathBuf},
};

/// Output a sink writes whole lines to.
pub trait LogWriter: Send {
    /// Writes `line` followed by a single newline.
    fn write_line(&mut self, line: &str) -> io::Result<()>;
    fn flush(&mut self) -> io::Result<()>;
}

/// Append-only log file.
pub struct LogFile {
    file: BufWriter<File>,
    path: PathBuf,
}

impl LogFile {
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self, io::Error> {
        let mut file = File::options().create(true).append(true).open(&path)?;
        file.seek(SeekFrom::End(0))?;
        Ok(Self {
            file: BufWriter::new(file),
            path: path.as_ref().to_path_buf(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl LogWriter for LogFile {
    fn write_line(&mut self, line: &str) -> io::Result<()> {
        writeln!(self.file, "{line}")?;
        self.file.flush()
    }

    fn flush(&mut self) -> io::Result<()> {
        self.file.flush()
    }
}

impl Drop for LogFile {
    fn drop(&mut self) {
        self.file.flush().ok();
    }
}

#[test]
fn test_log_file_appends() {
    let path = "/tmp/sevlog_test_log_file.log";
    std::fs::remove_file(path).ok();
    {
        let mut log_file = LogFile::new(path).unwrap();
        log_file.write_line("Hello, world!").unwrap();
    }
    let mut log_file = LogFile::new(path).unwrap();
    assert_eq!(log_file.path(), Path::new(path));
    log_file.write_line("rust is awesome !").unwrap();
    assert_eq!(
        std::fs::read_to_string(path).unwrap(),
        "Hello, world!\nrust is awesome !\n"
    );
}

#[test]
fn test_log_file_missing_directory() {
    std::fs::remove_dir_all("/tmp/sevlog_test_missing_dir").ok();
    assert!(LogFile::new("/tmp/sevlog_test_missing_dir/nested/app.log").is_err());
}

/// Standard output.
#[derive(Default, Debug)]
pub struct LogStdout;

impl LogWriter for LogStdout {
    fn write_line(&mut self, line: &str) -> io::Result<()> {
        let mut stdout = io::stdout().lock();
        writeln!(stdout, "{line}")?;
        stdout.flush()
    }

    fn flush(&mut self) -> io::Result<()> {
        io::stdout().flush()
    }
}

#[test]
fn test_log_stdout() {
    let mut log_stdout = LogStdout;
    log_stdout.write_line("Hello, world!").unwrap();
    log_stdout.flush().unwrap();
}
