//! Rolling Logger
//!
//! File logging for the pantry backend. Lines go to `<log_dir>/<app>.log`,
//! which is moved to `<app>.log.1` once it passes a size limit. The most
//! recent lines are also kept in memory for diagnostics.

use std::collections::VecDeque;
use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, OnceLock};

use thiserror::Error;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::EnvFilter;

pub const DEFAULT_MAX_BYTES: u64 = 5 * 1024 * 1024;
pub const DEFAULT_RECENT_LINES: usize = 200;

#[derive(Debug, Error)]
pub enum LoggerError {
    #[error("Logger already initialized")]
    AlreadyInitialized,
    #[error("Logger not initialized")]
    NotInitialized,
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

/// Append-only file that rotates once it grows past `max_bytes`
#[derive(Debug)]
pub struct RollingFile {
    path: PathBuf,
    max_bytes: u64,
    file: File,
    written: u64,
}

impl RollingFile {
    pub fn open(path: impl Into<PathBuf>, max_bytes: u64) -> io::Result<Self> {
        let path = path.into();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let file = OpenOptions::new().create(true).append(true).open(&path)?;
        let written = file.metadata()?.len();
        Ok(Self {
            path,
            max_bytes,
            file,
            written,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn rotated_path(&self) -> PathBuf {
        let mut name = self.path.as_os_str().to_owned();
        name.push(".1");
        PathBuf::from(name)
    }

    fn rotate(&mut self) -> io::Result<()> {
        self.file.flush()?;
        fs::rename(&self.path, self.rotated_path())?;
        self.file = OpenOptions::new()
            .create(true)
            .truncate(true)
            .write(true)
            .open(&self.path)?;
        self.written = 0;
        Ok(())
    }
}

impl Write for RollingFile {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if self.written > 0 && self.written + buf.len() as u64 > self.max_bytes {
            self.rotate()?;
        }
        let n = self.file.write(buf)?;
        self.written += n as u64;
        Ok(n)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.file.flush()
    }
}

/// Fixed-capacity buffer of the latest log lines
#[derive(Debug, Clone)]
pub struct RecentLines {
    lines: VecDeque<String>,
    capacity: usize,
}

impl RecentLines {
    pub fn new(capacity: usize) -> Self {
        Self {
            lines: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn push(&mut self, line: impl Into<String>) {
        if self.capacity == 0 {
            return;
        }
        if self.lines.len() == self.capacity {
            self.lines.pop_front();
        }
        self.lines.push_back(line.into());
    }

    /// Oldest first
    pub fn snapshot(&self) -> Vec<String> {
        self.lines.iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

#[derive(Debug)]
struct Sink {
    file: RollingFile,
    recent: RecentLines,
}

impl Sink {
    fn record(&mut self, buf: &[u8]) -> io::Result<usize> {
        let n = self.file.write(buf)?;
        let text = String::from_utf8_lossy(&buf[..n]);
        for line in text.lines().filter(|l| !l.trim().is_empty()) {
            self.recent.push(line.to_string());
        }
        Ok(n)
    }
}

type SharedSink = Arc<Mutex<Sink>>;

static SINK: OnceLock<SharedSink> = OnceLock::new();

/// `MakeWriter` handing out writers onto the shared sink
#[derive(Clone)]
struct SinkWriter {
    sink: SharedSink,
}

impl Write for SinkWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let mut sink = self
            .sink
            .lock()
            .map_err(|_| io::Error::new(io::ErrorKind::Other, "log sink poisoned"))?;
        sink.record(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        let mut sink = self
            .sink
            .lock()
            .map_err(|_| io::Error::new(io::ErrorKind::Other, "log sink poisoned"))?;
        sink.file.flush()
    }
}

impl<'a> MakeWriter<'a> for SinkWriter {
    type Writer = SinkWriter;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

/// Install the global subscriber writing to `<log_dir>/<app_name>.log`.
///
/// `RUST_LOG` overrides the default `info` level. `log` records from
/// dependencies are forwarded as well.
pub fn init_logger(log_dir: impl AsRef<Path>, app_name: &str) -> Result<(), LoggerError> {
    if SINK.get().is_some() {
        return Err(LoggerError::AlreadyInitialized);
    }

    let path = log_dir.as_ref().join(format!("{}.log", app_name));
    let sink = Arc::new(Mutex::new(Sink {
        file: RollingFile::open(path, DEFAULT_MAX_BYTES)?,
        recent: RecentLines::new(DEFAULT_RECENT_LINES),
    }));

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_writer(SinkWriter { sink: sink.clone() })
        .try_init()
        .map_err(|_| LoggerError::AlreadyInitialized)?;

    // Only a sink the subscriber actually writes to counts as initialized
    SINK.set(sink).map_err(|_| LoggerError::AlreadyInitialized)?;

    log::debug!(
        "rolling logger started at {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    Ok(())
}

pub fn info(message: &str) -> Result<(), LoggerError> {
    ensure_initialized()?;
    tracing::info!("{}", message);
    Ok(())
}

pub fn warn(message: &str) -> Result<(), LoggerError> {
    ensure_initialized()?;
    tracing::warn!("{}", message);
    Ok(())
}

pub fn error(message: &str) -> Result<(), LoggerError> {
    ensure_initialized()?;
    tracing::error!("{}", message);
    Ok(())
}

/// Latest lines written by the logger, oldest first
pub fn recent_lines() -> Vec<String> {
    SINK.get()
        .and_then(|sink| sink.lock().ok().map(|s| s.recent.snapshot()))
        .unwrap_or_default()
}

fn ensure_initialized() -> Result<(), LoggerError> {
    if SINK.get().is_some() {
        Ok(())
    } else {
        Err(LoggerError::NotInitialized)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rolling_file_rotates_past_limit() {
        let dir = tempfile::tempdir().unwrap();
        let mut file = RollingFile::open(dir.path().join("app.log"), 16).unwrap();

        file.write_all(b"0123456789\n").unwrap();
        file.write_all(b"abcdefghij\n").unwrap();
        file.flush().unwrap();

        let rotated = fs::read_to_string(file.rotated_path()).unwrap();
        let current = fs::read_to_string(file.path()).unwrap();
        assert_eq!(rotated, "0123456789\n");
        assert_eq!(current, "abcdefghij\n");
    }

    #[test]
    fn test_rolling_file_appends_to_existing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("logs").join("app.log");
        {
            let mut file = RollingFile::open(&path, 1024).unwrap();
            file.write_all(b"first\n").unwrap();
        }
        let mut file = RollingFile::open(&path, 1024).unwrap();
        file.write_all(b"second\n").unwrap();
        file.flush().unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "first\nsecond\n");
    }

    #[test]
    fn test_recent_lines_drops_oldest() {
        let mut recent = RecentLines::new(2);
        recent.push("a");
        recent.push("b");
        recent.push("c");
        assert_eq!(recent.snapshot(), vec!["b".to_string(), "c".to_string()]);

        let mut none = RecentLines::new(0);
        none.push("a");
        assert!(none.is_empty());
    }

    #[test]
    fn test_foreign_subscriber_leaves_logger_uninitialized() {
        let _ = tracing_subscriber::fmt().with_writer(io::sink).try_init();

        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            init_logger(dir.path(), "Pantry"),
            Err(LoggerError::AlreadyInitialized)
        ));
        assert!(matches!(info("dropped"), Err(LoggerError::NotInitialized)));
        assert!(recent_lines().is_empty());
    }

    #[test]
    fn test_sink_records_lines() {
        let dir = tempfile::tempdir().unwrap();
        let mut sink = Sink {
            file: RollingFile::open(dir.path().join("app.log"), 1024).unwrap(),
            recent: RecentLines::new(8),
        };
        sink.record(b"one\ntwo\n").unwrap();
        assert_eq!(sink.recent.snapshot(), vec!["one".to_string(), "two".to_string()]);
    }
}
