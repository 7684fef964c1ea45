//! Rolling File Logger
//!
//! Installs a `tracing` subscriber that writes every event to stderr and to a
//! size-rotated log file in the app's log directory. `log` records are bridged
//! into the same subscriber. The most recent lines are also kept in a bounded
//! in-memory buffer so the UI can display them without touching the files.

use std::collections::VecDeque;
use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, OnceLock};

use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::time::FormatTime;
use tracing_subscriber::fmt::{self as tracing_fmt, MakeWriter};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

static HANDLE: OnceLock<LoggerHandle> = OnceLock::new();

/// Errors raised while setting up or using the logger
#[derive(Debug, thiserror::Error)]
pub enum LoggerError {
    #[error("failed to prepare log file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("logger already initialized")]
    AlreadyInitialized,
    #[error("logger not initialized")]
    NotInitialized,
    #[error("failed to install subscriber: {0}")]
    Subscriber(String),
}

/// Rotation and buffering limits
#[derive(Debug, Clone)]
pub struct LoggerConfig {
    /// Size at which the active file is rotated
    pub max_file_size: u64,
    /// Active file plus archives kept on disk
    pub max_files: usize,
    /// Lines kept in the in-memory ring buffer
    pub buffer_lines: usize,
    /// Filter used when `RUST_LOG` is not set
    pub default_filter: String,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            max_file_size: 5 * 1024 * 1024,
            max_files: 5,
            buffer_lines: 500,
            default_filter: "info".to_string(),
        }
    }
}

/// Handle to the installed logger
#[derive(Clone)]
pub struct LoggerHandle {
    inner: Arc<Mutex<RollingFile>>,
    app_name: String,
}

impl LoggerHandle {
    /// Most recent log lines, oldest first
    pub fn recent_lines(&self) -> Vec<String> {
        match self.inner.lock() {
            Ok(file) => file.recent.iter().cloned().collect(),
            Err(_) => Vec::new(),
        }
    }

    /// Path of the file currently being written
    pub fn log_path(&self) -> PathBuf {
        match self.inner.lock() {
            Ok(file) => file.active_path(),
            Err(_) => PathBuf::new(),
        }
    }

    pub fn app_name(&self) -> &str {
        &self.app_name
    }
}

/// Initialize the global logger with default limits
pub fn init_logger(dir: impl AsRef<Path>, app_name: &str) -> Result<LoggerHandle, LoggerError> {
    init_logger_with(dir, app_name, LoggerConfig::default())
}

/// Initialize the global logger
pub fn init_logger_with(
    dir: impl AsRef<Path>,
    app_name: &str,
    config: LoggerConfig,
) -> Result<LoggerHandle, LoggerError> {
    if HANDLE.get().is_some() {
        return Err(LoggerError::AlreadyInitialized);
    }

    let dir = dir.as_ref();
    fs::create_dir_all(dir).map_err(|source| LoggerError::Io {
        path: dir.to_path_buf(),
        source,
    })?;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.default_filter.as_str()));
    let file = RollingFile::open(dir, app_name, config)?;
    let inner = Arc::new(Mutex::new(file));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_fmt::layer().with_timer(LocalTime).with_writer(io::stderr))
        .with(
            tracing_fmt::layer()
                .with_timer(LocalTime)
                .with_ansi(false)
                .with_writer(RollingWriter {
                    inner: inner.clone(),
                }),
        )
        .try_init()
        .map_err(|e| LoggerError::Subscriber(e.to_string()))?;

    let handle = LoggerHandle {
        inner,
        app_name: app_name.to_string(),
    };
    let _ = HANDLE.set(handle.clone());

    tracing::info!("[LOGGER] writing to {}", handle.log_path().display());
    Ok(handle)
}

/// Handle of the global logger, if installed
pub fn handle() -> Option<&'static LoggerHandle> {
    HANDLE.get()
}

/// Most recent lines of the global logger (empty before init)
pub fn recent_lines() -> Vec<String> {
    HANDLE.get().map(LoggerHandle::recent_lines).unwrap_or_default()
}

pub fn info(message: &str) -> Result<(), LoggerError> {
    emit(log::Level::Info, message)
}

pub fn warn(message: &str) -> Result<(), LoggerError> {
    emit(log::Level::Warn, message)
}

pub fn error(message: &str) -> Result<(), LoggerError> {
    emit(log::Level::Error, message)
}

fn emit(level: log::Level, message: &str) -> Result<(), LoggerError> {
    let handle = HANDLE.get().ok_or(LoggerError::NotInitialized)?;
    log::log!(target: handle.app_name.as_str(), level, "{}", message);
    Ok(())
}

struct LocalTime;

impl FormatTime for LocalTime {
    fn format_time(&self, w: &mut Writer<'_>) -> std::fmt::Result {
        write!(w, "{}", chrono::Local::now().format("%Y-%m-%d %H:%M:%S%.3f"))
    }
}

/// Size-rotated log file plus the ring buffer of recent lines
struct RollingFile {
    dir: PathBuf,
    app_name: String,
    config: LoggerConfig,
    file: Option<File>,
    written: u64,
    recent: VecDeque<String>,
}

impl RollingFile {
    fn open(dir: &Path, app_name: &str, config: LoggerConfig) -> Result<Self, LoggerError> {
        let mut rolling = Self {
            dir: dir.to_path_buf(),
            app_name: app_name.to_string(),
            recent: VecDeque::with_capacity(config.buffer_lines),
            config,
            file: None,
            written: 0,
        };
        let path = rolling.active_path();
        rolling
            .open_active()
            .map_err(|source| LoggerError::Io { path, source })?;
        Ok(rolling)
    }

    fn active_path(&self) -> PathBuf {
        self.dir.join(format!("{}.log", self.app_name))
    }

    fn archive_path(&self, index: usize) -> PathBuf {
        self.dir.join(format!("{}.{}.log", self.app_name, index))
    }

    fn open_active(&mut self) -> io::Result<()> {
        let path = self.active_path();
        let file = OpenOptions::new().create(true).append(true).open(&path)?;
        self.written = file.metadata().map(|m| m.len()).unwrap_or(0);
        self.file = Some(file);
        Ok(())
    }

    fn append(&mut self, bytes: &[u8]) -> io::Result<()> {
        if self.written > 0 && self.written + bytes.len() as u64 > self.config.max_file_size {
            self.rotate()?;
        }
        if self.file.is_none() {
            self.open_active()?;
        }
        if let Some(file) = self.file.as_mut() {
            file.write_all(bytes)?;
            self.written += bytes.len() as u64;
        }
        self.remember(bytes);
        Ok(())
    }

    fn rotate(&mut self) -> io::Result<()> {
        self.file = None;
        let active = self.active_path();

        if self.config.max_files <= 1 {
            fs::remove_file(&active).or_else(ignore_missing)?;
            return self.open_active();
        }

        let oldest = self.archive_path(self.config.max_files - 1);
        fs::remove_file(&oldest).or_else(ignore_missing)?;
        for index in (1..self.config.max_files - 1).rev() {
            let from = self.archive_path(index);
            if from.exists() {
                fs::rename(&from, self.archive_path(index + 1))?;
            }
        }
        fs::rename(&active, self.archive_path(1)).or_else(ignore_missing)?;
        self.open_active()
    }

    fn remember(&mut self, bytes: &[u8]) {
        if self.config.buffer_lines == 0 {
            return;
        }
        for line in String::from_utf8_lossy(bytes).lines() {
            if line.trim().is_empty() {
                continue;
            }
            if self.recent.len() == self.config.buffer_lines {
                self.recent.pop_front();
            }
            self.recent.push_back(line.to_string());
        }
    }
}

fn ignore_missing(err: io::Error) -> io::Result<()> {
    if err.kind() == io::ErrorKind::NotFound {
        Ok(())
    } else {
        Err(err)
    }
}

#[derive(Clone)]
struct RollingWriter {
    inner: Arc<Mutex<RollingFile>>,
}

impl<'a> MakeWriter<'a> for RollingWriter {
    type Writer = EventWriter;

    fn make_writer(&'a self) -> Self::Writer {
        EventWriter {
            inner: self.inner.clone(),
            buf: Vec::new(),
        }
    }
}

/// Collects one formatted event and hands it to the file on drop
struct EventWriter {
    inner: Arc<Mutex<RollingFile>>,
    buf: Vec<u8>,
}

impl Write for EventWriter {
    fn write(&mut self, bytes: &[u8]) -> io::Result<usize> {
        self.buf.extend_from_slice(bytes);
        Ok(bytes.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Drop for EventWriter {
    fn drop(&mut self) {
        if self.buf.is_empty() {
            return;
        }
        if let Ok(mut file) = self.inner.lock() {
            let _ = file.append(&self.buf);
        }
    }
}
