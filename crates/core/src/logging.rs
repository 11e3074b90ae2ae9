//! Logging setup on top of the tracing ecosystem.
//!
//! # Environment Variables
//!
//! - `TAILVIEW_LOG`: Filter directive (like `RUST_LOG`), e.g., `tailview_ui=debug`
//! - `TAILVIEW_LOG_FORMAT`: Output format for stderr: `pretty`, `json`, `compact`
//! - `TAILVIEW_LOG_DIR`: Directory for log files (default `~/.tailview/logs`)
//!
//! # Configuration
//!
//! ```toml
//! [logging]
//! level = "warn"
//! format = "pretty"
//!
//! [logging.file]
//! enabled = true
//! level = "debug"
//! ```
//!
//! The viewer owns the terminal while it runs, so the CLI turns stderr output
//! off for the TUI and relies on the file layer instead.

use crate::Error;
use crate::config::{FileLoggingConfig, LoggingConfig as ConfigLoggingConfig};
use std::env;
use std::io;
use std::path::PathBuf;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, Layer, Registry, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Log output format for stderr.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Pretty, human-readable output with colors (default for TTY)
    #[default]
    Pretty,
    /// JSON output (one line per event)
    Json,
    /// Compact, single-line output
    Compact,
}

impl LogFormat {
    pub const VALUES: &[LogFormat] = &[LogFormat::Pretty, LogFormat::Json, LogFormat::Compact];

    pub fn parse_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "pretty" => Some(LogFormat::Pretty),
            "json" => Some(LogFormat::Json),
            "compact" => Some(LogFormat::Compact),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LogFormat::Pretty => "pretty",
            LogFormat::Json => "json",
            LogFormat::Compact => "compact",
        }
    }
}

/// Runtime logging configuration, bridged from the `[logging]` config section.
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Default log level / filter directive.
    pub level: String,
    /// Output format for stderr.
    pub format: LogFormat,
    /// Whether to write to stderr at all.
    pub stderr: bool,
    /// File logging configuration (optional).
    pub file: Option<FileLoggingConfig>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: "warn".to_string(), format: LogFormat::default(), stderr: true, file: None }
    }
}

impl From<ConfigLoggingConfig> for LoggingConfig {
    fn from(config: ConfigLoggingConfig) -> Self {
        let format = LogFormat::parse_str(&config.format).unwrap_or_default();

        Self {
            level: config.level,
            format,
            stderr: true,
            file: if config.file.enabled { Some(config.file) } else { None },
        }
    }
}

impl LoggingConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_level(mut self, level: impl Into<String>) -> Self {
        self.level = level.into();
        self
    }

    pub fn with_format(mut self, format: LogFormat) -> Self {
        self.format = format;
        self
    }

    pub fn with_file_logging(mut self, config: FileLoggingConfig) -> Self {
        self.file = Some(config);
        self
    }

    /// Disable the stderr layer (used while the TUI owns the terminal).
    pub fn without_stderr(mut self) -> Self {
        self.stderr = false;
        self
    }

    fn build_env_filter(&self, level: &str) -> EnvFilter {
        let filter = env::var("TAILVIEW_LOG")
            .ok()
            .or_else(|| env::var("RUST_LOG").ok())
            .unwrap_or_else(|| level.to_string());

        EnvFilter::try_new(&filter).unwrap_or_else(|_| EnvFilter::new(level))
    }

    fn is_tty() -> bool {
        atty::is(atty::Stream::Stderr)
    }

    fn detect_format(&self) -> LogFormat {
        if let Ok(fmt_str) = env::var("TAILVIEW_LOG_FORMAT")
            && let Some(fmt) = LogFormat::parse_str(&fmt_str)
        {
            return fmt;
        }

        if Self::is_tty() { self.format } else { LogFormat::Compact }
    }

    /// Get the log directory path.
    pub fn log_dir() -> Result<PathBuf, Error> {
        if let Ok(custom_dir) = env::var("TAILVIEW_LOG_DIR") {
            return Ok(PathBuf::from(custom_dir));
        }

        let home = env::var("HOME")
            .or_else(|_| env::var("USERPROFILE"))
            .map_err(|_| Error::Config("Could not determine home directory".to_string()))?;

        Ok(PathBuf::from(home).join(".tailview").join("logs"))
    }
}

/// Keeps the non-blocking file writer alive; dropping it flushes buffered lines.
#[derive(Debug)]
pub struct LogGuard {
    _guard: WorkerGuard,
}

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

/// Initialize the global tracing subscriber.
///
/// Returns a [`LogGuard`] when file logging is enabled; hold it for the
/// lifetime of the process.
pub fn init_logging(config: Option<LoggingConfig>) -> Result<Option<LogGuard>, Error> {
    let config = config.unwrap_or_default();
    let mut layers: Vec<BoxedLayer> = Vec::new();
    let mut guard = None;

    if config.stderr {
        let filter = config.build_env_filter(&config.level);
        let layer: BoxedLayer = match config.detect_format() {
            LogFormat::Pretty => fmt::layer().pretty().with_writer(io::stderr).with_ansi(true).with_filter(filter).boxed(),
            LogFormat::Json => fmt::layer().json().with_writer(io::stderr).with_filter(filter).boxed(),
            LogFormat::Compact => fmt::layer().compact().with_writer(io::stderr).with_filter(filter).boxed(),
        };
        layers.push(layer);
    }

    if let Some(file_config) = &config.file {
        let log_dir = LoggingConfig::log_dir()?;
        std::fs::create_dir_all(&log_dir)
            .map_err(|e| Error::Config(format!("Failed to create log directory: {}", e)))?;

        let file_appender = tracing_appender::rolling::daily(log_dir, "tailview.log");
        let (non_blocking, worker_guard) = tracing_appender::non_blocking(file_appender);
        let filter = config.build_env_filter(&file_config.level);
        layers.push(fmt::layer().json().with_writer(non_blocking).with_filter(filter).boxed());
        guard = Some(LogGuard { _guard: worker_guard });
    }

    if layers.is_empty() {
        return Ok(None);
    }

    Registry::default()
        .with(layers)
        .try_init()
        .map_err(|e| Error::Config(format!("Failed to install tracing subscriber: {}", e)))?;

    Ok(guard)
}
