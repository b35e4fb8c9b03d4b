//! Logging for autoconstruct
//!
//! The library only emits `tracing` events; it never installs a subscriber
//! on its own. Tests that want to see resolution and injection traces can
//! call [`init_test_logging`] or build a [`LogConfig`].
//!
//! # Examples
//!
//! ```no_run
//! use autoconstruct_core::logging::*;
//!
//! // AUTOCONSTRUCT_LOG=autoconstruct_core=trace cargo test
//! init_test_logging();
//!
//! LogConfig::new()
//!     .level(LogLevel::Debug)
//!     .format(LogFormat::Json)
//!     .init();
//! ```

use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

// Re-export tracing macros for convenience
pub use tracing::{debug, error, info, trace, warn};

/// Environment variable holding an `EnvFilter` directive.
pub const LOG_ENV_VAR: &str = "AUTOCONSTRUCT_LOG";

/// Log level for filtering messages
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Trace => LevelFilter::TRACE,
            LogLevel::Debug => LevelFilter::DEBUG,
            LogLevel::Info => LevelFilter::INFO,
            LogLevel::Warn => LevelFilter::WARN,
            LogLevel::Error => LevelFilter::ERROR,
        }
    }
}

/// Output format for log messages
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable multi-line output
    Pretty,
    /// One line per event
    Compact,
    /// Structured JSON, one object per event
    Json,
}

/// Subscriber configuration used by tests and tools embedding the library.
#[derive(Debug, Clone)]
pub struct LogConfig {
    pub level: LogLevel,
    pub format: LogFormat,
    /// Write through the libtest capture instead of stderr
    pub test_writer: bool,
    /// Overrides `level` and the environment when set
    pub env_filter: Option<String>,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: LogLevel::Warn,
            format: LogFormat::Compact,
            test_writer: true,
            env_filter: None,
        }
    }
}

impl LogConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn level(mut self, level: LogLevel) -> Self {
        self.level = level;
        self
    }

    pub fn format(mut self, format: LogFormat) -> Self {
        self.format = format;
        self
    }

    pub fn with_test_writer(mut self, enable: bool) -> Self {
        self.test_writer = enable;
        self
    }

    /// Set a filter such as `"autoconstruct_core=trace"`.
    pub fn with_env_filter(mut self, filter: impl Into<String>) -> Self {
        self.env_filter = Some(filter.into());
        self
    }

    /// Filter precedence: explicit filter, then `AUTOCONSTRUCT_LOG`, then `level`.
    pub fn filter(&self) -> EnvFilter {
        if let Some(directive) = &self.env_filter {
            if let Ok(filter) = EnvFilter::try_new(directive) {
                return filter;
            }
        }
        EnvFilter::try_from_env(LOG_ENV_VAR).unwrap_or_else(|_| {
            EnvFilter::builder()
                .with_default_directive(LevelFilter::from(self.level).into())
                .parse_lossy("")
        })
    }

    /// Install the global subscriber.
    ///
    /// Returns `false` if a subscriber was already installed, which is the
    /// normal case when several tests initialise logging.
    pub fn init(self) -> bool {
        let filter = self.filter();
        let registry = tracing_subscriber::registry().with(filter);

        let result = match (self.format, self.test_writer) {
            (LogFormat::Pretty, true) => registry
                .with(fmt::layer().pretty().with_test_writer())
                .try_init(),
            (LogFormat::Pretty, false) => registry
                .with(fmt::layer().pretty().with_writer(std::io::stderr))
                .try_init(),
            (LogFormat::Compact, true) => registry
                .with(fmt::layer().compact().with_test_writer())
                .try_init(),
            (LogFormat::Compact, false) => registry
                .with(fmt::layer().compact().with_writer(std::io::stderr))
                .try_init(),
            (LogFormat::Json, true) => registry
                .with(fmt::layer().json().with_test_writer())
                .try_init(),
            (LogFormat::Json, false) => registry
                .with(fmt::layer().json().with_writer(std::io::stderr))
                .try_init(),
        };

        result.is_ok()
    }
}

/// Install a compact subscriber writing through the test harness.
///
/// Safe to call from every test; only the first call installs anything.
pub fn init_test_logging() {
    LogConfig::default().init();
}
