//! Named rolling-file loggers.
//!
//! A [`LoggerRegistry`] hands out one [`TagLogger`] per tag. Each logger
//! writes to its own rolling file under the configured directory
//! (`log/<tag>.<date>.log` by default) and prefixes every line with a
//! timestamp, the level and the caller's source location. Asking for the
//! same tag again returns the same logger.
//!
//! # Example
//!
//! ```rust,ignore
//! use kickshaws::logger::{LoggerConfig, LoggerRegistry};
//!
//! let registry = LoggerRegistry::new(LoggerConfig::default());
//! let logger = registry.logger("import")?;
//! logger.info("Kickshaws library!");
//! logger.error(format!("failed after {} rows", 1147));
//! ```

use std::collections::HashMap;
use std::fmt::Display;
use std::panic::Location;
use std::path::PathBuf;
use std::sync::{Arc, Mutex, PoisonError};

use serde::Deserialize;
use tracing::{Dispatch, Level};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::fmt::time::ChronoLocal;

use crate::error::{KickshawsError, Result};

/// Default number of rolled files kept per tag.
pub const DEFAULT_MAX_FILES: usize = 16;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.3f";

/// How often a tag's log file is rolled over.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogRotation {
    Minutely,
    Hourly,
    #[default]
    Daily,
    /// A single file that is never rolled.
    Never,
}

impl From<LogRotation> for Rotation {
    fn from(rotation: LogRotation) -> Self {
        match rotation {
            LogRotation::Minutely => Rotation::MINUTELY,
            LogRotation::Hourly => Rotation::HOURLY,
            LogRotation::Daily => Rotation::DAILY,
            LogRotation::Never => Rotation::NEVER,
        }
    }
}

/// Minimum level a logger records.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

impl From<LogLevel> for Level {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Trace => Level::TRACE,
            LogLevel::Debug => Level::DEBUG,
            LogLevel::Info => Level::INFO,
            LogLevel::Warn => Level::WARN,
            LogLevel::Error => Level::ERROR,
        }
    }
}

/// Settings shared by every logger of a registry.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct LoggerConfig {
    /// Directory holding the log files; created on first use.
    pub dir: PathBuf,
    /// Number of rolled files kept per tag.
    pub max_files: usize,
    pub rotation: LogRotation,
    pub level: LogLevel,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("log"),
            max_files: DEFAULT_MAX_FILES,
            rotation: LogRotation::default(),
            level: LogLevel::default(),
        }
    }
}

/// A logger bound to one tag and one rolling file.
#[derive(Debug)]
pub struct TagLogger {
    tag: String,
    dispatch: Dispatch,
}

impl TagLogger {
    fn new(tag: &str, config: &LoggerConfig) -> Result<Self> {
        let appender = RollingFileAppender::builder()
            .rotation(config.rotation.into())
            .filename_prefix(tag)
            .filename_suffix("log")
            .max_log_files(config.max_files)
            .build(&config.dir)?;

        let subscriber = tracing_subscriber::fmt()
            .with_writer(appender)
            .with_ansi(false)
            .with_target(false)
            .with_timer(ChronoLocal::new(TIMESTAMP_FORMAT.to_string()))
            .with_max_level(Level::from(config.level))
            .finish();

        Ok(Self {
            tag: tag.to_string(),
            dispatch: Dispatch::new(subscriber),
        })
    }

    #[must_use]
    pub fn tag(&self) -> &str {
        &self.tag
    }

    #[track_caller]
    pub fn debug(&self, message: impl Display) {
        self.emit(LogLevel::Debug, Location::caller(), &message);
    }

    #[track_caller]
    pub fn info(&self, message: impl Display) {
        self.emit(LogLevel::Info, Location::caller(), &message);
    }

    #[track_caller]
    pub fn warn(&self, message: impl Display) {
        self.emit(LogLevel::Warn, Location::caller(), &message);
    }

    #[track_caller]
    pub fn error(&self, message: impl Display) {
        self.emit(LogLevel::Error, Location::caller(), &message);
    }

    fn emit(&self, level: LogLevel, caller: &Location<'_>, message: &dyn Display) {
        tracing::dispatcher::with_default(&self.dispatch, || match level {
            LogLevel::Trace => tracing::trace!(caller = %caller, "{}", message),
            LogLevel::Debug => tracing::debug!(caller = %caller, "{}", message),
            LogLevel::Info => tracing::info!(caller = %caller, "{}", message),
            LogLevel::Warn => tracing::warn!(caller = %caller, "{}", message),
            LogLevel::Error => tracing::error!(caller = %caller, "{}", message),
        });
    }
}

/// Creates and caches one [`TagLogger`] per tag.
///
/// Owned by the application's composition root; dropping the registry drops
/// the cache (loggers already handed out stay usable).
#[derive(Debug, Default)]
pub struct LoggerRegistry {
    config: LoggerConfig,
    loggers: Mutex<HashMap<String, Arc<TagLogger>>>,
}

impl LoggerRegistry {
    #[must_use]
    pub fn new(config: LoggerConfig) -> Self {
        Self {
            config,
            loggers: Mutex::new(HashMap::new()),
        }
    }

    #[must_use]
    pub fn config(&self) -> &LoggerConfig {
        &self.config
    }

    /// Returns the logger for `tag`, creating it (and the log directory) on
    /// first use.
    pub fn logger(&self, tag: &str) -> Result<Arc<TagLogger>> {
        if tag.is_empty() {
            return Err(KickshawsError::InvalidArgument(
                "logger tag must be a non-empty string".to_string(),
            ));
        }

        std::fs::create_dir_all(&self.config.dir)?;

        let mut loggers = self.loggers.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(logger) = loggers.get(tag) {
            return Ok(Arc::clone(logger));
        }

        let logger = Arc::new(TagLogger::new(tag, &self.config)?);
        loggers.insert(tag.to_string(), Arc::clone(&logger));
        Ok(logger)
    }
}
