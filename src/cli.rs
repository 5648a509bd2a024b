//! CLI argument parsing module
//!
//! Handles command-line argument parsing using `clap` derive macros, plus the
//! optional JSON configuration file that supplies logger and mail settings.

use clap::{Parser, Subcommand};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::error::{KickshawsError, Result};
use crate::logger::{LogLevel, LoggerConfig};
use crate::mail::MailConfig;

/// Command-line arguments for kickshaws.
///
/// Use [`Args::validate`] after parsing to check argument combinations.
#[derive(Parser, Debug)]
#[command(name = "kickshaws")]
#[command(about = "Everyday helpers: normalize CSV encodings, select rows, send mail")]
#[command(version)]
pub struct Args {
    /// JSON configuration file with "logging" and "mail" sections
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Directory for rolling log files (overrides the configuration file)
    #[arg(long, global = true)]
    pub log_dir: Option<PathBuf>,

    /// Tag naming the log file
    #[arg(long, global = true, default_value = "kickshaws")]
    pub log_tag: String,

    /// Minimum level written to the log file
    #[arg(long, global = true, value_enum)]
    pub log_level: Option<LogLevel>,

    #[command(subcommand)]
    pub command: Command,
}

/// Operation to run.
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Re-encode a CSV file of any supported encoding as UTF-8
    Normalize {
        /// CSV file to read
        input: PathBuf,
        /// File to write
        output: PathBuf,
        /// Prepend a UTF-8 byte-order mark (helps Excel)
        #[arg(long, default_value = "false")]
        bom: bool,
        /// Replace non-breaking spaces with plain spaces
        #[arg(long, default_value = "false")]
        fix_nbsp: bool,
    },

    /// Print a file decoded to text
    Decode {
        /// File to read
        input: PathBuf,
        /// Replace non-breaking spaces with plain spaces
        #[arg(long, default_value = "false")]
        fix_nbsp: bool,
    },

    /// Select CSV rows whose KEY column equals VALUE
    Select {
        /// CSV file to read
        input: PathBuf,
        /// Column name
        #[arg(long)]
        key: String,
        /// Value to match
        #[arg(long)]
        value: String,
        /// Write the selected rows here instead of printing their indices
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Send a plain-text email through the local SMTP relay
    Mail {
        /// Sender address
        #[arg(long)]
        from: String,
        /// Recipient (repeat or comma-separate for several)
        #[arg(long, required = true)]
        to: Vec<String>,
        /// Subject line
        #[arg(long, default_value = "")]
        subject: String,
        /// Message body
        #[arg(long, default_value = "")]
        body: String,
        /// SMTP relay host (overrides the configuration file)
        #[arg(long)]
        smtp_host: Option<String>,
        /// SMTP relay port (overrides the configuration file)
        #[arg(long)]
        smtp_port: Option<u16>,
    },

    /// Print host name, today's date and the current timestamp
    Info,
}

/// Settings read from the `--config` JSON file.
///
/// Expected JSON format (every field optional):
/// ```json
/// {
///     "logging": {"dir": "log", "max_files": 16, "rotation": "daily", "level": "info"},
///     "mail": {"smtp_host": "localhost", "smtp_port": 25}
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub logging: LoggerConfig,
    pub mail: MailConfig,
}

impl Config {
    /// Loads the configuration from a JSON file.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let file = std::fs::File::open(path)?;
        let config = serde_json::from_reader(std::io::BufReader::new(file))?;
        Ok(config)
    }
}

impl Args {
    /// Validate argument combinations.
    ///
    /// # Returns
    ///
    /// - `Ok(())` if the arguments are usable
    /// - `Err(String)` with a descriptive message otherwise
    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.log_tag.trim().is_empty() {
            return Err("--log-tag must not be empty".to_string());
        }

        match &self.command {
            Command::Normalize { input, output, .. } if input == output => {
                Err("normalize: input and output must be different files".to_string())
            }
            Command::Select { key, .. } if key.is_empty() => {
                Err("select: --key must not be empty".to_string())
            }
            Command::Mail { to, .. } if to.iter().all(|t| t.trim().is_empty()) => {
                Err("mail: at least one --to address is required".to_string())
            }
            _ => Ok(()),
        }
    }

    /// Builds the effective configuration: the `--config` file (or defaults)
    /// with command-line overrides applied.
    pub fn resolve_config(&self) -> Result<Config> {
        let mut config = match &self.config {
            Some(path) => Config::from_json_file(path)?,
            None => Config::default(),
        };

        if let Some(dir) = &self.log_dir {
            config.logging.dir = dir.clone();
        }
        if let Some(level) = self.log_level {
            config.logging.level = level;
        }
        if let Command::Mail {
            smtp_host,
            smtp_port,
            ..
        } = &self.command
        {
            if let Some(host) = smtp_host {
                config.mail.smtp_host = host.clone();
            }
            if let Some(port) = smtp_port {
                config.mail.smtp_port = *port;
            }
        }

        if config.logging.max_files == 0 {
            return Err(KickshawsError::InvalidArgument(
                "logging.max_files must be at least 1".to_string(),
            ));
        }
        Ok(config)
    }
}
