//! Kickshaws Library
//!
//! A grab bag of small helpers. The centerpiece is the CSV handler, which
//! turns comma-separated bytes of unknown encoding into ordered records and
//! back into UTF-8 CSV. Around it sit a registry of named rolling-file
//! loggers, plain-text email over a local SMTP relay, file slurp/spit,
//! record selection, HTTP `Content-Length` verification and a few scalar
//! helpers.

pub mod cli;
pub mod csv_handler;
pub mod error;
pub mod files;
pub mod http;
pub mod logger;
pub mod mail;
pub mod query;
pub mod util;
