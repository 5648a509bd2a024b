//! Error module
//!
//! Defines the error type shared by every kickshaws helper using `thiserror`.
//! Codec failures have their own variants; failures of the wrapped facilities
//! (file I/O, CSV parsing, JSON, SMTP, HTTP) are converted via `From`.

use thiserror::Error;

/// The main error type for kickshaws.
///
/// # Error Categories
///
/// - **Codec errors**: raised by the text decoder and the tabular codec
///   (`InvalidInputType`, `EncodingExhausted`, `MalformedSyntax`,
///   `SchemaMismatch`, `NotASequence`, `EmptyTable`)
/// - **Collaborator errors**: file, mail, HTTP and logger setup failures
/// - **Argument errors**: invalid caller-supplied configuration
///
/// # Example
///
/// ```rust,ignore
/// use kickshaws::error::KickshawsError;
///
/// fn example() -> Result<(), KickshawsError> {
///     let bytes = std::fs::read("missing.csv")?;
///     Ok(())
/// }
/// ```
#[derive(Error, Debug)]
pub enum KickshawsError {
    /// The input was already-decoded text where raw bytes were expected.
    #[error("Invalid input type: {0}")]
    InvalidInputType(String),

    /// No candidate encoding could decode the input.
    ///
    /// Unreachable with the default candidate chain, whose last entry
    /// (Windows-1252) maps every byte value.
    #[error("No candidate encoding could decode the input")]
    EncodingExhausted,

    /// Structural CSV error: unterminated quoted field or a row with more
    /// fields than the header.
    #[error("Malformed CSV: {0}")]
    MalformedSyntax(String),

    /// A record carries a key that the header (first record) does not have.
    #[error("Record {row} has key '{key}' which is not in the header")]
    SchemaMismatch {
        /// Zero-based index of the offending record.
        row: usize,
        /// The key absent from the header.
        key: String,
    },

    /// The input is not an ordered sequence of records.
    #[error("Not a sequence of records: {0}")]
    NotASequence(String),

    /// Encoding needs at least one record to derive the header from.
    #[error("Cannot encode an empty table: the header comes from the first record")]
    EmptyTable,

    /// Invalid caller-supplied argument or configuration.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// The HTTP body was shorter or longer than its `Content-Length`.
    #[error("Incomplete HTTP body: expected {expected} bytes, received {actual}")]
    IncompleteBody {
        /// Value of the `Content-Length` header.
        expected: u64,
        /// Number of bytes actually read.
        actual: u64,
    },

    /// CSV parsing or writing error from the csv crate.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// General I/O error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing error.
    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    /// Message could not be assembled.
    #[error("Email error: {0}")]
    Mail(#[from] lettre::error::Error),

    /// SMTP transport failure (no relay listening, rejected recipient, ...).
    ///
    /// Boxed, like the other large foreign errors, to keep `Result` small.
    #[error("SMTP error: {0}")]
    Smtp(#[source] Box<lettre::transport::smtp::Error>),

    /// A sender or recipient address did not parse.
    #[error("Invalid email address: {0}")]
    Address(#[from] lettre::address::AddressError),

    /// HTTP client error from reqwest.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Rolling log file appender could not be created.
    #[error("Logger setup error: {0}")]
    Logger(#[from] tracing_appender::rolling::InitError),
}

impl From<lettre::transport::smtp::Error> for KickshawsError {
    fn from(err: lettre::transport::smtp::Error) -> Self {
        KickshawsError::Smtp(Box::new(err))
    }
}

/// Result alias used throughout the crate.
pub type Result<T, E = KickshawsError> = std::result::Result<T, E>;
