//! File slurp/spit helpers.
//!
//! Thin wrappers that source and sink the byte blobs the CSV handler
//! transforms: read a whole file, write a whole file, and the CSV/JSON
//! shortcuts built on top of them.

use std::path::Path;

use serde_json::Value;

use crate::csv_handler::{
    decode_bytes, decode_table_bytes, encode_table, EncodeOptions, Record, Table,
};
use crate::error::Result;

/// Reads the whole file as raw bytes.
pub fn slurp(path: impl AsRef<Path>) -> Result<Vec<u8>> {
    let path = path.as_ref();
    let bytes = std::fs::read(path)?;
    tracing::debug!("Read {} bytes from {}", bytes.len(), path.display());
    Ok(bytes)
}

/// Reads the whole file and decodes it with the default encoding chain.
pub fn slurp_text(path: impl AsRef<Path>) -> Result<String> {
    decode_bytes(&slurp(path)?)
}

/// Reads and parses a JSON file.
pub fn slurp_json(path: impl AsRef<Path>) -> Result<Value> {
    let bytes = slurp(path)?;
    Ok(serde_json::from_slice(&bytes)?)
}

/// Reads a CSV file into a [`Table`].
///
/// # Example
///
/// ```rust,ignore
/// use kickshaws::files::slurp_csv;
///
/// let people = slurp_csv("people.csv")?;
/// for person in &people {
///     println!("{:?}", person.get("name"));
/// }
/// ```
pub fn slurp_csv(path: impl AsRef<Path>) -> Result<Table> {
    decode_table_bytes(&slurp(path)?)
}

/// Writes `data` to `path`, replacing any existing file.
///
/// Text is written as UTF-8; byte slices are written unchanged.
pub fn spit(path: impl AsRef<Path>, data: impl AsRef<[u8]>) -> Result<()> {
    let path = path.as_ref();
    let data = data.as_ref();
    std::fs::write(path, data)?;
    tracing::debug!("Wrote {} bytes to {}", data.len(), path.display());
    Ok(())
}

/// Encodes `table` as CSV and writes it to `path`.
pub fn spit_csv(path: impl AsRef<Path>, table: &[Record], options: &EncodeOptions) -> Result<()> {
    spit(path, encode_table(table, options)?)
}
