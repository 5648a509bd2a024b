use csv::{ByteRecord, ReaderBuilder};

use super::encoding::{decode_bytes, transcode_utf16};
use super::record::{RawData, Record, Table};
use crate::error::{KickshawsError, Result};

/// Decodes delimited tabular data into a [`Table`].
///
/// Rejects already-decoded text with [`KickshawsError::InvalidInputType`];
/// see [`decode_table_bytes`] for the parsing rules.
pub fn decode_table(data: &RawData) -> Result<Table> {
    decode_table_bytes(data.as_raw()?)
}

/// Decodes comma-separated bytes into a [`Table`].
///
/// The first row is the header. Every header name and value is decoded with
/// [`decode_bytes`] while still in byte form, so a file may mix UTF-8 and
/// Windows-1252 cells. Input starting with a UTF-16 byte-order mark is
/// transcoded to UTF-8 as a whole first.
///
/// # Row shape
///
/// - Rows shorter than the header yield a [`Record`] with only the keys for
///   which a value was present.
/// - Rows longer than the header are rejected with
///   [`KickshawsError::MalformedSyntax`].
/// - Blank lines are skipped; empty input yields an empty table.
///
/// # Example
///
/// ```
/// use kickshaws::csv_handler::decode_table_bytes;
///
/// let table = decode_table_bytes(b"name,age\nAlice,30\nBob,25\n").unwrap();
/// assert_eq!(table.len(), 2);
/// assert_eq!(table[0].get("name"), Some("Alice"));
/// assert_eq!(table[1].get("age"), Some("25"));
/// ```
pub fn decode_table_bytes(raw: &[u8]) -> Result<Table> {
    // UTF-16 delimiters are two bytes wide; the csv parser needs UTF-8.
    let transcoded = transcode_utf16(raw);
    let raw = transcoded.as_deref().map_or(raw, str::as_bytes);

    check_quotes_terminated(raw)?;

    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(raw);

    let header: Vec<String> = reader
        .byte_headers()?
        .iter()
        .map(decode_bytes)
        .collect::<Result<_>>()?;

    let mut table = Table::new();
    let mut row = ByteRecord::new();
    while reader.read_byte_record(&mut row)? {
        let line = row.position().map_or(0, csv::Position::line);
        table.push(decode_row(&header, &row, line)?);
    }
    Ok(table)
}

fn decode_row(header: &[String], row: &ByteRecord, line: u64) -> Result<Record> {
    if row.len() > header.len() {
        return Err(KickshawsError::MalformedSyntax(format!(
            "Line {}: Expected at most {} fields but got {}",
            line,
            header.len(),
            row.len()
        )));
    }

    let mut record = Record::new();
    for (key, value) in header.iter().zip(row.iter()) {
        record.insert(key.as_str(), decode_bytes(value)?);
    }
    Ok(record)
}

/// Rejects input that ends inside a quoted field.
///
/// The csv crate silently closes such a field at end of input. A quote only
/// opens a quoted field at the start of a field; inside one, `""` is a
/// literal quote.
fn check_quotes_terminated(raw: &[u8]) -> Result<()> {
    let mut in_quotes = false;
    let mut at_field_start = true;
    let mut line: u64 = 1;
    let mut quote_line: u64 = 1;
    let mut bytes = raw.iter().peekable();

    while let Some(&byte) = bytes.next() {
        if byte == b'\n' {
            line += 1;
        }
        if in_quotes {
            if byte == b'"' {
                if bytes.peek() == Some(&&b'"') {
                    bytes.next();
                } else {
                    in_quotes = false;
                }
            }
            continue;
        }
        match byte {
            b'"' if at_field_start => {
                in_quotes = true;
                quote_line = line;
                at_field_start = false;
            }
            b',' | b'\n' | b'\r' => at_field_start = true,
            _ => at_field_start = false,
        }
    }

    if in_quotes {
        return Err(KickshawsError::MalformedSyntax(format!(
            "Line {}: Unterminated quoted field",
            quote_line
        )));
    }
    Ok(())
}
