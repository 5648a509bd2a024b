use csv::{Terminator, WriterBuilder};

use super::record::Record;
use crate::error::{KickshawsError, Result};

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Options for [`encode_table`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EncodeOptions {
    /// Prepend a UTF-8 byte-order mark.
    ///
    /// Excel misdetects plain UTF-8 CSV as the local code page unless the
    /// file starts with a BOM.
    pub include_bom: bool,
}

impl EncodeOptions {
    /// Options with the BOM enabled.
    #[must_use]
    pub fn with_bom() -> Self {
        Self { include_bom: true }
    }
}

/// Encodes a table as UTF-8 comma-separated bytes.
///
/// The header is the first record's keys, in that record's order. Each record
/// is written against the header: missing keys become empty fields, and a key
/// absent from the header fails with [`KickshawsError::SchemaMismatch`].
/// Fields containing commas, quotes or line breaks are quoted by the
/// underlying csv crate. Rows end with the platform line terminator.
///
/// Returns [`KickshawsError::EmptyTable`] when `table` is empty.
///
/// # Example
///
/// ```
/// use kickshaws::csv_handler::{encode_table, EncodeOptions, Record};
///
/// let table: Vec<Record> = vec![
///     [("a", "1"), ("b", "2")].into_iter().collect(),
///     [("a", "3"), ("b", "4")].into_iter().collect(),
/// ];
/// let bytes = encode_table(&table, &EncodeOptions::default()).unwrap();
/// let text = String::from_utf8(bytes).unwrap();
/// assert_eq!(text.lines().collect::<Vec<_>>(), ["a,b", "1,2", "3,4"]);
/// ```
pub fn encode_table(table: &[Record], options: &EncodeOptions) -> Result<Vec<u8>> {
    let header: Vec<&str> = table.first().ok_or(KickshawsError::EmptyTable)?.keys().collect();

    let mut buffer = Vec::new();
    if options.include_bom {
        buffer.extend_from_slice(UTF8_BOM);
    }

    let mut writer = WriterBuilder::new()
        .terminator(platform_terminator())
        .from_writer(buffer);

    writer.write_record(&header)?;
    for (row, record) in table.iter().enumerate() {
        if let Some(key) = record.keys().find(|key| !header.contains(key)) {
            return Err(KickshawsError::SchemaMismatch {
                row,
                key: key.to_string(),
            });
        }
        writer.write_record(header.iter().map(|key| record.get(key).unwrap_or("")))?;
    }

    writer
        .into_inner()
        .map_err(|e| KickshawsError::Io(e.into_error()))
}

fn platform_terminator() -> Terminator {
    if cfg!(windows) {
        Terminator::CRLF
    } else {
        Terminator::Any(b'\n')
    }
}
