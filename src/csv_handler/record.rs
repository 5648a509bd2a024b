//! Record and table types for tabular data.
//!
//! Defines [`Record`] (an ordered field-name to value mapping), [`Table`],
//! and [`RawData`], the tagged input type that separates raw bytes from
//! already-decoded text.

use serde_json::Value;

use crate::error::{KickshawsError, Result};

/// A single row of tabular data.
///
/// Keys are unique and keep insertion order, which for decoded data is the
/// header order. Values are always text; inserting a number or other
/// `Display` value stores its textual representation.
///
/// # Example
///
/// ```
/// use kickshaws::csv_handler::Record;
///
/// let mut record = Record::new();
/// record.insert("name", "Alice");
/// record.insert("age", 30);
///
/// assert_eq!(record.get("age"), Some("30"));
/// assert_eq!(record.keys().collect::<Vec<_>>(), ["name", "age"]);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Record {
    fields: Vec<(String, String)>,
}

impl Record {
    /// Creates an empty record.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a field, replacing the value in place if the key already exists.
    ///
    /// Returns the previous value for the key, if any.
    pub fn insert(&mut self, key: impl Into<String>, value: impl ToString) -> Option<String> {
        let key = key.into();
        let value = value.to_string();
        match self.fields.iter_mut().find(|(k, _)| *k == key) {
            Some((_, existing)) => Some(std::mem::replace(existing, value)),
            None => {
                self.fields.push((key, value));
                None
            }
        }
    }

    /// Returns the value for `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Whether the record has a field named `key`.
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.fields.iter().any(|(k, _)| k == key)
    }

    /// Field names in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(k, _)| k.as_str())
    }

    /// `(key, value)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Number of fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for Record
where
    K: Into<String>,
    V: ToString,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut record = Record::new();
        for (key, value) in iter {
            record.insert(key, value);
        }
        record
    }
}

/// An ordered sequence of records sharing a conceptual header.
pub type Table = Vec<Record>;

/// Input to the decoding functions: either raw bytes or already-decoded text.
///
/// Decoding functions accept only the `Raw` variant; handing them `Text`
/// is reported as [`KickshawsError::InvalidInputType`] instead of being
/// decoded a second time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawData {
    /// Bytes in an unknown encoding, as read from a file or socket.
    Raw(Vec<u8>),
    /// Text that has already been normalized.
    Text(String),
}

impl RawData {
    /// Returns the raw bytes, rejecting already-decoded text.
    pub fn as_raw(&self) -> Result<&[u8]> {
        match self {
            RawData::Raw(bytes) => Ok(bytes),
            RawData::Text(_) => Err(KickshawsError::InvalidInputType(
                "expected raw bytes, got already-decoded text".to_string(),
            )),
        }
    }
}

impl From<Vec<u8>> for RawData {
    fn from(bytes: Vec<u8>) -> Self {
        RawData::Raw(bytes)
    }
}

impl From<&[u8]> for RawData {
    fn from(bytes: &[u8]) -> Self {
        RawData::Raw(bytes.to_vec())
    }
}

impl From<String> for RawData {
    fn from(text: String) -> Self {
        RawData::Text(text)
    }
}

impl From<&str> for RawData {
    fn from(text: &str) -> Self {
        RawData::Text(text.to_string())
    }
}

/// Converts a JSON array of objects into a [`Table`].
///
/// Strings are taken verbatim, numbers and booleans use their JSON text,
/// `null` becomes an empty field and nested arrays/objects are stored as
/// compact JSON. Key order follows the JSON document.
///
/// Returns [`KickshawsError::NotASequence`] when the value is not an array
/// or when one of its elements is not an object.
pub fn table_from_json(value: &Value) -> Result<Table> {
    let items = value.as_array().ok_or_else(|| {
        KickshawsError::NotASequence(format!("expected a JSON array, got {}", json_kind(value)))
    })?;

    items
        .iter()
        .enumerate()
        .map(|(i, item)| -> Result<Record> {
            let object = item.as_object().ok_or_else(|| {
                KickshawsError::NotASequence(format!(
                    "element {} is {}, expected an object",
                    i,
                    json_kind(item)
                ))
            })?;
            Ok(object
                .iter()
                .map(|(key, field)| (key.as_str(), json_field_text(field)))
                .collect())
        })
        .collect()
}

fn json_field_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
