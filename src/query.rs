//! Selection helpers over tables.

use crate::csv_handler::Record;

/// Returns the records whose `key` field equals `value`.
///
/// Records lacking `key` never match. The result may be empty.
///
/// # Example
///
/// ```
/// use kickshaws::csv_handler::Record;
/// use kickshaws::query::select;
///
/// let table: Vec<Record> = vec![
///     [("name", "Alice"), ("team", "red")].into_iter().collect(),
///     [("name", "Bob"), ("team", "blue")].into_iter().collect(),
/// ];
/// let red = select(&table, "team", "red");
/// assert_eq!(red.len(), 1);
/// assert_eq!(red[0].get("name"), Some("Alice"));
/// ```
#[must_use]
pub fn select(table: &[Record], key: &str, value: &str) -> Vec<Record> {
    table
        .iter()
        .filter(|record| matches(record, key, value))
        .cloned()
        .collect()
}

/// Returns the indices of the records whose `key` field equals `value`.
#[must_use]
pub fn select_indices(table: &[Record], key: &str, value: &str) -> Vec<usize> {
    table
        .iter()
        .enumerate()
        .filter(|(_, record)| matches(record, key, value))
        .map(|(i, _)| i)
        .collect()
}

#[inline]
fn matches(record: &Record, key: &str, value: &str) -> bool {
    record.get(key) == Some(value)
}
