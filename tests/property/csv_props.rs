//! Property-based tests for table encoding and decoding
//!
//! Checks that encoding a table and decoding the bytes again gives back the
//! same records, whatever the cell contents.

use proptest::prelude::*;

use kickshaws::csv_handler::{
    decode_table, decode_table_bytes, encode_table, EncodeOptions, RawData, Record,
};
use kickshaws::error::KickshawsError;

/// Strategy for a set of distinct column names (two or more)
fn header_strategy() -> impl Strategy<Value = Vec<String>> {
    prop::collection::btree_set("[a-z][a-z0-9_]{0,8}", 2..6)
        .prop_map(|keys| keys.into_iter().collect())
}

/// Strategy for cell values, including characters that force quoting
///
/// Backslashes are left out: a pure-ASCII cell holding `\uXXXX` is read back
/// unescaped (see `test_escaped_ascii_cell_is_unescaped_on_decode`).
fn cell_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        // Plain alphanumeric values
        "[a-zA-Z0-9 ]{0,20}",
        // Values with commas and quotes
        "[a-zA-Z0-9]{0,5}[,\"][a-zA-Z0-9 ]{0,5}[,\"]?",
        // Values with embedded line breaks
        "[a-zA-Z0-9]{0,5}(\n|\r\n)[a-zA-Z0-9]{0,5}",
        // Non-ASCII text
        "[a-zA-Zéüñ€日本 ]{0,12}",
        Just(String::new()),
    ]
}

/// Strategy for a table: a header plus rows with every column filled
fn table_strategy() -> impl Strategy<Value = Vec<Record>> {
    header_strategy().prop_flat_map(|header| {
        let width = header.len();
        prop::collection::vec(prop::collection::vec(cell_strategy(), width), 1..8).prop_map(
            move |rows| {
                rows.into_iter()
                    .map(|cells| header.iter().cloned().zip(cells).collect::<Record>())
                    .collect()
            },
        )
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Encoding then decoding returns the original table.
    #[test]
    fn prop_table_round_trip(table in table_strategy(), bom in any::<bool>()) {
        let options = EncodeOptions { include_bom: bom };
        let bytes = encode_table(&table, &options).unwrap();
        let decoded = decode_table_bytes(&bytes).unwrap();

        prop_assert_eq!(decoded, table);
    }

    /// The BOM appears exactly when requested.
    #[test]
    fn prop_bom_prefix_matches_option(table in table_strategy(), bom in any::<bool>()) {
        let bytes = encode_table(&table, &EncodeOptions { include_bom: bom }).unwrap();
        prop_assert_eq!(bytes.starts_with(b"\xEF\xBB\xBF"), bom);
    }

    /// The first line of the output is the first record's keys.
    #[test]
    fn prop_header_is_first_record_keys(table in table_strategy()) {
        let bytes = encode_table(&table, &EncodeOptions::default()).unwrap();
        let text = String::from_utf8(bytes).unwrap();
        let first_line = text.lines().next().unwrap();
        let expected: Vec<&str> = table[0].keys().collect();

        prop_assert_eq!(first_line, expected.join(","));
    }

    /// Rows missing trailing keys are written with empty fields.
    #[test]
    fn prop_missing_keys_become_empty(header in header_strategy(), value in "[a-z]{1,8}") {
        let full: Record = header.iter().map(|key| (key.clone(), value.clone())).collect();
        let partial: Record = std::iter::once((header[0].clone(), value.clone())).collect();

        let bytes = encode_table(&[full, partial], &EncodeOptions::default()).unwrap();
        let decoded = decode_table_bytes(&bytes).unwrap();

        prop_assert_eq!(decoded[1].get(&header[0]), Some(value.as_str()));
        for key in &header[1..] {
            prop_assert_eq!(decoded[1].get(key), Some(""));
        }
    }
}

#[test]
fn test_header_from_first_record() {
    let table: Vec<Record> = vec![
        [("a", "1"), ("b", "2")].into_iter().collect(),
        [("b", "3"), ("a", "4")].into_iter().collect(),
    ];
    let bytes = encode_table(&table, &EncodeOptions::default()).unwrap();
    let text = String::from_utf8(bytes).unwrap();

    assert_eq!(text.lines().collect::<Vec<_>>(), ["a,b", "1,2", "4,3"]);
}

#[test]
fn test_decode_example_table() {
    let table = decode_table(&RawData::from(b"name,age\nAlice,30\nBob,25\n".to_vec())).unwrap();

    assert_eq!(table.len(), 2);
    assert_eq!(table[0].get("name"), Some("Alice"));
    assert_eq!(table[0].get("age"), Some("30"));
    assert_eq!(table[1].get("name"), Some("Bob"));
    assert_eq!(table[1].get("age"), Some("25"));
}

#[test]
fn test_escaped_ascii_cell_is_unescaped_on_decode() {
    let table: Vec<Record> = vec![[("json", r"caf\u00e9"), ("n", "1")].into_iter().collect()];
    let bytes = encode_table(&table, &EncodeOptions::default()).unwrap();
    let decoded = decode_table_bytes(&bytes).unwrap();

    assert_ne!(decoded, table);
    assert_eq!(decoded[0].get("json"), Some("caf\u{e9}"));
    assert_eq!(decoded[0].get("n"), Some("1"));
}

#[test]
fn test_backslash_without_unicode_escape_round_trips() {
    let table: Vec<Record> = vec![[("path", r"C:\temp\new"), ("n", "1")].into_iter().collect()];
    let bytes = encode_table(&table, &EncodeOptions::default()).unwrap();

    assert_eq!(decode_table_bytes(&bytes).unwrap(), table);
}

#[test]
fn test_decode_rejects_text_input() {
    let err = decode_table(&RawData::from("name\nAlice\n")).unwrap_err();
    assert!(matches!(err, KickshawsError::InvalidInputType(_)));
}

#[test]
fn test_encode_unknown_key_is_schema_mismatch() {
    let table: Vec<Record> = vec![
        [("a", "1")].into_iter().collect(),
        [("a", "2"), ("z", "3")].into_iter().collect(),
    ];
    match encode_table(&table, &EncodeOptions::default()) {
        Err(KickshawsError::SchemaMismatch { row, key }) => {
            assert_eq!(row, 1);
            assert_eq!(key, "z");
        }
        other => panic!("expected SchemaMismatch, got {:?}", other),
    }
}

#[test]
fn test_encode_empty_table() {
    assert!(matches!(
        encode_table(&[], &EncodeOptions::default()),
        Err(KickshawsError::EmptyTable)
    ));
}
