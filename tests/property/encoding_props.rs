//! Property-based tests for the encoding fallback chain

use proptest::prelude::*;

use kickshaws::csv_handler::{decode_bytes, decode_with, EncodingCandidate, ENCODING_CANDIDATES};

/// Strategy for text that cannot be mistaken for escaped ASCII
fn utf8_text_strategy() -> impl Strategy<Value = String> {
    "[^\\\\\u{feff}]{0,64}"
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Any byte sequence decodes to some text.
    #[test]
    fn prop_decode_is_total(raw in prop::collection::vec(any::<u8>(), 0..256)) {
        prop_assert!(decode_bytes(&raw).is_ok());
    }

    /// Valid UTF-8 comes back unchanged, with or without a BOM.
    #[test]
    fn prop_utf8_is_preserved(text in utf8_text_strategy(), bom in any::<bool>()) {
        let mut raw = Vec::new();
        if bom {
            raw.extend_from_slice(b"\xEF\xBB\xBF");
        }
        raw.extend_from_slice(text.as_bytes());

        let decoded = decode_with(&ENCODING_CANDIDATES, &raw).unwrap();
        prop_assert_eq!(decoded.encoding, EncodingCandidate::Utf8Sig);
        prop_assert_eq!(decoded.text, text);
    }

    /// Latin-1 letters written as single bytes fall through to Windows-1252.
    #[test]
    fn prop_latin1_falls_back_to_cp1252(
        prefix in "[a-z]{1,8}",
        accented in prop::collection::vec(0xC0u8..=0xFF, 1..8),
    ) {
        let mut raw = prefix.clone().into_bytes();
        raw.extend_from_slice(&accented);

        let decoded = decode_with(&ENCODING_CANDIDATES, &raw).unwrap();
        let expected: String = prefix
            .chars()
            .chain(accented.iter().map(|&b| char::from(b)))
            .collect();

        prop_assert_eq!(decoded.encoding, EncodingCandidate::Windows1252);
        prop_assert_eq!(decoded.text, expected);
    }

    /// UTF-16 with a byte-order mark decodes in either byte order.
    #[test]
    fn prop_utf16_with_bom(text in "[a-zA-Z0-9é日 ]{0,32}", little_endian in any::<bool>()) {
        let mut raw = if little_endian { vec![0xFF, 0xFE] } else { vec![0xFE, 0xFF] };
        for unit in text.encode_utf16() {
            let bytes = if little_endian { unit.to_le_bytes() } else { unit.to_be_bytes() };
            raw.extend_from_slice(&bytes);
        }

        prop_assert_eq!(decode_bytes(&raw).unwrap(), text);
    }
}

#[test]
fn test_escape_sequences_decode() {
    let decoded = decode_with(&ENCODING_CANDIDATES, b"Caf\\u00e9 \\u263A").unwrap();
    assert_eq!(decoded.encoding, EncodingCandidate::UnicodeEscape);
    assert_eq!(decoded.text, "Caf\u{e9} \u{263a}");
}

#[test]
fn test_empty_input_is_empty_text() {
    assert_eq!(decode_bytes(b"").unwrap(), "");
}
