//! Text decoding for byte sequences of unknown encoding.
//!
//! Spreadsheet exports arrive as UTF-8 (with or without BOM), UTF-16 or
//! Windows-1252, and occasionally as ASCII carrying `\uXXXX` escapes. The
//! decoder tries [`ENCODING_CANDIDATES`] in order and returns the first
//! successful decoding. Windows-1252 maps all 256 byte values, so the default
//! chain never fails on byte input.
//!
//! The escape stage understands `\uXXXX`, `\UXXXXXXXX`, `\xNN`, octal
//! `\ooo` (one to three digits) and the single-character escapes (`\n`,
//! `\t`, `\\` and so on). Named escapes (`\N{...}`) are not decoded and stay
//! in the text as written.

use std::sync::LazyLock;

use encoding_rs::{UTF_16BE, UTF_16LE, WINDOWS_1252};
use regex::bytes::Regex;

use super::record::RawData;
use crate::error::{KickshawsError, Result};

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Rust strings cannot hold unpaired surrogates.
const LONE_SURROGATE: char = char::REPLACEMENT_CHARACTER;

/// Backslash, `u`, exactly four hex digits.
static UNICODE_ESCAPE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\\u[0-9A-Fa-f]{4}").expect("unicode escape pattern is valid")
});

/// A text encoding the decoder may try.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EncodingCandidate {
    /// UTF-8, leading BOM stripped when present.
    Utf8Sig,
    /// UTF-16, byte order taken from the BOM.
    Utf16,
    /// ASCII/Latin-1 text with backslash escapes such as `\u00e9`.
    UnicodeEscape,
    /// Windows code page 1252, a superset of Latin-1 defined for every byte.
    Windows1252,
}

/// Candidates in the order [`decode_bytes`] tries them.
///
/// Windows-1252 must stay last: it accepts any input and would otherwise
/// shadow valid multi-byte UTF-8.
pub const ENCODING_CANDIDATES: [EncodingCandidate; 4] = [
    EncodingCandidate::Utf8Sig,
    EncodingCandidate::Utf16,
    EncodingCandidate::UnicodeEscape,
    EncodingCandidate::Windows1252,
];

/// The outcome of a successful decode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decoded {
    /// The decoded text.
    pub text: String,
    /// Which candidate produced it.
    pub encoding: EncodingCandidate,
}

impl EncodingCandidate {
    /// Attempts to decode `raw` with this encoding.
    ///
    /// Returns `None` when the bytes are not valid in this encoding.
    #[must_use]
    pub fn decode(self, raw: &[u8]) -> Option<String> {
        match self {
            EncodingCandidate::Utf8Sig => decode_utf8_sig(raw),
            EncodingCandidate::Utf16 => decode_utf16(raw),
            EncodingCandidate::UnicodeEscape => decode_unicode_escape(raw),
            EncodingCandidate::Windows1252 => Some(
                WINDOWS_1252
                    .decode_without_bom_handling(raw)
                    .0
                    .into_owned(),
            ),
        }
    }
}

/// Decodes raw bytes with the default candidate chain.
///
/// # Examples
///
/// ```
/// use kickshaws::csv_handler::decode_bytes;
///
/// // UTF-8 with a BOM
/// assert_eq!(decode_bytes(b"\xEF\xBB\xBFcaf\xC3\xA9").unwrap(), "café");
///
/// // Windows-1252
/// assert_eq!(decode_bytes(b"caf\xE9").unwrap(), "café");
///
/// // Escaped text
/// assert_eq!(decode_bytes(br"caf\u00e9").unwrap(), "café");
/// ```
pub fn decode_bytes(raw: &[u8]) -> Result<String> {
    decode_with(&ENCODING_CANDIDATES, raw).map(|decoded| decoded.text)
}

/// Decodes tagged input, rejecting text that has already been decoded.
pub fn decode_text(data: &RawData) -> Result<String> {
    decode_bytes(data.as_raw()?)
}

/// Runs `candidates` in order and reports which one succeeded.
///
/// Fails with [`KickshawsError::EncodingExhausted`] only if no candidate
/// accepts the input, which cannot happen while the list ends with
/// [`EncodingCandidate::Windows1252`].
pub fn decode_with(candidates: &[EncodingCandidate], raw: &[u8]) -> Result<Decoded> {
    candidates
        .iter()
        .find_map(|&encoding| {
            encoding
                .decode(raw)
                .map(|text| Decoded { text, encoding })
        })
        .ok_or(KickshawsError::EncodingExhausted)
}

/// Replaces non-breaking spaces (U+00A0) with plain spaces.
///
/// Excel is fond of introducing these into exported cells.
#[must_use]
pub fn fix_nbsp(text: &str) -> String {
    text.replace('\u{a0}', " ")
}

/// Pure-ASCII input containing `\uXXXX` is escaped text: the UTF-8 and
/// UTF-16 stages leave it to the escape stage.
fn is_escaped_ascii(raw: &[u8]) -> bool {
    raw.is_ascii() && UNICODE_ESCAPE.is_match(raw)
}

fn decode_utf8_sig(raw: &[u8]) -> Option<String> {
    if is_escaped_ascii(raw) {
        return None;
    }
    let body = raw.strip_prefix(UTF8_BOM).unwrap_or(raw);
    std::str::from_utf8(body).ok().map(str::to_owned)
}

fn decode_utf16(raw: &[u8]) -> Option<String> {
    if is_escaped_ascii(raw) {
        return None;
    }
    transcode_utf16(raw)
}

/// Decodes a whole UTF-16 blob whose byte order is given by a leading BOM.
///
/// Returns `None` without a BOM, for an odd body length or for unpaired
/// surrogates.
pub(super) fn transcode_utf16(raw: &[u8]) -> Option<String> {
    let (encoding, body) = match raw {
        [0xFF, 0xFE, rest @ ..] => (UTF_16LE, rest),
        [0xFE, 0xFF, rest @ ..] => (UTF_16BE, rest),
        _ => return None,
    };
    if body.len() % 2 != 0 {
        return None;
    }
    encoding
        .decode_without_bom_handling_and_without_replacement(body)
        .map(|text| text.into_owned())
}

fn decode_unicode_escape(raw: &[u8]) -> Option<String> {
    if !UNICODE_ESCAPE.is_match(raw) {
        return None;
    }
    unescape(raw)
}

/// Interprets backslash escapes; bytes outside escapes map as Latin-1.
fn unescape(raw: &[u8]) -> Option<String> {
    let mut out = String::with_capacity(raw.len());
    let mut pending_high: Option<u32> = None;
    let mut i = 0;

    while i < raw.len() {
        let byte = raw[i];
        if byte != b'\\' {
            flush_surrogate(&mut out, &mut pending_high);
            out.push(char::from(byte));
            i += 1;
            continue;
        }

        let escape = *raw.get(i + 1)?;
        i += 2;
        let code = match escape {
            b'u' => {
                let code = hex_value(raw.get(i..i + 4)?)?;
                i += 4;
                code
            }
            b'U' => {
                let code = hex_value(raw.get(i..i + 8)?)?;
                i += 8;
                code
            }
            b'x' => {
                let code = hex_value(raw.get(i..i + 2)?)?;
                i += 2;
                code
            }
            b'0'..=b'7' => {
                // Up to three octal digits, the first being `escape` itself.
                let start = i - 1;
                let len = raw[start..]
                    .iter()
                    .take(3)
                    .take_while(|b| matches!(b, b'0'..=b'7'))
                    .count();
                i = start + len;
                raw[start..i]
                    .iter()
                    .fold(0, |code, &digit| code * 8 + u32::from(digit - b'0'))
            }
            b'\n' => {
                // Escaped line break is a continuation.
                flush_surrogate(&mut out, &mut pending_high);
                continue;
            }
            other => {
                flush_surrogate(&mut out, &mut pending_high);
                match simple_escape(other) {
                    Some(c) => out.push(c),
                    None => {
                        out.push('\\');
                        out.push(char::from(other));
                    }
                }
                continue;
            }
        };

        match (pending_high.take(), code) {
            (Some(high), 0xDC00..=0xDFFF) => {
                let combined = 0x10000 + ((high - 0xD800) << 10) + (code - 0xDC00);
                out.push(char::from_u32(combined)?);
            }
            (high, 0xD800..=0xDBFF) => {
                if high.is_some() {
                    out.push(LONE_SURROGATE);
                }
                pending_high = Some(code);
            }
            (high, _) => {
                if high.is_some() {
                    out.push(LONE_SURROGATE);
                }
                out.push(char::from_u32(code).unwrap_or(char::REPLACEMENT_CHARACTER));
            }
        }
    }

    flush_surrogate(&mut out, &mut pending_high);
    Some(out)
}

fn simple_escape(escape: u8) -> Option<char> {
    Some(match escape {
        b'\\' => '\\',
        b'\'' => '\'',
        b'"' => '"',
        b'n' => '\n',
        b'r' => '\r',
        b't' => '\t',
        b'a' => '\u{07}',
        b'b' => '\u{08}',
        b'f' => '\u{0C}',
        b'v' => '\u{0B}',
        _ => return None,
    })
}

fn flush_surrogate(out: &mut String, pending_high: &mut Option<u32>) {
    if pending_high.take().is_some() {
        out.push(LONE_SURROGATE);
    }
}

fn hex_value(digits: &[u8]) -> Option<u32> {
    let digits = std::str::from_utf8(digits).ok()?;
    if !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    u32::from_str_radix(digits, 16).ok()
}
