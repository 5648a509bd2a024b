//! CSV handler module
//!
//! Converts comma-separated bytes of unknown encoding into ordered records
//! and back into UTF-8 CSV.

pub mod encoding;
pub mod reader;
pub mod record;
pub mod writer;

pub use encoding::{
    decode_bytes, decode_text, decode_with, fix_nbsp, Decoded, EncodingCandidate,
    ENCODING_CANDIDATES,
};
pub use reader::{decode_table, decode_table_bytes};
pub use record::{table_from_json, RawData, Record, Table};
pub use writer::{encode_table, EncodeOptions};
