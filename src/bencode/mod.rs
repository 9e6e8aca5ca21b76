//! Bencode codec.
//!
//! | Type | Format | Example |
//! |------|--------|---------|
//! | Integer | `i<number>e` | `i42e` |
//! | Byte String | `<length>:<data>` | `4:spam` |
//! | List | `l<items>e` | `l4:spami42ee` |
//! | Dictionary | `d<key><value>...e` | `d3:foo3:bare` |
//!
//! Encoding is always canonical (dictionary keys sorted by bytes). Decoding
//! accepts unsorted keys unless the decoder is told otherwise.

pub mod bvalue;
pub mod decode;
pub mod encode;
pub mod error;

pub use bvalue::BValue;   // re-export
pub use decode::{decode, decode_bencode, Decoder, DEFAULT_MAX_DEPTH, DEFAULT_MAX_INPUT_LEN};   // re-export
pub use encode::{encode_bvalue, encode_json, encode_to};   // re-export
pub use error::BencodeError;
