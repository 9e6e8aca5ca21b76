use bytes::BufMut;
use serde_json::Value;

use super::error::BencodeError;
use super::BValue;

/// Encode a `BValue` into a canonical bencoded `Vec<u8>`.
pub fn encode_bvalue(value: &BValue) -> Vec<u8> {
	let mut out: Vec<u8> = Vec::new();
	encode_to(value, &mut out);
	out
}

/// Append the encoding of `value` to a caller-owned buffer.
///
/// Lets callers reuse one preallocated buffer across many encodes.
pub fn encode_to<B: BufMut>(value: &BValue, out: &mut B) {
	match value {
		BValue::Integer(i) => {
			out.put_u8(b'i');
			out.put_slice(i.to_string().as_bytes());
			out.put_u8(b'e');
		}
		BValue::ByteString(bytes) => put_bytes(bytes, out),
		BValue::List(items) => {
			out.put_u8(b'l');
			for item in items {
				encode_to(item, out);
			}
			out.put_u8(b'e');
		}
		BValue::Dict(dict) => {
			// BTreeMap iterates in byte order of the keys
			out.put_u8(b'd');
			for (key, val) in dict {
				put_bytes(key, out);
				encode_to(val, out);
			}
			out.put_u8(b'e');
		}
	}
}

/// Encode a dynamic JSON value.
///
/// Fails with `UnsupportedType` on null, booleans and non-integral numbers.
pub fn encode_json(value: &Value) -> Result<Vec<u8>, BencodeError> {
	let bvalue = BValue::try_from(value)?;
	Ok(encode_bvalue(&bvalue))
}

fn put_bytes<B: BufMut>(bytes: &[u8], out: &mut B) {
	out.put_slice(bytes.len().to_string().as_bytes());
	out.put_u8(b':');
	out.put_slice(bytes);
}
