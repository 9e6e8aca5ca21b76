use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use std::time::{SystemTime, UNIX_EPOCH};

/// Unpadded base64url, as used for every token segment.
pub fn encode_segment(bytes: &[u8]) -> String {
	URL_SAFE_NO_PAD.encode(bytes)
}

/// Appends the unpadded base64url form of `bytes` to `out`.
pub fn encode_segment_into(bytes: &[u8], out: &mut String) {
	URL_SAFE_NO_PAD.encode_string(bytes, out)
}

/// Rejects padding and non-canonical trailing bits.
pub fn decode_segment(segment: &str) -> Result<Vec<u8>, base64::DecodeError> {
	URL_SAFE_NO_PAD.decode(segment)
}

/// Seconds since the Unix epoch. A clock set before 1970 reads as 0.
pub fn unix_now() -> i64 {
	SystemTime::now()
		.duration_since(UNIX_EPOCH)
		.map(|d| d.as_secs() as i64)
		.unwrap_or(0)
}
