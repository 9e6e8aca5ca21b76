use std::collections::BTreeMap;
use std::io::Read;
use std::num::IntErrorKind;

use log::{debug, trace};

use super::error::BencodeError;
use crate::bencode::bvalue::BValue;
use crate::config::BencodeConfig;

/// Nesting limit used when no configuration is supplied.
pub const DEFAULT_MAX_DEPTH: usize = 256;

/// Largest stream `decode_reader` will buffer when no configuration is supplied.
pub const DEFAULT_MAX_INPUT_LEN: usize = 64 << 20;

/// Decodes a single value from the front of `input`.
///
/// Returns the number of bytes consumed along with the value; anything after
/// it is left for the caller.
pub fn decode_bencode(input: &[u8]) -> Result<(usize, BValue), BencodeError> {
	Decoder::new().decode_prefix(input)
}

/// Decodes `input` as exactly one value. Trailing bytes are an error.
pub fn decode(input: &[u8]) -> Result<BValue, BencodeError> {
	Decoder::new().decode(input)
}

/// Configurable decoder.
#[derive(Debug, Clone, Copy)]
pub struct Decoder {
	max_depth: usize,
	max_input_len: usize,
	allow_trailing: bool,
	require_sorted_keys: bool,
}

impl Default for Decoder {
	fn default() -> Self {
		Self {
			max_depth: DEFAULT_MAX_DEPTH,
			max_input_len: DEFAULT_MAX_INPUT_LEN,
			allow_trailing: false,
			require_sorted_keys: false,
		}
	}
}

impl From<&BencodeConfig> for Decoder {
	fn from(config: &BencodeConfig) -> Self {
		Self {
			max_depth: config.max_depth,
			max_input_len: config.max_input_len,
			allow_trailing: config.allow_trailing_data,
			require_sorted_keys: config.require_sorted_keys,
		}
	}
}

impl Decoder {
	pub fn new() -> Self {
		Self::default()
	}

	/// Maximum container nesting. A top-level list counts as depth 1.
	pub fn max_depth(mut self, depth: usize) -> Self {
		self.max_depth = depth;
		self
	}

	/// Maximum number of bytes `decode_reader` accepts from a stream.
	pub fn max_input_len(mut self, len: usize) -> Self {
		self.max_input_len = len;
		self
	}

	pub fn allow_trailing(mut self, allow: bool) -> Self {
		self.allow_trailing = allow;
		self
	}

	/// Reject dictionaries whose keys are not strictly ascending.
	pub fn require_sorted_keys(mut self, require: bool) -> Self {
		self.require_sorted_keys = require;
		self
	}

	/// Decodes one value from the front of `input`, returning bytes consumed.
	pub fn decode_prefix(&self, input: &[u8]) -> Result<(usize, BValue), BencodeError> {
		let mut cursor = Cursor {
			input,
			pos: 0,
			opts: self,
		};
		let value = cursor.value(0)?;
		Ok((cursor.pos, value))
	}

	/// Decodes `input` as one value, honoring the trailing data setting.
	pub fn decode(&self, input: &[u8]) -> Result<BValue, BencodeError> {
		let (consumed, value) = self.decode_prefix(input)?;
		if consumed != input.len() && !self.allow_trailing {
			return Err(BencodeError::TrailingData(input.len() - consumed));
		}
		Ok(value)
	}

	/// Reads `reader` to the end, then decodes the bytes.
	///
	/// Streams longer than `max_input_len` fail with `InputTooLarge` without
	/// being buffered past the limit.
	pub fn decode_reader<R: Read>(&self, reader: R) -> Result<BValue, BencodeError> {
		let limit = self.max_input_len as u64;
		let mut buf = Vec::new();
		reader.take(limit.saturating_add(1)).read_to_end(&mut buf)?;
		if buf.len() > self.max_input_len {
			debug!("bencode stream exceeds {} bytes", self.max_input_len);
			return Err(BencodeError::InputTooLarge(self.max_input_len));
		}
		self.decode(&buf)
	}
}

struct Cursor<'a> {
	input: &'a [u8],
	pos: usize,
	opts: &'a Decoder,
}

impl<'a> Cursor<'a> {
	fn peek(&self) -> Option<u8> {
		self.input.get(self.pos).copied()
	}

	fn value(&mut self, depth: usize) -> Result<BValue, BencodeError> {
		match self.peek() {
			None => Err(BencodeError::TruncatedInput),
			Some(b'i') => self.integer(),
			Some(b'l') => self.list(depth + 1),
			Some(b'd') => self.dict(depth + 1),
			Some(c) if c.is_ascii_digit() => self.string().map(BValue::ByteString),
			Some(c) => Err(BencodeError::InvalidPrefix(c)),
		}
	}

	fn enter(&self, depth: usize) -> Result<(), BencodeError> {
		if depth > self.opts.max_depth {
			debug!("bencode nesting limit {} hit at offset {}", self.opts.max_depth, self.pos);
			return Err(BencodeError::DepthExceeded(self.opts.max_depth));
		}
		Ok(())
	}

	/// `i<digits>e`
	fn integer(&mut self) -> Result<BValue, BencodeError> {
		let start = self.pos + 1; // skip 'i'
		let rest = &self.input[start..];
		let end = rest
			.iter()
			.position(|&b| b == b'e')
			.ok_or(BencodeError::TruncatedInput)?;
		let digits = &rest[..end];

		let num_str = std::str::from_utf8(digits)
			.map_err(|_| BencodeError::MalformedInteger("non-ASCII data".to_string()))?;
		validate_integer(num_str)?;

		let parsed = num_str
			.parse::<i64>()
			.map_err(|e| BencodeError::MalformedInteger(format!("{}: {}", num_str, e)))?;

		// add 1 to account for 'e'
		self.pos = start + end + 1;
		Ok(BValue::Integer(parsed))
	}

	/// `<length>:<bytes>`
	fn string(&mut self) -> Result<Vec<u8>, BencodeError> {
		let rest = &self.input[self.pos..];
		let colon = rest
			.iter()
			.position(|&b| b == b':')
			.ok_or(BencodeError::TruncatedInput)?;

		let len_str = std::str::from_utf8(&rest[..colon])
			.map_err(|_| BencodeError::InvalidStringLength("non-ASCII length".to_string()))?;
		if len_str.is_empty()
			|| !len_str.bytes().all(|b| b.is_ascii_digit())
			|| (len_str.len() > 1 && len_str.starts_with('0'))
		{
			return Err(BencodeError::InvalidStringLength(len_str.to_string()));
		}
		// a length too large for usize can never fit in the remaining input
		let length = len_str.parse::<usize>().map_err(|e| match e.kind() {
			IntErrorKind::PosOverflow => BencodeError::TruncatedInput,
			_ => BencodeError::InvalidStringLength(format!("{}: {}", len_str, e)),
		})?;

		let data_start = colon + 1;
		let available = rest.len() - data_start;
		if length > available {
			trace!("string declares {} bytes, {} remain", length, available);
			return Err(BencodeError::TruncatedInput);
		}

		let data = rest[data_start..data_start + length].to_vec();
		self.pos += data_start + length;
		Ok(data)
	}

	/// `l<items>e`
	fn list(&mut self, depth: usize) -> Result<BValue, BencodeError> {
		self.enter(depth)?;
		self.pos += 1; // skip 'l'
		let mut items = Vec::new();

		loop {
			match self.peek() {
				None => return Err(BencodeError::UnterminatedContainer),
				Some(b'e') => break,
				Some(_) => items.push(self.value(depth)?),
			}
		}

		self.pos += 1;
		Ok(BValue::List(items))
	}

	/// `d<key><value>...e`
	fn dict(&mut self, depth: usize) -> Result<BValue, BencodeError> {
		self.enter(depth)?;
		self.pos += 1; // skip 'd'
		let mut map = BTreeMap::new();
		let mut last_key: Option<Vec<u8>> = None;

		loop {
			let key = match self.peek() {
				None => return Err(BencodeError::UnterminatedContainer),
				Some(b'e') => break,
				Some(c) if c.is_ascii_digit() => self.string()?,
				Some(_) => return Err(BencodeError::InvalidKey),
			};

			if map.contains_key(&key) {
				return Err(BencodeError::DuplicateKey(String::from_utf8_lossy(&key).into_owned()));
			}
			if self.opts.require_sorted_keys {
				if let Some(prev) = &last_key {
					if key < *prev {
						return Err(BencodeError::UnsortedKeys(
							String::from_utf8_lossy(&key).into_owned(),
						));
					}
				}
				last_key = Some(key.clone());
			}

			if self.peek().is_none() {
				return Err(BencodeError::UnterminatedContainer);
			}
			let value = self.value(depth)?;
			map.insert(key, value);
		}

		self.pos += 1;
		Ok(BValue::Dict(map))
	}
}

fn validate_integer(num_str: &str) -> Result<(), BencodeError> {
	let digits = num_str.strip_prefix('-').unwrap_or(num_str);
	if digits.is_empty() {
		return Err(BencodeError::MalformedInteger("empty digit run".to_string()));
	}
	if !digits.bytes().all(|b| b.is_ascii_digit()) {
		return Err(BencodeError::MalformedInteger(num_str.to_string()));
	}
	if num_str == "-0" {
		return Err(BencodeError::MalformedInteger("negative zero".to_string()));
	}
	// Leading zeros not allowed
	if digits.len() > 1 && digits.starts_with('0') {
		return Err(BencodeError::MalformedInteger(format!(
			"Leading zeros are not allowed: {}",
			num_str
		)));
	}
	Ok(())
}
