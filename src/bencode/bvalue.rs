use std::collections::BTreeMap;

use serde_json::{json, Value};

use super::error::BencodeError;

/// A decoded bencode value.
///
/// Dictionary keys are raw bytes. `BTreeMap` keeps them in byte order, which
/// is the order the encoder has to emit them in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BValue {
	ByteString(Vec<u8>), // raw bytes for any string
	Integer(i64),
	List(Vec<BValue>),
	Dict(BTreeMap<Vec<u8>, BValue>),
}

impl BValue {
	pub fn string(s: &str) -> Self {
		BValue::ByteString(s.as_bytes().to_vec())
	}

	pub fn as_integer(&self) -> Option<i64> {
		match self {
			BValue::Integer(i) => Some(*i),
			_ => None,
		}
	}

	pub fn as_bytes(&self) -> Option<&[u8]> {
		match self {
			BValue::ByteString(b) => Some(b),
			_ => None,
		}
	}

	/// Returns the byte string as UTF-8, or `None` if it is not a string or not valid UTF-8.
	pub fn as_str(&self) -> Option<&str> {
		self.as_bytes().and_then(|b| std::str::from_utf8(b).ok())
	}

	pub fn as_list(&self) -> Option<&[BValue]> {
		match self {
			BValue::List(l) => Some(l),
			_ => None,
		}
	}

	pub fn as_dict(&self) -> Option<&BTreeMap<Vec<u8>, BValue>> {
		match self {
			BValue::Dict(d) => Some(d),
			_ => None,
		}
	}

	pub fn into_dict(self) -> Option<BTreeMap<Vec<u8>, BValue>> {
		match self {
			BValue::Dict(d) => Some(d),
			_ => None,
		}
	}

	/// Looks up `key` if this value is a dictionary.
	pub fn get(&self, key: &[u8]) -> Option<&BValue> {
		self.as_dict()?.get(key)
	}

	/// Looks up a required byte string field.
	/// Fails if the value is not a dictionary, the key is missing, or the value is of the wrong type.
	pub fn lookup_bytes(&self, key: &str) -> Result<&[u8], BencodeError> {
		let val = self.required(key)?;
		val.as_bytes()
			.ok_or_else(|| BencodeError::FieldType(key.to_string()))
	}

	/// Gets a required byte string field and converts it into a UTF-8 `String`.
	pub fn get_string(&self, key: &str) -> Result<String, BencodeError> {
		let bytes = self.lookup_bytes(key)?;
		String::from_utf8(bytes.to_vec())
			.map_err(|_| BencodeError::FieldType(key.to_string()))
	}

	/// Gets a required integer field.
	pub fn get_integer(&self, key: &str) -> Result<i64, BencodeError> {
		let val = self.required(key)?;
		val.as_integer()
			.ok_or_else(|| BencodeError::FieldType(key.to_string()))
	}

	fn required(&self, key: &str) -> Result<&BValue, BencodeError> {
		self.get(key.as_bytes())
			.ok_or_else(|| BencodeError::MissingField(key.to_string()))
	}

	/// Convert into JSON (using Serde JSON `Value`).
	///
	/// - `Integer(i)` => JSON number
	/// - `ByteString(bytes)` => string if UTF-8, otherwise `{"_bytes_hex": "..."}`
	/// - `List(...)` => JSON array
	/// - `Dict(...)` => JSON object, keys decoded lossily
	pub fn to_json(&self) -> Value {
		match self {
			BValue::Integer(i) => json!(i),
			BValue::ByteString(bytes) => match std::str::from_utf8(bytes) {
				Ok(utf8_str) => Value::String(utf8_str.to_string()),
				Err(_) => json!({ "_bytes_hex": hex::encode(bytes) }),
			},
			BValue::List(items) => Value::Array(items.iter().map(BValue::to_json).collect()),
			BValue::Dict(map) => {
				let mut json_map = serde_json::Map::new();
				for (k, v) in map {
					json_map.insert(String::from_utf8_lossy(k).into_owned(), v.to_json());
				}
				Value::Object(json_map)
			}
		}
	}
}

impl TryFrom<&Value> for BValue {
	type Error = BencodeError;

	/// Builds a value from dynamic JSON. Bencode has no null, boolean or
	/// floating point type, so those fail with `UnsupportedType`.
	fn try_from(value: &Value) -> Result<Self, Self::Error> {
		match value {
			Value::Number(n) => n
				.as_i64()
				.map(BValue::Integer)
				.ok_or_else(|| BencodeError::UnsupportedType(format!("number {}", n))),
			Value::String(s) => Ok(BValue::string(s)),
			Value::Array(items) => items
				.iter()
				.map(BValue::try_from)
				.collect::<Result<Vec<_>, _>>()
				.map(BValue::List),
			Value::Object(map) => {
				let mut dict = BTreeMap::new();
				for (k, v) in map {
					dict.insert(k.as_bytes().to_vec(), BValue::try_from(v)?);
				}
				Ok(BValue::Dict(dict))
			}
			Value::Null => Err(BencodeError::UnsupportedType("null".to_string())),
			Value::Bool(b) => Err(BencodeError::UnsupportedType(format!("bool {}", b))),
		}
	}
}

impl From<i64> for BValue {
	fn from(i: i64) -> Self {
		BValue::Integer(i)
	}
}

impl From<&str> for BValue {
	fn from(s: &str) -> Self {
		BValue::string(s)
	}
}

impl From<String> for BValue {
	fn from(s: String) -> Self {
		BValue::ByteString(s.into_bytes())
	}
}

impl From<&[u8]> for BValue {
	fn from(b: &[u8]) -> Self {
		BValue::ByteString(b.to_vec())
	}
}

impl From<Vec<u8>> for BValue {
	fn from(b: Vec<u8>) -> Self {
		BValue::ByteString(b)
	}
}

impl From<Vec<BValue>> for BValue {
	fn from(l: Vec<BValue>) -> Self {
		BValue::List(l)
	}
}

impl From<BTreeMap<Vec<u8>, BValue>> for BValue {
	fn from(d: BTreeMap<Vec<u8>, BValue>) -> Self {
		BValue::Dict(d)
	}
}
