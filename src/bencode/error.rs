use thiserror::Error;

#[derive(Debug, Error)]
pub enum BencodeError {
	#[error("Unsupported type: {0}")]
	UnsupportedType(String),

	#[error("Invalid prefix byte 0x{0:02x}")]
	InvalidPrefix(u8),

	#[error("Malformed integer: {0}")]
	MalformedInteger(String),

	#[error("Invalid string length: {0}")]
	InvalidStringLength(String),

	#[error("Truncated input")]
	TruncatedInput,

	#[error("Unterminated container (missing 'e')")]
	UnterminatedContainer,

	#[error("Dictionary key must be a byte string")]
	InvalidKey,

	#[error("Duplicate dictionary key {0:?}")]
	DuplicateKey(String),

	#[error("Dictionary keys not in sorted order at {0:?}")]
	UnsortedKeys(String),

	#[error("Nesting deeper than {0} levels")]
	DepthExceeded(usize),

	#[error("Input larger than {0} bytes")]
	InputTooLarge(usize),

	#[error("{0} trailing bytes after value")]
	TrailingData(usize),

	#[error("Missing '{0}'")]
	MissingField(String),

	#[error("'{0}' has the wrong type")]
	FieldType(String),

	#[error("I/O error: {0}")]
	Io(#[from] std::io::Error),
}
