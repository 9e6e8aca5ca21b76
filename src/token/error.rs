use thiserror::Error;

use super::algorithm::Algorithm;

#[derive(Debug, Error)]
pub enum TokenError {
	#[error("HMAC secret is {actual} bytes, at least {min} required")]
	KeyTooShort { actual: usize, min: usize },

	#[error("RSA modulus is {actual} bits, at least {min} required")]
	KeyTooSmall { actual: usize, min: usize },

	#[error("{alg} needs a {expected} key, got {actual}")]
	CurveMismatch {
		alg: Algorithm,
		expected: &'static str,
		actual: &'static str,
	},

	#[error("Algorithm {0} is not supported by this key")]
	UnsupportedAlgorithm(Algorithm),

	#[error("Token is signed with {token}, verifier expects {expected}")]
	AlgorithmMismatch { expected: Algorithm, token: Algorithm },

	#[error("Signature mismatch")]
	SignatureMismatch,

	#[error("Malformed token: {0}")]
	MalformedToken(String),

	#[error("Base64 error: {0}")]
	Base64(#[from] base64::DecodeError),

	#[error("JSON error: {0}")]
	Json(#[from] serde_json::Error),

	#[error("Crypto error: {0}")]
	Crypto(String),

	#[error("Token expired at {exp} (now {now})")]
	Expired { exp: i64, now: i64 },

	#[error("Token not valid before {nbf} (now {now})")]
	NotYetValid { nbf: i64, now: i64 },

	#[error("Issuer not accepted")]
	InvalidIssuer,

	#[error("Audience not accepted")]
	InvalidAudience,
}
