use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::error::TokenError;

/// Signature algorithms, named as they appear in the `alg` header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Algorithm {
	HS256,
	HS384,
	HS512,
	RS256,
	RS384,
	RS512,
	PS256,
	PS384,
	PS512,
	ES256,
	ES384,
	ES512,
	EdDSA,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Family {
	Hmac,
	RsaPkcs1,
	RsaPss,
	Ecdsa,
	EdDsa,
}

impl Algorithm {
	pub const ALL: [Algorithm; 13] = [
		Algorithm::HS256,
		Algorithm::HS384,
		Algorithm::HS512,
		Algorithm::RS256,
		Algorithm::RS384,
		Algorithm::RS512,
		Algorithm::PS256,
		Algorithm::PS384,
		Algorithm::PS512,
		Algorithm::ES256,
		Algorithm::ES384,
		Algorithm::ES512,
		Algorithm::EdDSA,
	];

	pub fn as_str(&self) -> &'static str {
		match self {
			Algorithm::HS256 => "HS256",
			Algorithm::HS384 => "HS384",
			Algorithm::HS512 => "HS512",
			Algorithm::RS256 => "RS256",
			Algorithm::RS384 => "RS384",
			Algorithm::RS512 => "RS512",
			Algorithm::PS256 => "PS256",
			Algorithm::PS384 => "PS384",
			Algorithm::PS512 => "PS512",
			Algorithm::ES256 => "ES256",
			Algorithm::ES384 => "ES384",
			Algorithm::ES512 => "ES512",
			Algorithm::EdDSA => "EdDSA",
		}
	}

	pub fn family(&self) -> Family {
		match self {
			Algorithm::HS256 | Algorithm::HS384 | Algorithm::HS512 => Family::Hmac,
			Algorithm::RS256 | Algorithm::RS384 | Algorithm::RS512 => Family::RsaPkcs1,
			Algorithm::PS256 | Algorithm::PS384 | Algorithm::PS512 => Family::RsaPss,
			Algorithm::ES256 | Algorithm::ES384 | Algorithm::ES512 => Family::Ecdsa,
			Algorithm::EdDSA => Family::EdDsa,
		}
	}

	/// Whether two signatures over the same input with the same key are always identical.
	pub fn is_deterministic(&self) -> bool {
		// PSS salts are random; P-521 signing draws a random nonce instead of using RFC 6979
		!(self.family() == Family::RsaPss || *self == Algorithm::ES512)
	}
}

impl fmt::Display for Algorithm {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

impl FromStr for Algorithm {
	type Err = TokenError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		Algorithm::ALL
			.into_iter()
			.find(|alg| alg.as_str() == s)
			.ok_or_else(|| TokenError::MalformedToken(format!("unknown algorithm '{}'", s)))
	}
}
