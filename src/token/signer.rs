use super::algorithm::Algorithm;
use super::error::TokenError;
use crate::config::TokenConfig;

/// Produces the signature over a token's signing input
/// (`base64url(header) "." base64url(payload)`).
pub trait Signer: Send + Sync {
	fn algorithm(&self) -> Algorithm;

	fn sign(&self, signing_input: &[u8]) -> Result<Vec<u8>, TokenError>;
}

/// Checks a signature over a token's signing input.
pub trait Verifier: Send + Sync {
	fn algorithm(&self) -> Algorithm;

	/// Fails with `SignatureMismatch` unless `signature` is valid for `signing_input`.
	fn verify(&self, signing_input: &[u8], signature: &[u8]) -> Result<(), TokenError>;
}

/// Minimum key strength accepted when building signers and verifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyPolicy {
	pub min_hmac_secret_len: usize,
	pub min_rsa_modulus_bits: usize,
}

impl Default for KeyPolicy {
	fn default() -> Self {
		Self::from(&TokenConfig::default())
	}
}

impl From<&TokenConfig> for KeyPolicy {
	fn from(config: &TokenConfig) -> Self {
		Self {
			min_hmac_secret_len: config.min_hmac_secret_len,
			min_rsa_modulus_bits: config.min_rsa_modulus_bits,
		}
	}
}
