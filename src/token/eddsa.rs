use ed25519_dalek::{Signature, SigningKey, VerifyingKey};
use signature::Signer as _;

use super::algorithm::Algorithm;
use super::error::TokenError;
use super::signer::{Signer, Verifier};

/// EdDSA over Ed25519. Signatures are deterministic.
pub struct EdDsaSigner {
	key: SigningKey,
}

pub struct EdDsaVerifier {
	key: VerifyingKey,
}

impl EdDsaSigner {
	pub fn new(key: SigningKey) -> Self {
		Self { key }
	}

	/// Create from secret seed (32 bytes).
	pub fn from_seed(seed: &[u8; 32]) -> Self {
		Self::new(SigningKey::from_bytes(seed))
	}

	pub fn verifier(&self) -> EdDsaVerifier {
		EdDsaVerifier::new(self.key.verifying_key())
	}
}

impl EdDsaVerifier {
	pub fn new(key: VerifyingKey) -> Self {
		Self { key }
	}

	pub fn from_bytes(bytes: &[u8; 32]) -> Result<Self, TokenError> {
		let key = VerifyingKey::from_bytes(bytes)
			.map_err(|e| TokenError::Crypto(format!("invalid Ed25519 public key: {}", e)))?;
		Ok(Self::new(key))
	}
}

impl Signer for EdDsaSigner {
	fn algorithm(&self) -> Algorithm {
		Algorithm::EdDSA
	}

	fn sign(&self, signing_input: &[u8]) -> Result<Vec<u8>, TokenError> {
		let sig: Signature = self
			.key
			.try_sign(signing_input)
			.map_err(|e| TokenError::Crypto(e.to_string()))?;
		Ok(sig.to_bytes().to_vec())
	}
}

impl Verifier for EdDsaVerifier {
	fn algorithm(&self) -> Algorithm {
		Algorithm::EdDSA
	}

	fn verify(&self, signing_input: &[u8], signature: &[u8]) -> Result<(), TokenError> {
		let sig = Signature::from_slice(signature).map_err(|_| TokenError::SignatureMismatch)?;
		self.key
			.verify_strict(signing_input, &sig)
			.map_err(|_| TokenError::SignatureMismatch)
	}
}
