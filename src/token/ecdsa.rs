use signature::{Signer as _, Verifier as _};

use super::algorithm::Algorithm;
use super::error::TokenError;
use super::signer::{Signer, Verifier};

/// ECDSA private key on one of the supported NIST curves.
pub enum EcdsaSigningKey {
	P256(p256::ecdsa::SigningKey),
	P384(p384::ecdsa::SigningKey),
	P521(p521::ecdsa::SigningKey),
}

pub enum EcdsaVerifyingKey {
	P256(p256::ecdsa::VerifyingKey),
	P384(p384::ecdsa::VerifyingKey),
	P521(p521::ecdsa::VerifyingKey),
}

impl EcdsaSigningKey {
	pub fn curve(&self) -> &'static str {
		match self {
			EcdsaSigningKey::P256(_) => "P-256",
			EcdsaSigningKey::P384(_) => "P-384",
			EcdsaSigningKey::P521(_) => "P-521",
		}
	}

	pub fn verifying_key(&self) -> EcdsaVerifyingKey {
		match self {
			EcdsaSigningKey::P256(k) => EcdsaVerifyingKey::P256(k.verifying_key().clone()),
			EcdsaSigningKey::P384(k) => EcdsaVerifyingKey::P384(k.verifying_key().clone()),
			EcdsaSigningKey::P521(k) => EcdsaVerifyingKey::P521(p521::ecdsa::VerifyingKey::from(k)),
		}
	}
}

impl EcdsaVerifyingKey {
	pub fn curve(&self) -> &'static str {
		match self {
			EcdsaVerifyingKey::P256(_) => "P-256",
			EcdsaVerifyingKey::P384(_) => "P-384",
			EcdsaVerifyingKey::P521(_) => "P-521",
		}
	}
}

impl From<p256::ecdsa::SigningKey> for EcdsaSigningKey {
	fn from(k: p256::ecdsa::SigningKey) -> Self {
		EcdsaSigningKey::P256(k)
	}
}

impl From<p384::ecdsa::SigningKey> for EcdsaSigningKey {
	fn from(k: p384::ecdsa::SigningKey) -> Self {
		EcdsaSigningKey::P384(k)
	}
}

impl From<p521::ecdsa::SigningKey> for EcdsaSigningKey {
	fn from(k: p521::ecdsa::SigningKey) -> Self {
		EcdsaSigningKey::P521(k)
	}
}

impl From<p256::ecdsa::VerifyingKey> for EcdsaVerifyingKey {
	fn from(k: p256::ecdsa::VerifyingKey) -> Self {
		EcdsaVerifyingKey::P256(k)
	}
}

impl From<p384::ecdsa::VerifyingKey> for EcdsaVerifyingKey {
	fn from(k: p384::ecdsa::VerifyingKey) -> Self {
		EcdsaVerifyingKey::P384(k)
	}
}

impl From<p521::ecdsa::VerifyingKey> for EcdsaVerifyingKey {
	fn from(k: p521::ecdsa::VerifyingKey) -> Self {
		EcdsaVerifyingKey::P521(k)
	}
}

fn expected_curve(alg: Algorithm) -> Result<&'static str, TokenError> {
	match alg {
		Algorithm::ES256 => Ok("P-256"),
		Algorithm::ES384 => Ok("P-384"),
		Algorithm::ES512 => Ok("P-521"),
		other => Err(TokenError::UnsupportedAlgorithm(other)),
	}
}

fn check_curve(alg: Algorithm, actual: &'static str) -> Result<(), TokenError> {
	let expected = expected_curve(alg)?;
	if expected != actual {
		return Err(TokenError::CurveMismatch { alg, expected, actual });
	}
	Ok(())
}

/// ES256/ES384/ES512. Signatures are the fixed-size `r || s` encoding.
/// ES256 and ES384 use RFC 6979 nonces and are deterministic; ES512 draws a
/// random nonce, so its signatures differ from call to call.
pub struct EcdsaSigner {
	alg: Algorithm,
	key: EcdsaSigningKey,
}

pub struct EcdsaVerifier {
	alg: Algorithm,
	key: EcdsaVerifyingKey,
}

impl EcdsaSigner {
	pub fn new(alg: Algorithm, key: impl Into<EcdsaSigningKey>) -> Result<Self, TokenError> {
		let key = key.into();
		check_curve(alg, key.curve())?;
		Ok(Self { alg, key })
	}

	pub fn verifier(&self) -> EcdsaVerifier {
		EcdsaVerifier {
			alg: self.alg,
			key: self.key.verifying_key(),
		}
	}
}

impl EcdsaVerifier {
	pub fn new(alg: Algorithm, key: impl Into<EcdsaVerifyingKey>) -> Result<Self, TokenError> {
		let key = key.into();
		check_curve(alg, key.curve())?;
		Ok(Self { alg, key })
	}
}

fn crypto(e: signature::Error) -> TokenError {
	TokenError::Crypto(e.to_string())
}

impl Signer for EcdsaSigner {
	fn algorithm(&self) -> Algorithm {
		self.alg
	}

	fn sign(&self, signing_input: &[u8]) -> Result<Vec<u8>, TokenError> {
		let sig = match &self.key {
			EcdsaSigningKey::P256(k) => {
				let sig: p256::ecdsa::Signature = k.try_sign(signing_input).map_err(crypto)?;
				sig.to_bytes().to_vec()
			}
			EcdsaSigningKey::P384(k) => {
				let sig: p384::ecdsa::Signature = k.try_sign(signing_input).map_err(crypto)?;
				sig.to_bytes().to_vec()
			}
			EcdsaSigningKey::P521(k) => {
				let sig: p521::ecdsa::Signature = k.try_sign(signing_input).map_err(crypto)?;
				sig.to_bytes().to_vec()
			}
		};
		Ok(sig)
	}
}

impl Verifier for EcdsaVerifier {
	fn algorithm(&self) -> Algorithm {
		self.alg
	}

	fn verify(&self, signing_input: &[u8], signature: &[u8]) -> Result<(), TokenError> {
		let ok = match &self.key {
			EcdsaVerifyingKey::P256(k) => p256::ecdsa::Signature::from_slice(signature)
				.is_ok_and(|s| k.verify(signing_input, &s).is_ok()),
			EcdsaVerifyingKey::P384(k) => p384::ecdsa::Signature::from_slice(signature)
				.is_ok_and(|s| k.verify(signing_input, &s).is_ok()),
			EcdsaVerifyingKey::P521(k) => p521::ecdsa::Signature::from_slice(signature)
				.is_ok_and(|s| k.verify(signing_input, &s).is_ok()),
		};
		if ok {
			Ok(())
		} else {
			Err(TokenError::SignatureMismatch)
		}
	}
}
