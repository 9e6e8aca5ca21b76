use std::fmt;

use hmac::digest::KeyInit;
use hmac::{Hmac, Mac};
use log::warn;
use sha2::{Sha256, Sha384, Sha512};
use subtle::ConstantTimeEq;
use zeroize::Zeroizing;

use super::algorithm::{Algorithm, Family};
use super::error::TokenError;
use super::signer::{KeyPolicy, Signer, Verifier};

/// Shared secret for HS256/HS384/HS512. The same key signs and verifies.
#[derive(Clone)]
pub struct HmacKey {
	alg: Algorithm,
	secret: Zeroizing<Vec<u8>>,
}

impl HmacKey {
	pub fn new(alg: Algorithm, secret: &[u8]) -> Result<Self, TokenError> {
		Self::with_policy(alg, secret, &KeyPolicy::default())
	}

	pub fn with_policy(alg: Algorithm, secret: &[u8], policy: &KeyPolicy) -> Result<Self, TokenError> {
		if alg.family() != Family::Hmac {
			return Err(TokenError::UnsupportedAlgorithm(alg));
		}
		if secret.len() < policy.min_hmac_secret_len {
			warn!("rejecting {} byte HMAC secret", secret.len());
			return Err(TokenError::KeyTooShort {
				actual: secret.len(),
				min: policy.min_hmac_secret_len,
			});
		}
		Ok(Self {
			alg,
			secret: Zeroizing::new(secret.to_vec()),
		})
	}

	fn tag(&self, input: &[u8]) -> Result<Vec<u8>, TokenError> {
		match self.alg {
			Algorithm::HS256 => compute::<Hmac<Sha256>>(&self.secret, input),
			Algorithm::HS384 => compute::<Hmac<Sha384>>(&self.secret, input),
			Algorithm::HS512 => compute::<Hmac<Sha512>>(&self.secret, input),
			other => Err(TokenError::UnsupportedAlgorithm(other)),
		}
	}
}

fn compute<M: Mac + KeyInit>(secret: &[u8], input: &[u8]) -> Result<Vec<u8>, TokenError> {
	let mut mac = <M as KeyInit>::new_from_slice(secret)
		.map_err(|e| TokenError::Crypto(e.to_string()))?;
	mac.update(input);
	Ok(mac.finalize().into_bytes().to_vec())
}

impl fmt::Debug for HmacKey {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("HmacKey")
			.field("alg", &self.alg)
			.field("secret", &"<redacted>")
			.finish()
	}
}

impl Signer for HmacKey {
	fn algorithm(&self) -> Algorithm {
		self.alg
	}

	fn sign(&self, signing_input: &[u8]) -> Result<Vec<u8>, TokenError> {
		self.tag(signing_input)
	}
}

impl Verifier for HmacKey {
	fn algorithm(&self) -> Algorithm {
		self.alg
	}

	fn verify(&self, signing_input: &[u8], signature: &[u8]) -> Result<(), TokenError> {
		let expected = self.tag(signing_input)?;
		if bool::from(expected.as_slice().ct_eq(signature)) {
			Ok(())
		} else {
			Err(TokenError::SignatureMismatch)
		}
	}
}
