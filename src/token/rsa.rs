use log::warn;
use rsa::traits::PublicKeyParts;
use rsa::{pkcs1v15, pss, RsaPrivateKey, RsaPublicKey};
use sha2::{Sha256, Sha384, Sha512};
use signature::{RandomizedSigner, SignatureEncoding, Signer as _, Verifier as _};

use super::algorithm::{Algorithm, Family};
use super::error::TokenError;
use super::signer::{KeyPolicy, Signer, Verifier};

enum SigningKey {
	Rs256(pkcs1v15::SigningKey<Sha256>),
	Rs384(pkcs1v15::SigningKey<Sha384>),
	Rs512(pkcs1v15::SigningKey<Sha512>),
	Ps256(pss::SigningKey<Sha256>),
	Ps384(pss::SigningKey<Sha384>),
	Ps512(pss::SigningKey<Sha512>),
}

enum VerifyingKey {
	Rs256(pkcs1v15::VerifyingKey<Sha256>),
	Rs384(pkcs1v15::VerifyingKey<Sha384>),
	Rs512(pkcs1v15::VerifyingKey<Sha512>),
	Ps256(pss::VerifyingKey<Sha256>),
	Ps384(pss::VerifyingKey<Sha384>),
	Ps512(pss::VerifyingKey<Sha512>),
}

/// RS256/384/512 (PKCS#1 v1.5) and PS256/384/512 (PSS, salt length equal to the hash length).
pub struct RsaSigner {
	alg: Algorithm,
	public: RsaPublicKey,
	key: SigningKey,
}

pub struct RsaVerifier {
	alg: Algorithm,
	key: VerifyingKey,
}

fn check_modulus<K: PublicKeyParts>(key: &K, policy: &KeyPolicy) -> Result<(), TokenError> {
	let bits = key.size() * 8;
	if bits < policy.min_rsa_modulus_bits {
		warn!("rejecting {} bit RSA key", bits);
		return Err(TokenError::KeyTooSmall {
			actual: bits,
			min: policy.min_rsa_modulus_bits,
		});
	}
	Ok(())
}

fn check_family(alg: Algorithm) -> Result<(), TokenError> {
	match alg.family() {
		Family::RsaPkcs1 | Family::RsaPss => Ok(()),
		_ => Err(TokenError::UnsupportedAlgorithm(alg)),
	}
}

impl RsaSigner {
	pub fn new(alg: Algorithm, key: RsaPrivateKey) -> Result<Self, TokenError> {
		Self::with_policy(alg, key, &KeyPolicy::default())
	}

	pub fn with_policy(alg: Algorithm, key: RsaPrivateKey, policy: &KeyPolicy) -> Result<Self, TokenError> {
		check_family(alg)?;
		check_modulus(&key, policy)?;
		let public = key.to_public_key();
		let key = match alg {
			Algorithm::RS256 => SigningKey::Rs256(pkcs1v15::SigningKey::new(key)),
			Algorithm::RS384 => SigningKey::Rs384(pkcs1v15::SigningKey::new(key)),
			Algorithm::RS512 => SigningKey::Rs512(pkcs1v15::SigningKey::new(key)),
			Algorithm::PS256 => SigningKey::Ps256(pss::SigningKey::new(key)),
			Algorithm::PS384 => SigningKey::Ps384(pss::SigningKey::new(key)),
			Algorithm::PS512 => SigningKey::Ps512(pss::SigningKey::new(key)),
			other => return Err(TokenError::UnsupportedAlgorithm(other)),
		};
		Ok(Self { alg, public, key })
	}

	/// Verifier for the public half of this key.
	pub fn verifier(&self) -> Result<RsaVerifier, TokenError> {
		let policy = KeyPolicy {
			min_rsa_modulus_bits: 0,
			..KeyPolicy::default()
		};
		RsaVerifier::with_policy(self.alg, self.public.clone(), &policy)
	}
}

impl RsaVerifier {
	pub fn new(alg: Algorithm, key: RsaPublicKey) -> Result<Self, TokenError> {
		Self::with_policy(alg, key, &KeyPolicy::default())
	}

	pub fn with_policy(alg: Algorithm, key: RsaPublicKey, policy: &KeyPolicy) -> Result<Self, TokenError> {
		check_family(alg)?;
		check_modulus(&key, policy)?;
		let key = match alg {
			Algorithm::RS256 => VerifyingKey::Rs256(pkcs1v15::VerifyingKey::new(key)),
			Algorithm::RS384 => VerifyingKey::Rs384(pkcs1v15::VerifyingKey::new(key)),
			Algorithm::RS512 => VerifyingKey::Rs512(pkcs1v15::VerifyingKey::new(key)),
			Algorithm::PS256 => VerifyingKey::Ps256(pss::VerifyingKey::new(key)),
			Algorithm::PS384 => VerifyingKey::Ps384(pss::VerifyingKey::new(key)),
			Algorithm::PS512 => VerifyingKey::Ps512(pss::VerifyingKey::new(key)),
			other => return Err(TokenError::UnsupportedAlgorithm(other)),
		};
		Ok(Self { alg, key })
	}
}

fn crypto(e: signature::Error) -> TokenError {
	TokenError::Crypto(e.to_string())
}

impl Signer for RsaSigner {
	fn algorithm(&self) -> Algorithm {
		self.alg
	}

	fn sign(&self, signing_input: &[u8]) -> Result<Vec<u8>, TokenError> {
		let mut rng = rand::thread_rng();
		let sig = match &self.key {
			SigningKey::Rs256(k) => k.try_sign(signing_input).map_err(crypto)?.to_vec(),
			SigningKey::Rs384(k) => k.try_sign(signing_input).map_err(crypto)?.to_vec(),
			SigningKey::Rs512(k) => k.try_sign(signing_input).map_err(crypto)?.to_vec(),
			SigningKey::Ps256(k) => k.try_sign_with_rng(&mut rng, signing_input).map_err(crypto)?.to_vec(),
			SigningKey::Ps384(k) => k.try_sign_with_rng(&mut rng, signing_input).map_err(crypto)?.to_vec(),
			SigningKey::Ps512(k) => k.try_sign_with_rng(&mut rng, signing_input).map_err(crypto)?.to_vec(),
		};
		Ok(sig)
	}
}

impl Verifier for RsaVerifier {
	fn algorithm(&self) -> Algorithm {
		self.alg
	}

	fn verify(&self, signing_input: &[u8], signature: &[u8]) -> Result<(), TokenError> {
		let ok = match &self.key {
			VerifyingKey::Rs256(k) => pkcs1(signature).is_some_and(|s| k.verify(signing_input, &s).is_ok()),
			VerifyingKey::Rs384(k) => pkcs1(signature).is_some_and(|s| k.verify(signing_input, &s).is_ok()),
			VerifyingKey::Rs512(k) => pkcs1(signature).is_some_and(|s| k.verify(signing_input, &s).is_ok()),
			VerifyingKey::Ps256(k) => pss_sig(signature).is_some_and(|s| k.verify(signing_input, &s).is_ok()),
			VerifyingKey::Ps384(k) => pss_sig(signature).is_some_and(|s| k.verify(signing_input, &s).is_ok()),
			VerifyingKey::Ps512(k) => pss_sig(signature).is_some_and(|s| k.verify(signing_input, &s).is_ok()),
		};
		if ok {
			Ok(())
		} else {
			Err(TokenError::SignatureMismatch)
		}
	}
}

fn pkcs1(bytes: &[u8]) -> Option<pkcs1v15::Signature> {
	pkcs1v15::Signature::try_from(bytes).ok()
}

fn pss_sig(bytes: &[u8]) -> Option<pss::Signature> {
	pss::Signature::try_from(bytes).ok()
}
