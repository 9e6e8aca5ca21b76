use log::{debug, warn};
use serde::de::DeserializeOwned;

use super::claims::Claims;
use super::error::TokenError;
use super::header::Header;
use super::signer::Verifier;
use crate::utils::decode_segment;

/// A token whose header has been decoded but whose signature has not been checked.
#[derive(Debug, Clone)]
pub struct UnverifiedToken<'a> {
	header: Header,
	signing_input: &'a str,
	payload_segment: &'a str,
	signature: Vec<u8>,
}

/// A token that passed signature verification.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
	pub header: Header,
	pub claims: Claims,
	pub signature: Vec<u8>,
	raw_claims: Vec<u8>,
}

/// Splits a compact token and decodes its header.
pub fn parse(token: &str) -> Result<UnverifiedToken<'_>, TokenError> {
	let mut parts = token.splitn(4, '.');
	let (header_b64, payload_b64, signature_b64) = match (parts.next(), parts.next(), parts.next(), parts.next()) {
		(Some(h), Some(p), Some(s), None) => (h, p, s),
		_ => {
			return Err(TokenError::MalformedToken(
				"expected three '.'-separated segments".to_string(),
			))
		}
	};
	if header_b64.is_empty() || payload_b64.is_empty() {
		return Err(TokenError::MalformedToken("empty header or payload segment".to_string()));
	}

	let header: Header = serde_json::from_slice(&decode_segment(header_b64)?)?;
	let signature = decode_segment(signature_b64)?;

	Ok(UnverifiedToken {
		header,
		signing_input: &token[..header_b64.len() + 1 + payload_b64.len()],
		payload_segment: payload_b64,
		signature,
	})
}

/// Parses `token`, checks it against `verifier`, and returns its claims.
pub fn verify(token: &str, verifier: &dyn Verifier) -> Result<Claims, TokenError> {
	Ok(parse(token)?.verify(verifier)?.claims)
}

impl<'a> UnverifiedToken<'a> {
	pub fn header(&self) -> &Header {
		&self.header
	}

	/// The bytes the signature covers, exactly as transmitted.
	pub fn signing_input(&self) -> &[u8] {
		self.signing_input.as_bytes()
	}

	pub fn signature(&self) -> &[u8] {
		&self.signature
	}

	/// Decodes the payload without checking anything. Do not trust the result.
	pub fn claims_unverified(&self) -> Result<Claims, TokenError> {
		Ok(serde_json::from_slice(&decode_segment(self.payload_segment)?)?)
	}

	pub fn verify(self, verifier: &dyn Verifier) -> Result<Token, TokenError> {
		let expected = verifier.algorithm();
		if self.header.alg != expected {
			warn!("token alg {} rejected by {} verifier", self.header.alg, expected);
			return Err(TokenError::AlgorithmMismatch {
				expected,
				token: self.header.alg,
			});
		}

		if let Err(e) = verifier.verify(self.signing_input(), &self.signature) {
			debug!("{} signature check failed: {}", expected, e);
			return Err(e);
		}

		let raw_claims = decode_segment(self.payload_segment)?;
		let claims = serde_json::from_slice(&raw_claims)?;
		Ok(Token {
			header: self.header,
			claims,
			signature: self.signature,
			raw_claims,
		})
	}
}

impl Token {
	/// Payload JSON exactly as it was transmitted.
	pub fn raw_claims(&self) -> &[u8] {
		&self.raw_claims
	}

	/// Decodes the payload into an application type.
	pub fn decode_claims<T: DeserializeOwned>(&self) -> Result<T, TokenError> {
		Ok(serde_json::from_slice(&self.raw_claims)?)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::token::{
		Algorithm, Audience, EcdsaSigner, EdDsaSigner, HmacKey, KeyPolicy, RsaSigner, RsaVerifier, Signer,
		TokenBuilder,
	};
	use crate::utils::encode_segment;
	use ::rsa::RsaPrivateKey;
	use rand::rngs::OsRng;
	use std::sync::OnceLock;

	fn hs256() -> HmacKey {
		HmacKey::new(Algorithm::HS256, &[0u8; 64]).unwrap()
	}

	// Below the default modulus floor to keep key generation fast.
	fn rsa_key() -> &'static RsaPrivateKey {
		static KEY: OnceLock<RsaPrivateKey> = OnceLock::new();
		KEY.get_or_init(|| RsaPrivateKey::new(&mut rand::thread_rng(), 1536).unwrap())
	}

	fn lenient() -> KeyPolicy {
		KeyPolicy {
			min_rsa_modulus_bits: 1024,
			..KeyPolicy::default()
		}
	}

	fn asymmetric_pairs() -> Vec<(Box<dyn Signer>, Box<dyn Verifier>)> {
		let mut pairs: Vec<(Box<dyn Signer>, Box<dyn Verifier>)> = Vec::new();
		for alg in [Algorithm::RS256, Algorithm::RS512, Algorithm::PS256, Algorithm::PS512] {
			let signer = RsaSigner::with_policy(alg, rsa_key().clone(), &lenient()).unwrap();
			let verifier = signer.verifier().unwrap();
			pairs.push((Box::new(signer), Box::new(verifier)));
		}
		for signer in [
			EcdsaSigner::new(Algorithm::ES256, p256::ecdsa::SigningKey::random(&mut OsRng)).unwrap(),
			EcdsaSigner::new(Algorithm::ES384, p384::ecdsa::SigningKey::random(&mut OsRng)).unwrap(),
			EcdsaSigner::new(Algorithm::ES512, p521::ecdsa::SigningKey::random(&mut OsRng)).unwrap(),
		] {
			let verifier = signer.verifier();
			pairs.push((Box::new(signer), Box::new(verifier)));
		}
		let ed = EdDsaSigner::from_seed(&[11u8; 32]);
		let verifier = ed.verifier();
		pairs.push((Box::new(ed), Box::new(verifier)));
		pairs
	}

	fn sample_claims() -> Claims {
		Claims::new()
			.with_issuer("benchmark")
			.with_audience(Audience::Many(vec!["a".into(), "b".into()]))
			.issued_at(1_700_000_000)
			.with_claim("role", "admin")
	}

	#[test]
	fn test_round_trip() {
		let key = hs256();
		let token = TokenBuilder::new(&key).build(&sample_claims()).unwrap();
		assert_eq!(verify(&token, &key).unwrap(), sample_claims());
	}

	#[test]
	fn test_round_trip_every_asymmetric_family() {
		let claims = sample_claims().with_subject("user");
		for (signer, verifier) in asymmetric_pairs() {
			let alg = signer.algorithm();
			let token = TokenBuilder::new(signer.as_ref()).build(&claims).unwrap();
			assert_eq!(parse(&token).unwrap().header().alg, alg);
			assert_eq!(verify(&token, verifier.as_ref()).unwrap(), claims, "{}", alg);

			let parts: Vec<&str> = token.split('.').collect();
			let forged = format!("{}.{}.{}", parts[0], encode_segment(br#"{"sub":"root"}"#), parts[2]);
			assert!(
				matches!(verify(&forged, verifier.as_ref()), Err(TokenError::SignatureMismatch)),
				"{}",
				alg
			);
		}
	}

	#[test]
	fn test_hmac_token_against_rsa_public_key() {
		let token = TokenBuilder::new(&hs256()).build(&sample_claims()).unwrap();
		let rsa = RsaVerifier::with_policy(Algorithm::RS256, rsa_key().to_public_key(), &lenient()).unwrap();
		assert!(matches!(
			verify(&token, &rsa),
			Err(TokenError::AlgorithmMismatch { expected: Algorithm::RS256, token: Algorithm::HS256 })
		));
	}

	#[test]
	fn test_verified_token_parts() {
		let key = hs256();
		let token = TokenBuilder::new(&key).with_key_id("k").build(&sample_claims()).unwrap();
		let verified = parse(&token).unwrap().verify(&key).unwrap();
		assert_eq!(verified.header.kid.as_deref(), Some("k"));
		assert_eq!(verified.signature.len(), 32);
		let raw: serde_json::Value = serde_json::from_slice(verified.raw_claims()).unwrap();
		assert_eq!(raw["role"], "admin");
	}

	#[test]
	fn test_decode_claims_into_custom_type() {
		#[derive(serde::Deserialize)]
		struct Custom {
			iss: String,
			role: String,
		}
		let key = hs256();
		let token = TokenBuilder::new(&key).build(&sample_claims()).unwrap();
		let custom: Custom = parse(&token).unwrap().verify(&key).unwrap().decode_claims().unwrap();
		assert_eq!((custom.iss.as_str(), custom.role.as_str()), ("benchmark", "admin"));
	}

	#[test]
	fn test_segment_count() {
		for bad in ["", "a", "a.b", "a.b.c.d", ".b.c", "a..c"] {
			assert!(matches!(parse(bad), Err(TokenError::MalformedToken(_))), "{:?}", bad);
		}
	}

	#[test]
	fn test_bad_base64_and_json() {
		assert!(matches!(parse("!!.e30.AA"), Err(TokenError::Base64(_))));
		let not_json = encode_segment(b"not json");
		assert!(matches!(parse(&format!("{}.e30.", not_json)), Err(TokenError::Json(_))));
	}

	#[test]
	fn test_none_algorithm_rejected() {
		let header = encode_segment(br#"{"alg":"none","typ":"JWT"}"#);
		let token = format!("{}.{}.", header, encode_segment(b"{}"));
		assert!(matches!(parse(&token), Err(TokenError::Json(_))));
	}

	#[test]
	fn test_tampered_payload() {
		let key = hs256();
		let token = TokenBuilder::new(&key).build(&sample_claims()).unwrap();
		let parts: Vec<&str> = token.split('.').collect();
		let forged_payload = encode_segment(br#"{"iss":"attacker"}"#);
		let forged = format!("{}.{}.{}", parts[0], forged_payload, parts[2]);
		assert!(matches!(verify(&forged, &key), Err(TokenError::SignatureMismatch)));
	}

	#[test]
	fn test_tampered_signature() {
		let key = hs256();
		let token = TokenBuilder::new(&key).build(&sample_claims()).unwrap();
		let (head, sig_b64) = token.rsplit_once('.').unwrap();
		let mut sig = decode_segment(sig_b64).unwrap();
		sig[0] ^= 1;
		let forged = format!("{}.{}", head, encode_segment(&sig));
		assert!(matches!(verify(&forged, &key), Err(TokenError::SignatureMismatch)));
	}

	#[test]
	fn test_algorithm_mismatch() {
		let hs = hs256();
		let hs512 = HmacKey::new(Algorithm::HS512, &[0u8; 64]).unwrap();
		let token = TokenBuilder::new(&hs).build(&sample_claims()).unwrap();
		assert!(matches!(
			verify(&token, &hs512),
			Err(TokenError::AlgorithmMismatch { expected: Algorithm::HS512, token: Algorithm::HS256 })
		));

		let ed = EdDsaSigner::from_seed(&[5u8; 32]);
		assert!(matches!(verify(&token, &ed.verifier()), Err(TokenError::AlgorithmMismatch { .. })));
	}

	#[test]
	fn test_claims_unverified() {
		let key = hs256();
		let token = TokenBuilder::new(&key).build(&sample_claims()).unwrap();
		let parsed = parse(&token).unwrap();
		assert_eq!(parsed.header().alg, Algorithm::HS256);
		assert_eq!(parsed.claims_unverified().unwrap().iss.as_deref(), Some("benchmark"));
		assert!(token.as_bytes().starts_with(parsed.signing_input()));
	}

	#[test]
	fn test_bad_claims_after_valid_signature() {
		// signed, but the payload is not an object of claims
		let key = hs256();
		let token = TokenBuilder::new(&key).build_with("not claims").unwrap();
		assert!(matches!(verify(&token, &key), Err(TokenError::Json(_))));
	}
}
