use log::debug;

use super::claims::Claims;
use super::error::TokenError;
use super::signer::Verifier;
use super::verify::parse;
use crate::config::TokenConfig;
use crate::utils::unix_now;

/// Checks on registered claims, applied after the signature has been verified.
///
/// Time claims are only checked when present. `exp` is exclusive: a token is
/// expired from the second it names, minus the leeway.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Validation {
	pub leeway_secs: u64,
	pub validate_exp: bool,
	pub validate_nbf: bool,
	pub issuer: Option<String>,
	pub audience: Option<String>,
}

impl Default for Validation {
	fn default() -> Self {
		Self::new()
	}
}

impl From<&TokenConfig> for Validation {
	fn from(config: &TokenConfig) -> Self {
		Self {
			leeway_secs: config.leeway_secs,
			..Self::new()
		}
	}
}

impl Validation {
	pub fn new() -> Self {
		Self {
			leeway_secs: 0,
			validate_exp: true,
			validate_nbf: true,
			issuer: None,
			audience: None,
		}
	}

	pub fn with_leeway(mut self, secs: u64) -> Self {
		self.leeway_secs = secs;
		self
	}

	pub fn with_issuer(mut self, iss: impl Into<String>) -> Self {
		self.issuer = Some(iss.into());
		self
	}

	pub fn with_audience(mut self, aud: impl Into<String>) -> Self {
		self.audience = Some(aud.into());
		self
	}

	pub fn validate(&self, claims: &Claims, now: i64) -> Result<(), TokenError> {
		let leeway = i64::try_from(self.leeway_secs).unwrap_or(i64::MAX);

		if self.validate_exp {
			if let Some(exp) = claims.exp {
				if now.saturating_sub(leeway) >= exp {
					debug!("token expired at {}, now {}", exp, now);
					return Err(TokenError::Expired { exp, now });
				}
			}
		}

		if self.validate_nbf {
			if let Some(nbf) = claims.nbf {
				if now.saturating_add(leeway) < nbf {
					return Err(TokenError::NotYetValid { nbf, now });
				}
			}
		}

		if let Some(iss) = &self.issuer {
			if claims.iss.as_deref() != Some(iss.as_str()) {
				return Err(TokenError::InvalidIssuer);
			}
		}

		if let Some(aud) = &self.audience {
			if !claims.audience_contains(aud) {
				return Err(TokenError::InvalidAudience);
			}
		}

		Ok(())
	}

	pub fn validate_now(&self, claims: &Claims) -> Result<(), TokenError> {
		self.validate(claims, unix_now())
	}
}

/// Verifies the signature, then validates the claims against the current time.
pub fn verify_and_validate(
	token: &str,
	verifier: &dyn Verifier,
	validation: &Validation,
) -> Result<Claims, TokenError> {
	let claims = parse(token)?.verify(verifier)?.claims;
	validation.validate_now(&claims)?;
	Ok(claims)
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::token::{Algorithm, Audience, HmacKey, TokenBuilder};

	const NOW: i64 = 1_700_000_000;

	#[test]
	fn test_expiry_boundary() {
		let v = Validation::new();
		let claims = Claims::new().expires_at(NOW);
		assert!(v.validate(&claims, NOW - 1).is_ok());
		assert!(matches!(
			v.validate(&claims, NOW),
			Err(TokenError::Expired { exp: NOW, now: NOW })
		));
	}

	#[test]
	fn test_leeway() {
		let v = Validation::new().with_leeway(30);
		assert!(v.validate(&Claims::new().expires_at(NOW), NOW + 29).is_ok());
		assert!(v.validate(&Claims::new().expires_at(NOW), NOW + 30).is_err());
		assert!(v.validate(&Claims::new().not_before(NOW), NOW - 30).is_ok());
		assert!(matches!(
			v.validate(&Claims::new().not_before(NOW), NOW - 31),
			Err(TokenError::NotYetValid { .. })
		));
	}

	#[test]
	fn test_disabled_checks() {
		let mut v = Validation::new();
		v.validate_exp = false;
		v.validate_nbf = false;
		let claims = Claims::new().expires_at(0).not_before(i64::MAX);
		assert!(v.validate(&claims, NOW).is_ok());
	}

	#[test]
	fn test_missing_time_claims_pass() {
		assert!(Validation::new().validate(&Claims::new(), NOW).is_ok());
	}

	#[test]
	fn test_issuer_and_audience() {
		let v = Validation::new().with_issuer("benchmark").with_audience("api");
		let good = Claims::new()
			.with_issuer("benchmark")
			.with_audience(Audience::Many(vec!["web".into(), "api".into()]));
		assert!(v.validate(&good, NOW).is_ok());

		let wrong_iss = good.clone().with_issuer("other");
		assert!(matches!(v.validate(&wrong_iss, NOW), Err(TokenError::InvalidIssuer)));

		let wrong_aud = good.with_audience(Audience::Single("web".into()));
		assert!(matches!(v.validate(&wrong_aud, NOW), Err(TokenError::InvalidAudience)));
	}

	#[test]
	fn test_from_config() {
		let config = TokenConfig {
			leeway_secs: 60,
			..TokenConfig::default()
		};
		let v = Validation::from(&config);
		assert_eq!(v.leeway_secs, 60);
		assert!(v.validate_exp && v.validate_nbf);
	}

	#[test]
	fn test_verify_and_validate() {
		let key = HmacKey::new(Algorithm::HS256, &[1u8; 32]).unwrap();
		let builder = TokenBuilder::new(&key);
		let now = unix_now();

		let fresh = builder.build(&Claims::new().expires_at(now + 3600)).unwrap();
		assert!(verify_and_validate(&fresh, &key, &Validation::new()).is_ok());

		let stale = builder.build(&Claims::new().expires_at(now - 3600)).unwrap();
		assert!(matches!(
			verify_and_validate(&stale, &key, &Validation::new()),
			Err(TokenError::Expired { .. })
		));
	}
}
