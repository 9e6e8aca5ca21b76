use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::utils::unix_now;

/// `aud` may be a single string or an array of strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Audience {
	Single(String),
	Many(Vec<String>),
}

impl Audience {
	pub fn contains(&self, aud: &str) -> bool {
		match self {
			Audience::Single(s) => s == aud,
			Audience::Many(list) => list.iter().any(|s| s == aud),
		}
	}
}

/// Token payload.
///
/// Time claims are whole seconds since the Unix epoch; a fractional value
/// fails to decode. Members without a field here land in `extra` and are
/// written back out unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Claims {
	#[serde(skip_serializing_if = "Option::is_none")]
	pub iss: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub sub: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub aud: Option<Audience>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub exp: Option<i64>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub nbf: Option<i64>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub iat: Option<i64>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub jti: Option<String>,
	#[serde(flatten)]
	pub extra: Map<String, Value>,
}

impl Claims {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn with_issuer(mut self, iss: impl Into<String>) -> Self {
		self.iss = Some(iss.into());
		self
	}

	pub fn with_subject(mut self, sub: impl Into<String>) -> Self {
		self.sub = Some(sub.into());
		self
	}

	pub fn with_audience(mut self, aud: Audience) -> Self {
		self.aud = Some(aud);
		self
	}

	pub fn with_id(mut self, jti: impl Into<String>) -> Self {
		self.jti = Some(jti.into());
		self
	}

	pub fn expires_at(mut self, exp: i64) -> Self {
		self.exp = Some(exp);
		self
	}

	pub fn not_before(mut self, nbf: i64) -> Self {
		self.nbf = Some(nbf);
		self
	}

	pub fn issued_at(mut self, iat: i64) -> Self {
		self.iat = Some(iat);
		self
	}

	pub fn issued_now(self) -> Self {
		self.issued_at(unix_now())
	}

	/// Adds an application claim. Registered names are ignored here; use the typed setters.
	pub fn with_claim(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
		let name = name.into();
		if !is_registered(&name) {
			self.extra.insert(name, value.into());
		}
		self
	}

	pub fn claim(&self, name: &str) -> Option<&Value> {
		self.extra.get(name)
	}

	pub fn audience_contains(&self, aud: &str) -> bool {
		self.aud.as_ref().is_some_and(|a| a.contains(aud))
	}
}

fn is_registered(name: &str) -> bool {
	matches!(name, "iss" | "sub" | "aud" | "exp" | "nbf" | "iat" | "jti")
}
