use serde::{Deserialize, Serialize};

use super::algorithm::Algorithm;

pub const DEFAULT_TYPE: &str = "JWT";

/// Token header (first segment).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Header {
	pub alg: Algorithm,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub typ: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub kid: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub cty: Option<String>,
}

impl Header {
	pub fn new(alg: Algorithm) -> Self {
		Self {
			alg,
			typ: Some(DEFAULT_TYPE.to_string()),
			kid: None,
			cty: None,
		}
	}
}
