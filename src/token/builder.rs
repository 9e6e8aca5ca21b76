use log::trace;
use serde::Serialize;

use super::claims::Claims;
use super::error::TokenError;
use super::header::Header;
use super::signer::Signer;
use crate::utils::encode_segment_into;

/// Serializes claims and signs them into the compact `header.payload.signature` form.
///
/// A builder can be kept around and reused; it holds no per-token state.
pub struct TokenBuilder<'a> {
	signer: &'a dyn Signer,
	header: Header,
}

impl<'a> TokenBuilder<'a> {
	pub fn new(signer: &'a dyn Signer) -> Self {
		Self {
			header: Header::new(signer.algorithm()),
			signer,
		}
	}

	pub fn with_key_id(mut self, kid: impl Into<String>) -> Self {
		self.header.kid = Some(kid.into());
		self
	}

	pub fn with_type(mut self, typ: impl Into<String>) -> Self {
		self.header.typ = Some(typ.into());
		self
	}

	/// Leaves `typ` out of the header.
	pub fn without_type(mut self) -> Self {
		self.header.typ = None;
		self
	}

	pub fn with_content_type(mut self, cty: impl Into<String>) -> Self {
		self.header.cty = Some(cty.into());
		self
	}

	pub fn header(&self) -> &Header {
		&self.header
	}

	pub fn build(&self, claims: &Claims) -> Result<String, TokenError> {
		self.build_with(claims)
	}

	/// Like `build`, for any serializable claims type.
	pub fn build_with<T: Serialize + ?Sized>(&self, claims: &T) -> Result<String, TokenError> {
		let header_json = serde_json::to_vec(&self.header)?;
		let payload_json = serde_json::to_vec(claims)?;

		let mut token = String::with_capacity((header_json.len() + payload_json.len()) * 4 / 3 + 128);
		encode_segment_into(&header_json, &mut token);
		token.push('.');
		encode_segment_into(&payload_json, &mut token);

		let signature = self.signer.sign(token.as_bytes())?;
		token.push('.');
		encode_segment_into(&signature, &mut token);

		trace!("built {} token of {} bytes", self.header.alg, token.len());
		Ok(token)
	}
}
