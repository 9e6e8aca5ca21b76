//! Compact signed tokens: `base64url(header).base64url(claims).base64url(signature)`.
//!
//! Segments use the unpadded url-safe alphabet. The signature covers the first
//! two segments exactly as transmitted. A verifier is bound to one algorithm
//! and rejects tokens whose header names any other before doing crypto work.

pub mod algorithm;
pub mod builder;
pub mod claims;
pub mod ecdsa;
pub mod eddsa;
pub mod error;
pub mod header;
pub mod hmac;
pub mod rsa;
pub mod signer;
pub mod validation;
pub mod verify;

pub use self::algorithm::{Algorithm, Family};
pub use self::builder::TokenBuilder;
pub use self::claims::{Audience, Claims};
pub use self::ecdsa::{EcdsaSigner, EcdsaSigningKey, EcdsaVerifier, EcdsaVerifyingKey};
pub use self::eddsa::{EdDsaSigner, EdDsaVerifier};
pub use self::error::TokenError;
pub use self::header::Header;
pub use self::hmac::HmacKey;
pub use self::rsa::{RsaSigner, RsaVerifier};
pub use self::signer::{KeyPolicy, Signer, Verifier};
pub use self::validation::{verify_and_validate, Validation};
pub use self::verify::{parse, verify, Token, UnverifiedToken};
