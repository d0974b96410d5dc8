#![deny(missing_docs)]
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::secrets::SessionKey;

/// Lifetime of a sign-in attempt.
pub const SIGN_IN_LIFETIME_SECS: u64 = 900;

///
/// # Application State (AppState) JSON Web Token (JWT) Claims
/// This is the JSON Web Token (JWT) claims that will be included in the Application State (AppState) JSON Web Token (JWT).
/// The AppState JSON Web Token (JWT) correlates a sign-in redirect with its callback.
///
/// It travels in a short-lived cookie while the user is at Entra ID. The `state` and `nonce`
/// values are sent to Entra ID and must come back unchanged; the PKCE verifier never leaves
/// the user's browser and the server. After the callback the user is sent back to `uri`.
///
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppStateTokenClaims {
	/// The route to return to after sign-in.
	pub uri: Option<String>,
	/// OAuth `state` parameter.
	pub state: String,
	/// OpenID Connect nonce expected in the ID token.
	pub nonce: String,
	/// PKCE code verifier.
	pub code_verifier: String,
	/// The expiration timestamp of the token.
	pub exp: u64,
}

impl AppStateTokenClaims {
	///
	/// Creates the claims for a new sign-in attempt.
	///
	#[must_use]
	pub fn new(uri: String, state: String, nonce: String, code_verifier: String) -> Self {
		Self { uri: Some(uri), state, nonce, code_verifier, exp: jsonwebtoken::get_current_timestamp() + SIGN_IN_LIFETIME_SECS }
	}

	///
	/// Encodes the AppStateTokenClaims into a JWT string.
	///
	/// # Errors
	/// Fails only if the claims cannot be serialized.
	pub fn encode(&self, key: &SessionKey) -> Result<String, jsonwebtoken::errors::Error> {
		encode(&Header::default(), self, &EncodingKey::from_secret(key.as_bytes()))
	}

	///
	/// Decodes the JWT string into AppStateTokenClaims.
	///
	/// # Errors
	/// Fails on a bad signature or an expired sign-in attempt.
	pub fn decode(token: &str, key: &SessionKey) -> Result<Self, jsonwebtoken::errors::Error> {
		let claims = decode::<Self>(token, &DecodingKey::from_secret(key.as_bytes()), &Validation::default())?;
		Ok(claims.claims)
	}
}
