#![warn(missing_docs)]
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use super::IdTokenClaims;
use crate::secrets::SessionKey;

///
/// # User JSON Web Token (JWT) Claims
/// This is the JSON Web Token (JWT) claims that will be included in the User JSON Web Token (JWT).
/// The User JSON Web Token (JWT) carries the identity of the signed-in user. It is stored on the
/// user's machine via the session cookie; the tokens themselves stay in the server-side token cache.
///
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserJWTTokenClaims {
	/// Token cache key, `{oid}.{tid}`
	pub account_id: String,
	/// Display name of user
	pub name: Option<String>,
	/// Sign-in name of user
	pub preferred_username: Option<String>,
	/// Login hint used for silent sign-in and sign-out
	pub login_hint: Option<String>,
	/// Raw ID token, sent back as `id_token_hint` on sign-out
	pub id_token: Option<String>,
	/// Issued-at timestamp
	pub iat: u64,
	/// Expiration timestamp
	pub exp: u64,
}

impl UserJWTTokenClaims {
	///
	/// Builds session claims for a freshly signed-in user.
	///
	#[must_use]
	pub fn from_id_token(claims: &IdTokenClaims, id_token: String, lifetime_secs: u64) -> Self {
		let now = jsonwebtoken::get_current_timestamp();
		Self {
			account_id: claims.account_id(),
			name: claims.name.clone(),
			preferred_username: claims.preferred_username.clone(),
			login_hint: claims.login_hint.clone(),
			id_token: Some(id_token),
			iat: now,
			exp: now + lifetime_secs,
		}
	}

	///
	/// Same session with a new lifetime starting now.
	///
	#[must_use]
	pub fn renewed(&self, lifetime_secs: u64) -> Self {
		let now = jsonwebtoken::get_current_timestamp();
		Self { iat: now, exp: now + lifetime_secs, ..self.clone() }
	}

	///
	/// True once more than half of the session lifetime has elapsed.
	///
	#[must_use]
	pub fn needs_renewal(&self) -> bool {
		let now = jsonwebtoken::get_current_timestamp();
		let half_life = self.exp.saturating_sub(self.iat) / 2;
		now >= self.iat + half_life
	}

	///
	/// Encodes the UserJWTTokenClaims into a JWT string.
	///
	/// # Errors
	/// Fails only if the claims cannot be serialized.
	pub fn encode(&self, key: &SessionKey) -> Result<String, jsonwebtoken::errors::Error> {
		encode(&Header::default(), self, &EncodingKey::from_secret(key.as_bytes()))
	}

	///
	/// Decodes and verifies the JWT string.
	///
	/// # Errors
	/// Fails on a bad signature, an expired session or malformed claims.
	pub fn decode(token: &str, key: &SessionKey) -> Result<Self, jsonwebtoken::errors::Error> {
		let claims = decode::<Self>(token, &DecodingKey::from_secret(key.as_bytes()), &Validation::default())?;
		Ok(claims.claims)
	}
}
