#![deny(missing_docs)]
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};

///
/// # OpenID Connect ID Token Claims
/// The claims of the ID token returned alongside the access token on code
/// redemption.
///
/// The token is received directly from the Entra ID token endpoint over TLS, so
/// its signature is not checked again here. Audience, expiry and the sign-in
/// nonce still are.
///
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdTokenClaims {
	/// Object id of the user in the directory.
	pub oid: String,
	/// Tenant id.
	pub tid: String,
	/// Nonce echoed back from the authorization request.
	#[serde(default)]
	pub nonce: Option<String>,
	/// Display name.
	#[serde(default)]
	pub name: Option<String>,
	/// Sign-in name, usually the UPN.
	#[serde(default)]
	pub preferred_username: Option<String>,
	/// Opaque hint for silent re-authentication and sign-out.
	#[serde(default)]
	pub login_hint: Option<String>,
	/// Expiration timestamp.
	pub exp: u64,
}

impl IdTokenClaims {
	///
	/// Decodes an ID token issued to `client_id`.
	///
	/// # Errors
	/// Fails on a malformed or expired token or a wrong audience.
	pub fn decode(id_token: &str, client_id: &str) -> Result<Self, jsonwebtoken::errors::Error> {
		let mut validation = Validation::new(Algorithm::RS256);
		validation.insecure_disable_signature_validation();
		validation.set_audience(&[client_id]);

		let claims = decode::<Self>(id_token, &DecodingKey::from_secret(&[]), &validation)?;
		Ok(claims.claims)
	}

	/// Token cache key of the account: `{oid}.{tid}`.
	#[must_use]
	pub fn account_id(&self) -> String {
		format!("{}.{}", self.oid, self.tid)
	}
}
