use std::sync::Arc;

use chrono::{Duration, Utc};
use thiserror::Error;
use tracing::debug;

use super::token_cache::TokenCache;
use crate::tokens::{IdentityError, IdentityProvider};

/// MSAL error code for "no account for this user in the cache".
pub const USER_NULL: &str = "user_null";
/// MSAL error code for "account known but nothing to refresh with".
pub const NO_TOKENS_FOUND: &str = "no_tokens_found";
/// OAuth error code for an expired or revoked refresh token.
pub const INVALID_GRANT: &str = "invalid_grant";

/// Scopes issued with every sign-in and not tied to a resource.
pub const OIDC_SCOPES: [&str; 4] = ["openid", "profile", "offline_access", "email"];

/// Tokens are refreshed this long before they actually expire.
const EXPIRY_SKEW_MINUTES: i64 = 5;

/// Why no access token could be produced.
#[derive(Debug, Error)]
pub enum TokenAcquisitionError {
	/// The user must sign in again.
	#[error("User interaction required ({error_code})")]
	UiRequired { error_code: String },

	#[error(transparent)]
	Provider(#[from] IdentityError),
}

impl TokenAcquisitionError {
	fn ui_required(error_code: &str) -> Self {
		Self::UiRequired { error_code: error_code.to_string() }
	}

	/// True when the failure is due to the absence of the account in the token cache.
	#[must_use]
	pub fn account_does_not_exist_in_token_cache(&self) -> bool {
		matches!(self, Self::UiRequired { error_code } if error_code == USER_NULL)
	}
}

///
/// # Token Acquisition
/// Hands out access tokens for signed-in users from the [`TokenCache`],
/// refreshing them with the identity provider when needed.
///
pub struct TokenAcquisition {
	cache: Arc<TokenCache>,
	provider: Arc<dyn IdentityProvider>,
}

impl TokenAcquisition {
	pub fn new(cache: Arc<TokenCache>, provider: Arc<dyn IdentityProvider>) -> Self {
		Self { cache, provider }
	}

	///
	/// Returns an access token for `account_id` covering `scopes`.
	///
	/// # Errors
	/// [`TokenAcquisitionError::UiRequired`] when the account is unknown, has no
	/// refresh token or its refresh token was refused; provider failures otherwise.
	pub async fn access_token_for_user(&self, account_id: &str, scopes: &[&str]) -> Result<String, TokenAcquisitionError> {
		let Some(mut account) = self.cache.account(account_id) else {
			return Err(TokenAcquisitionError::ui_required(USER_NULL));
		};

		let wanted: Vec<String> = scopes.iter().map(|s| s.to_ascii_lowercase()).filter(|s| !OIDC_SCOPES.contains(&s.as_str())).collect();
		let fresh = account.expires_at - Duration::minutes(EXPIRY_SKEW_MINUTES) > Utc::now();
		if fresh && wanted.iter().all(|scope| account.scopes.contains(scope)) {
			return Ok(account.access_token);
		}

		let Some(refresh_token) = account.refresh_token.clone() else {
			return Err(TokenAcquisitionError::ui_required(NO_TOKENS_FOUND));
		};

		let mut request: Vec<String> = account.scopes.iter().filter(|s| !OIDC_SCOPES.contains(&s.as_str())).cloned().collect();
		for scope in wanted {
			if !request.contains(&scope) {
				request.push(scope);
			}
		}
		request.push("offline_access".to_string());

		debug!(account_id, scopes = %request.join(" "), "refreshing access token");
		let token = match self.provider.refresh(&refresh_token, &request).await {
			Ok(token) => token,
			Err(e) if e.is_invalid_grant() => {
				self.cache.remove(account_id);
				return Err(TokenAcquisitionError::ui_required(INVALID_GRANT));
			}
			Err(e) => return Err(e.into()),
		};

		account.apply_refresh(&token, &request);
		let access_token = account.access_token.clone();
		self.cache.store(account);
		Ok(access_token)
	}
}
