use tracing::warn;

use super::token_acquisition::{TokenAcquisition, TokenAcquisitionError};
use crate::tokens::UserJWTTokenClaims;

/// Outcome of revalidating a session cookie against the token cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrincipalValidation {
	Accepted,
	/// The cookie is valid but the server no longer holds tokens for it; the
	/// session must be dropped so the user signs in again.
	Rejected,
}

///
/// # Validate Principal
/// Runs on every authenticated request. A signed session cookie outlives the
/// in-memory token cache, so a token is requested for the `profile` scope; if
/// the account is gone from the cache the principal is rejected.
///
/// # Errors
/// Any other acquisition failure is returned to the caller.
pub async fn validate_principal(acquisition: &TokenAcquisition, session: &UserJWTTokenClaims) -> Result<PrincipalValidation, TokenAcquisitionError> {
	match acquisition.access_token_for_user(&session.account_id, &["profile"]).await {
		Ok(_) => Ok(PrincipalValidation::Accepted),
		Err(e) if e.account_does_not_exist_in_token_cache() => {
			warn!(account_id = %session.account_id, "rejecting session: account missing from token cache");
			Ok(PrincipalValidation::Rejected)
		}
		Err(e) => Err(e),
	}
}

#[cfg(test)]
mod tests {
	use std::sync::Arc;

	use super::*;
	use crate::auth::token_cache::{CachedAccount, TokenCache};
	use crate::tokens::{IdentityError, IdentityProvider, MSAccessToken};

	struct RefusingProvider;

	#[rocket::async_trait]
	impl IdentityProvider for RefusingProvider {
		async fn redeem_code(&self, _: &str, _: &str, _: &str, _: &[String]) -> Result<MSAccessToken, IdentityError> {
			Err(IdentityError::MissingClientSecret)
		}

		async fn refresh(&self, _: &str, _: &[String]) -> Result<MSAccessToken, IdentityError> {
			Err(IdentityError::MissingClientSecret)
		}
	}

	fn session() -> UserJWTTokenClaims {
		UserJWTTokenClaims { account_id: "oid.tid".to_string(), name: None, preferred_username: None, login_hint: None, id_token: None, iat: 0, exp: u64::MAX }
	}

	fn acquisition_with(account: Option<CachedAccount>) -> TokenAcquisition {
		let cache = Arc::new(TokenCache::new());
		if let Some(account) = account {
			cache.store(account);
		}
		TokenAcquisition::new(cache, Arc::new(RefusingProvider))
	}

	#[rocket::async_test]
	async fn principal_without_cached_account_is_rejected() {
		let outcome = validate_principal(&acquisition_with(None), &session()).await.unwrap();

		assert_eq!(outcome, PrincipalValidation::Rejected);
	}

	#[rocket::async_test]
	async fn principal_with_cached_account_is_accepted() {
		let token = MSAccessToken { access_token: "at".to_string(), expires_in: 3600, ..MSAccessToken::default() };
		let account = CachedAccount::from_token("oid.tid".to_string(), None, &token, &[]);

		let outcome = validate_principal(&acquisition_with(Some(account)), &session()).await.unwrap();

		assert_eq!(outcome, PrincipalValidation::Accepted);
	}

	#[rocket::async_test]
	async fn other_failures_propagate() {
		let token = MSAccessToken { access_token: "at".to_string(), refresh_token: Some("rt".to_string()), expires_in: 0, ..MSAccessToken::default() };
		let account = CachedAccount::from_token("oid.tid".to_string(), None, &token, &[]);

		let err = validate_principal(&acquisition_with(Some(account)), &session()).await.unwrap_err();

		assert!(matches!(err, TokenAcquisitionError::Provider(IdentityError::MissingClientSecret)));
	}
}
