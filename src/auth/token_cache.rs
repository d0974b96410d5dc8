use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;

use crate::tokens::MSAccessToken;

/// Tokens held for one signed-in account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CachedAccount {
	pub account_id: String,
	pub username: Option<String>,
	pub access_token: String,
	pub refresh_token: Option<String>,
	/// Lower-cased, without resource prefix.
	pub scopes: Vec<String>,
	pub expires_at: DateTime<Utc>,
}

impl CachedAccount {
	/// Builds a cache entry from a token endpoint response.
	///
	/// When the response does not list granted scopes, the requested ones are assumed.
	#[must_use]
	pub fn from_token(account_id: String, username: Option<String>, token: &MSAccessToken, requested_scopes: &[String]) -> Self {
		let mut scopes = token.granted_scopes();
		if scopes.is_empty() {
			scopes = requested_scopes.iter().map(|s| s.to_ascii_lowercase()).collect();
		}

		Self {
			account_id,
			username,
			access_token: token.access_token.clone(),
			refresh_token: token.refresh_token.clone(),
			scopes,
			expires_at: expiry_after(Utc::now(), token.expires_in),
		}
	}

	/// Applies a refresh response. Entra may omit a new refresh token, in which
	/// case the previous one is kept.
	pub fn apply_refresh(&mut self, token: &MSAccessToken, requested_scopes: &[String]) {
		let refreshed = Self::from_token(self.account_id.clone(), self.username.clone(), token, requested_scopes);
		self.access_token = refreshed.access_token;
		self.expires_at = refreshed.expires_at;
		self.scopes = refreshed.scopes;
		if refreshed.refresh_token.is_some() {
			self.refresh_token = refreshed.refresh_token;
		}
	}
}

/// `now + expires_in`, saturating at the latest representable instant.
fn expiry_after(now: DateTime<Utc>, expires_in: u64) -> DateTime<Utc> {
	i64::try_from(expires_in)
		.ok()
		.and_then(Duration::try_seconds)
		.and_then(|lifetime| now.checked_add_signed(lifetime))
		.unwrap_or(DateTime::<Utc>::MAX_UTC)
}

///
/// # Token Cache
/// In-memory, per-process store of the tokens obtained at sign-in. Losing it (a
/// restart, another instance) is what principal revalidation detects.
///
#[derive(Debug, Default)]
pub struct TokenCache {
	accounts: DashMap<String, CachedAccount>,
}

impl TokenCache {
	#[must_use]
	pub fn new() -> Self {
		Self::default()
	}

	pub fn store(&self, account: CachedAccount) {
		self.accounts.insert(account.account_id.clone(), account);
	}

	#[must_use]
	pub fn account(&self, account_id: &str) -> Option<CachedAccount> {
		self.accounts.get(account_id).map(|entry| entry.value().clone())
	}

	pub fn remove(&self, account_id: &str) -> Option<CachedAccount> {
		self.accounts.remove(account_id).map(|(_, account)| account)
	}

	#[must_use]
	pub fn len(&self) -> usize {
		self.accounts.len()
	}

	#[must_use]
	pub fn is_empty(&self) -> bool {
		self.accounts.is_empty()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn huge_lifetime_saturates_instead_of_overflowing() {
		let now = Utc::now();

		assert_eq!(expiry_after(now, 3600), now + Duration::hours(1));
		assert_eq!(expiry_after(now, u64::MAX), DateTime::<Utc>::MAX_UTC);
		assert_eq!(expiry_after(now, i64::MAX as u64), DateTime::<Utc>::MAX_UTC);

		let token = MSAccessToken { access_token: "at".to_string(), expires_in: u64::MAX, ..MSAccessToken::default() };
		assert_eq!(CachedAccount::from_token("oid.tid".to_string(), None, &token, &[]).expires_at, DateTime::<Utc>::MAX_UTC);
	}

	#[test]
	fn refresh_keeps_previous_refresh_token_when_none_is_returned() {
		let first = MSAccessToken { access_token: "at-1".to_string(), refresh_token: Some("rt-1".to_string()), expires_in: 60, ..MSAccessToken::default() };
		let mut account = CachedAccount::from_token("oid.tid".to_string(), None, &first, &["User.Read".to_string()]);
		assert_eq!(account.scopes, vec!["user.read"]);

		let second = MSAccessToken { access_token: "at-2".to_string(), expires_in: 3600, scope: Some("User.Read Device.Read.All".to_string()), ..MSAccessToken::default() };
		account.apply_refresh(&second, &[]);

		assert_eq!(account.access_token, "at-2");
		assert_eq!(account.refresh_token.as_deref(), Some("rt-1"));
		assert_eq!(account.scopes, vec!["user.read", "device.read.all"]);
		assert!(account.expires_at > Utc::now() + Duration::minutes(59));
	}

	#[test]
	fn cache_stores_and_forgets_accounts() {
		let cache = TokenCache::new();
		let token = MSAccessToken { access_token: "at".to_string(), expires_in: 60, ..MSAccessToken::default() };
		cache.store(CachedAccount::from_token("a.t".to_string(), None, &token, &[]));

		assert_eq!(cache.account("a.t").map(|a| a.access_token), Some("at".to_string()));
		assert!(cache.remove("a.t").is_some());
		assert!(cache.is_empty());
	}
}
