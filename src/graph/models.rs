use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Properties requested for every user lookup.
pub const USER_SELECT: [&str; 4] = ["id", "userPrincipalName", "displayName", "mailNickname"];

/// The subset of a Graph `user` resource this service reads.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphUser {
	pub id: Option<String>,
	pub user_principal_name: Option<String>,
	pub display_name: Option<String>,
	pub mail_nickname: Option<String>,
}

///
/// # New Graph User
/// Body of `POST /users`. Accounts are created enabled with a random password
/// the user must change at first sign-in.
///
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewGraphUser {
	pub account_enabled: bool,
	pub display_name: String,
	pub mail_nickname: String,
	pub user_principal_name: String,
	pub password_profile: PasswordProfile,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PasswordProfile {
	pub force_change_password_next_sign_in: bool,
	pub password: String,
}

impl NewGraphUser {
	/// Builds the account `{mail_nickname}@{domain}`.
	#[must_use]
	pub fn new(display_name: &str, mail_nickname: &str, domain: &str) -> Self {
		Self {
			account_enabled: true,
			display_name: display_name.to_string(),
			mail_nickname: mail_nickname.to_string(),
			user_principal_name: format!("{mail_nickname}@{domain}"),
			password_profile: PasswordProfile { force_change_password_next_sign_in: true, password: initial_password() },
		}
	}
}

/// 32 hex digits followed by characters covering the remaining complexity classes.
fn initial_password() -> String {
	format!("{}Aa1!", Uuid::new_v4().simple())
}

/// `$select` and `$filter` of a `GET /users` request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserQuery {
	pub select: Vec<&'static str>,
	pub filter: String,
}

impl UserQuery {
	#[must_use]
	pub fn by_id(user_id: &str) -> Self {
		Self::equals("id", user_id)
	}

	#[must_use]
	pub fn by_principal_name(user_principal_name: &str) -> Self {
		Self::equals("userPrincipalName", user_principal_name)
	}

	fn equals(property: &str, value: &str) -> Self {
		Self { select: USER_SELECT.to_vec(), filter: format!("{property} eq '{}'", value.replace('\'', "''")) }
	}

	/// Query string pairs as sent to Graph.
	#[must_use]
	pub fn to_pairs(&self) -> [(&'static str, String); 2] {
		[("$select", self.select.join(",")), ("$filter", self.filter.clone())]
	}
}
