use serde::{Deserialize, Serialize};

use crate::graph::GraphUser;

/// Lookup request for `api/users/GetUserById`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetUserByIdDto {
	pub user_id: String,
}

/// Lookup request for `api/users/GetUserByPrincipalName`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetUserByPrincipalNameDto {
	pub user_principal_name: String,
}

///
/// # Get User Response
/// Returned by both lookup endpoints. The client proxy also uses it to carry
/// error messages back to the caller, in which case only `message` is set.
///
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetUserResponseDto {
	pub message: Option<String>,
	pub user_id: Option<String>,
	pub user_principal_name: Option<String>,
	pub display_name: Option<String>,
	pub mail_nick_name: Option<String>,
}

impl GetUserResponseDto {
	/// Success response for a user returned by Graph.
	#[must_use]
	pub fn found(user: GraphUser) -> Self {
		Self {
			message: Some("User found".to_string()),
			user_id: user.id,
			user_principal_name: user.user_principal_name,
			display_name: user.display_name,
			mail_nick_name: user.mail_nickname,
		}
	}

	/// Response carrying nothing but a message.
	#[must_use]
	pub fn error(message: impl Into<String>) -> Self {
		Self { message: Some(message.into()), ..Self::default() }
	}
}

///
/// # Create User Request
/// Missing fields deserialize as empty strings so the controller can answer
/// with its own validation message instead of a parse failure.
///
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CreateUserDto {
	#[serde(deserialize_with = "null_as_empty")]
	pub user_principal_name: String,
	#[serde(deserialize_with = "null_as_empty")]
	pub display_name: String,
	#[serde(deserialize_with = "null_as_empty")]
	pub mail_nick_name: String,
}

/// Response of `api/users/CreateUser`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserResponseDto {
	pub message: Option<String>,
	pub user_id: Option<String>,
	pub user_principal_name: Option<String>,
	pub user_display_name: Option<String>,
	pub user_mail_nickname: Option<String>,
}

impl CreateUserResponseDto {
	/// Success response for a user Graph has just created.
	#[must_use]
	pub fn created(user: GraphUser) -> Self {
		Self {
			message: Some("User created successfully".to_string()),
			user_id: user.id,
			user_principal_name: user.user_principal_name,
			user_display_name: user.display_name,
			user_mail_nickname: user.mail_nickname,
		}
	}
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
	D: serde::Deserializer<'de>,
{
	Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}
