use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::warn;

use super::{ApiTransport, ClientError};
use crate::dto::{CreateUserDto, CreateUserResponseDto, GetUserByIdDto, GetUserByPrincipalNameDto, GetUserResponseDto};

///
/// # Users Service
/// Calls the users API on behalf of a front end.
///
/// Lookups never fail: HTTP failures come back as a [`GetUserResponseDto`]
/// whose message starts with `API Error: ` (non-success status) or
/// `Application error: ` (the call itself failed).
///
pub struct UsersService<T> {
	transport: T,
}

impl<T: ApiTransport> UsersService<T> {
	pub const fn new(transport: T) -> Self {
		Self { transport }
	}

	pub async fn get_user_by_id(&self, dto: &GetUserByIdDto) -> Option<GetUserResponseDto> {
		self.lookup("api/users/GetUserById", dto).await
	}

	pub async fn get_user_by_principal(&self, dto: &GetUserByPrincipalNameDto) -> Option<GetUserResponseDto> {
		self.lookup("api/users/GetUserByPrincipalName", dto).await
	}

	///
	/// # Create User
	/// A JSON `null` body on success decodes to `None`.
	///
	/// # Errors
	/// A non-success status becomes [`ClientError::Api`] with the reason
	/// phrase and, when the body has one, the API's `error` message.
	///
	pub async fn create_user(&self, dto: &CreateUserDto) -> Result<Option<CreateUserResponseDto>, ClientError> {
		let response = self.transport.post_json("api/users/CreateUser", &serde_json::to_value(dto)?).await?;

		if response.is_success() {
			return Ok(serde_json::from_str(&response.body)?);
		}

		warn!(status = response.status, "user creation rejected");
		Err(ClientError::Api {
			status: response.status,
			reason: response.reason.unwrap_or_else(|| "Could not read from Json".to_string()),
			detail: error_detail(&response.body),
		})
	}

	async fn lookup(&self, path: &str, dto: &impl Serialize) -> Option<GetUserResponseDto> {
		match self.post(path, dto).await {
			Ok(Ok(response)) => response,
			Ok(Err(body)) => Some(GetUserResponseDto::error(format!("API Error: {body}"))),
			Err(e) => Some(GetUserResponseDto::error(format!("Application error: {e}"))),
		}
	}

	/// Inner `Err` carries the body of a non-success response.
	async fn post<R: DeserializeOwned>(&self, path: &str, dto: &impl Serialize) -> Result<Result<R, String>, ClientError> {
		let response = self.transport.post_json(path, &serde_json::to_value(dto)?).await?;
		if !response.is_success() {
			return Ok(Err(response.body));
		}
		Ok(Ok(serde_json::from_str(&response.body)?))
	}
}

/// The `error` message of a `{"error": "..."}` body, else the raw body.
fn error_detail(body: &str) -> Option<String> {
	if body.trim().is_empty() {
		return None;
	}
	let detail = serde_json::from_str::<serde_json::Value>(body)
		.ok()
		.and_then(|value| value.get("error").and_then(serde_json::Value::as_str).map(str::to_string));
	Some(detail.unwrap_or_else(|| body.to_string()))
}
