use reqwest::{Response, StatusCode};
use serde::Deserialize;
use tracing::debug;

use super::models::{GraphUser, NewGraphUser, UserQuery};
use super::GraphError;

///
/// # Graph User Service
/// The two Graph user operations the controller needs. Calls are made on behalf
/// of the signed-in user with their delegated access token.
///
#[rocket::async_trait]
pub trait GraphUserService: Send + Sync {
	/// `GET /users` with the given `$select`/`$filter`.
	async fn list_users(&self, access_token: &str, query: &UserQuery) -> Result<Vec<GraphUser>, GraphError>;

	/// `POST /users`. `None` when Graph accepted the request without returning the user.
	async fn create_user(&self, access_token: &str, user: &NewGraphUser) -> Result<Option<GraphUser>, GraphError>;
}

/// Microsoft Graph over HTTPS.
#[derive(Debug, Clone)]
pub struct GraphHttpClient {
	http: reqwest::Client,
	base_url: String,
}

#[derive(Deserialize)]
struct UserCollection {
	#[serde(default)]
	value: Vec<GraphUser>,
}

#[derive(Deserialize)]
struct ErrorEnvelope {
	error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
	code: Option<String>,
	message: Option<String>,
}

impl GraphHttpClient {
	#[must_use]
	pub fn new(http: reqwest::Client, base_url: &str) -> Self {
		Self { http, base_url: base_url.trim_end_matches('/').to_string() }
	}

	fn users_url(&self) -> String {
		format!("{}/users", self.base_url)
	}
}

#[rocket::async_trait]
impl GraphUserService for GraphHttpClient {
	async fn list_users(&self, access_token: &str, query: &UserQuery) -> Result<Vec<GraphUser>, GraphError> {
		debug!(filter = %query.filter, "querying Graph users");
		let response = self.http.get(self.users_url()).bearer_auth(access_token).query(&query.to_pairs()).send().await?;
		let response = error_for_status(response).await?;

		let collection: UserCollection = response.json().await?;
		Ok(collection.value)
	}

	async fn create_user(&self, access_token: &str, user: &NewGraphUser) -> Result<Option<GraphUser>, GraphError> {
		debug!(user_principal_name = %user.user_principal_name, "creating Graph user");
		let response = self.http.post(self.users_url()).bearer_auth(access_token).json(user).send().await?;
		let response = error_for_status(response).await?;

		let body = response.bytes().await?;
		if body.is_empty() {
			return Ok(None);
		}
		Ok(serde_json::from_slice(&body)?)
	}
}

/// Turns a non-success response into [`GraphError::Service`] carrying Graph's own message.
async fn error_for_status(response: Response) -> Result<Response, GraphError> {
	let status = response.status();
	if status.is_success() {
		return Ok(response);
	}

	let body = response.text().await.unwrap_or_default();
	Err(service_error(status, &body))
}

fn service_error(status: StatusCode, body: &str) -> GraphError {
	let (code, message) = match serde_json::from_str::<ErrorEnvelope>(body) {
		Ok(envelope) => (envelope.error.code, envelope.error.message),
		Err(_) => (None, None),
	};
	let message = message.filter(|m| !m.is_empty()).unwrap_or_else(|| {
		if body.trim().is_empty() {
			status.canonical_reason().unwrap_or("Unknown error").to_string()
		} else {
			body.trim().to_string()
		}
	});

	GraphError::Service { status: status.as_u16(), code, message }
}
