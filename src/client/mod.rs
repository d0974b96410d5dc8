//! Typed HTTP client for the users API, as used by front ends.

use thiserror::Error;

pub use create_user::{CreateUserForm, CreateUserFormModel, FieldError};
pub use transport::{ApiResponse, ApiTransport, HttpApiTransport};
pub use users_service::UsersService;

mod create_user;
mod transport;
mod users_service;

/// Failure calling the users API.
#[derive(Debug, Error)]
pub enum ClientError {
	#[error("{0}")]
	Transport(#[from] reqwest::Error),

	#[error("Invalid API base URL: {0}")]
	InvalidBaseUrl(#[from] url::ParseError),

	#[error("{0}")]
	Decode(#[from] serde_json::Error),

	/// The API answered with a non-success status.
	#[error("{reason}{}", detail.as_ref().map(|detail| format!(": {detail}")).unwrap_or_default())]
	Api { status: u16, reason: String, detail: Option<String> },
}
