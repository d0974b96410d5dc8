use rocket::http::Status;
use rocket::request::Request;
use rocket::response::{self, status::Custom, Responder};
use rocket::serde::json::{json, Json};
use thiserror::Error;

use crate::auth::TokenAcquisitionError;
use crate::tokens::IdentityError;

///
/// # Authentication Error
/// Raised by the request guards and the sign-in/sign-out routes.
///
#[derive(Debug, Error)]
pub enum AuthError {
	#[error("No session cookie")]
	MissingSession,

	#[error("Session cookie is invalid or expired")]
	InvalidSession,

	#[error("Session is no longer backed by cached tokens")]
	PrincipalRejected,

	#[error("User interaction required ({0})")]
	InteractionRequired(String),

	#[error("Failed to acquire an access token: {0}")]
	TokenAcquisition(IdentityError),

	#[error("Request has no host")]
	MissingHost,

	#[error("No sign-in in progress")]
	MissingSignInState,

	#[error("Sign-in state does not match")]
	SignInStateMismatch,

	#[error("Sign-in nonce does not match")]
	NonceMismatch,

	#[error("No authorization code in the sign-in response")]
	MissingCode,

	#[error("Sign-in failed: {error}: {description}")]
	IdentityProvider { error: String, description: String },

	#[error("Failed to redeem the authorization code: {0}")]
	CodeRedemption(IdentityError),

	#[error("Invalid ID token: {0}")]
	InvalidIdToken(String),

	#[error("Failed to sign cookie: {0}")]
	Cookie(#[from] jsonwebtoken::errors::Error),

	#[error("Invalid identity provider URL: {0}")]
	Url(#[from] url::ParseError),

	#[error("Application services are not configured")]
	Unconfigured,
}

impl AuthError {
	#[must_use]
	pub const fn status(&self) -> Status {
		match self {
			Self::MissingSession | Self::InvalidSession | Self::PrincipalRejected | Self::InteractionRequired(_) | Self::IdentityProvider { .. } => Status::Unauthorized,
			Self::MissingHost | Self::MissingSignInState | Self::SignInStateMismatch | Self::NonceMismatch | Self::MissingCode => Status::BadRequest,
			Self::CodeRedemption(_) | Self::InvalidIdToken(_) => Status::BadGateway,
			Self::TokenAcquisition(_) | Self::Cookie(_) | Self::Url(_) | Self::Unconfigured => Status::InternalServerError,
		}
	}
}

impl From<TokenAcquisitionError> for AuthError {
	fn from(error: TokenAcquisitionError) -> Self {
		match error {
			TokenAcquisitionError::UiRequired { error_code } => Self::InteractionRequired(error_code),
			TokenAcquisitionError::Provider(e) => Self::TokenAcquisition(e),
		}
	}
}

impl<'r> Responder<'r, 'static> for AuthError {
	fn respond_to(self, request: &'r Request<'_>) -> response::Result<'static> {
		(self.status(), self.to_string()).respond_to(request)
	}
}

///
/// # Users API Error
/// Lookup failures. Both variants answer `500` with the message as body, the
/// Graph variant carrying Graph's own message.
///
#[derive(Debug, Error)]
pub enum ApiError {
	#[error("Graph API error: {0}")]
	Graph(String),

	#[error("TravelBook API error: {0}")]
	TravelBook(String),
}

impl<'r> Responder<'r, 'static> for ApiError {
	fn respond_to(self, request: &'r Request<'_>) -> response::Result<'static> {
		(Status::InternalServerError, self.to_string()).respond_to(request)
	}
}

/// Message returned when a creation request lacks a display name or nickname.
pub const MANDATORY_FIELDS_MESSAGE: &str = "DisplayName et MailNickName are mandatory.";

/// Failures of `api/users/CreateUser`.
#[derive(Debug, Error)]
pub enum CreateUserError {
	#[error("{}", MANDATORY_FIELDS_MESSAGE)]
	MissingFields,

	#[error("The user registration failed.")]
	RegistrationFailed,

	/// Graph refused the request; its status is mirrored.
	#[error("{message}")]
	Graph { status: u16, message: String },

	#[error("{0}")]
	Unexpected(String),
}

impl<'r> Responder<'r, 'static> for CreateUserError {
	fn respond_to(self, request: &'r Request<'_>) -> response::Result<'static> {
		match self {
			Self::MissingFields => (Status::BadRequest, self.to_string()).respond_to(request),
			Self::RegistrationFailed => (Status::InternalServerError, self.to_string()).respond_to(request),
			Self::Graph { status, message } => {
				let status = Status::from_code(status).unwrap_or(Status::InternalServerError);
				Custom(status, Json(json!({ "error": message }))).respond_to(request)
			}
			Self::Unexpected(message) => Custom(Status::InternalServerError, Json(json!({ "error": message }))).respond_to(request),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn missing_account_maps_to_unauthorized() {
		let error = AuthError::from(TokenAcquisitionError::UiRequired { error_code: "user_null".to_string() });

		assert_eq!(error.status(), Status::Unauthorized);
		assert_eq!(error.to_string(), "User interaction required (user_null)");
	}

	#[test]
	fn api_errors_prefix_their_origin() {
		assert_eq!(ApiError::Graph("Insufficient privileges".to_string()).to_string(), "Graph API error: Insufficient privileges");
		assert_eq!(ApiError::TravelBook("Graph API error".to_string()).to_string(), "TravelBook API error: Graph API error");
	}

	#[test]
	fn missing_fields_uses_the_mandatory_fields_message() {
		assert_eq!(CreateUserError::MissingFields.to_string(), MANDATORY_FIELDS_MESSAGE);
		assert_eq!(MANDATORY_FIELDS_MESSAGE, "DisplayName et MailNickName are mandatory.");
	}
}
