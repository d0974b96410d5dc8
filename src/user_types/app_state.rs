use rocket::request::{self, FromRequest, Outcome, Request};
use serde::{Deserialize, Serialize};

use super::failure;
use crate::auth::SIGN_IN_COOKIE;
use crate::error::AuthError;
use crate::state::Services;
use crate::tokens::AppStateTokenClaims;

///
/// # Application State
/// Keeps track of the sign-in in progress.
///
/// token: Contains the claims correlating the sign-in redirect with its callback.
///
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppState {
	pub token: AppStateTokenClaims,
}

///
/// # AppState - FromRequest
/// Reads the sign-in correlation cookie. Missing, forged or stale cookies fail with `400`.
///
#[rocket::async_trait]
impl<'r> FromRequest<'r> for AppState {
	type Error = AuthError;

	async fn from_request(request: &'r Request<'_>) -> request::Outcome<Self, Self::Error> {
		let Some(services) = request.rocket().state::<Services>() else {
			return failure(AuthError::Unconfigured);
		};
		let Some(cookie) = request.cookies().get(SIGN_IN_COOKIE) else {
			return failure(AuthError::MissingSignInState);
		};

		match AppStateTokenClaims::decode(cookie.value(), &services.session_key) {
			Ok(token) => Outcome::Success(Self { token }),
			Err(_) => failure(AuthError::MissingSignInState),
		}
	}
}
