use rocket::request::{self, FromRequest, Outcome, Request};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::failure;
use crate::auth::{remove_cookie, session_cookie, validate_principal, PrincipalValidation, TokenAcquisitionError};
use crate::error::AuthError;
use crate::state::Services;
use crate::tokens::UserJWTTokenClaims;

///
/// # User
/// Stores the signed-in user data.
///
/// ## Fields
/// session: The JSON Web Token claims of the session cookie on the user's machine.
///
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
	pub session: UserJWTTokenClaims,
}

///
/// # User - FromRequest
/// Gets the user from the session cookie. The cookie must be validly signed and
/// unexpired, and the server must still hold tokens for the account; otherwise
/// the cookie is dropped and the request is refused with `401`.
///
/// Past half of its lifetime the cookie is re-issued (sliding expiration).
///
#[rocket::async_trait]
impl<'r> FromRequest<'r> for User {
	type Error = AuthError;

	async fn from_request(request: &'r Request<'_>) -> request::Outcome<Self, Self::Error> {
		let Some(services) = request.rocket().state::<Services>() else {
			return failure(AuthError::Unconfigured);
		};
		let config = &services.config.session;
		let cookies = request.cookies();

		let Some(cookie) = cookies.get(&config.cookie_name) else {
			return failure(AuthError::MissingSession);
		};

		let session = match UserJWTTokenClaims::decode(cookie.value(), &services.session_key) {
			Ok(session) => session,
			Err(e) => {
				debug!("dropping unreadable session cookie: {e}");
				return drop_session(request, &config.cookie_name, AuthError::InvalidSession);
			}
		};

		match validate_principal(&services.tokens, &session).await {
			Ok(PrincipalValidation::Accepted) => (),
			Ok(PrincipalValidation::Rejected) => return drop_session(request, &config.cookie_name, AuthError::PrincipalRejected),
			Err(e @ TokenAcquisitionError::UiRequired { .. }) => return drop_session(request, &config.cookie_name, e.into()),
			Err(e) => return failure(e.into()),
		}

		if session.needs_renewal() {
			let renewed = session.renewed(config.lifetime_secs());
			match renewed.encode(&services.session_key) {
				Ok(token) => cookies.add(session_cookie(config, token)),
				Err(e) => return failure(e.into()),
			}
			return Outcome::Success(Self { session: renewed });
		}

		Outcome::Success(Self { session })
	}
}

/// Set on requests whose session cookie was refused.
///
/// Rocket discards cookie changes made by a failing guard once the request
/// reaches a catcher, so the 401 catcher clears the cookie again when it sees
/// this mark.
#[derive(Debug, Clone, Copy, Default)]
pub struct SessionDropped(pub bool);

impl SessionDropped {
	/// True when a guard refused the session cookie of `request`.
	#[must_use]
	pub fn is_set(request: &Request<'_>) -> bool {
		request.local_cache(Self::default).0
	}
}

fn drop_session<T>(request: &Request<'_>, cookie_name: &str, error: AuthError) -> request::Outcome<T, AuthError> {
	request.local_cache(|| SessionDropped(true));
	remove_cookie(request.cookies(), cookie_name);
	failure(error)
}
