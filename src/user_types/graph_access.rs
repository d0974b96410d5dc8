use rocket::outcome::try_outcome;
use rocket::request::{self, FromRequest, Outcome, Request};

use super::{failure, User};
use crate::auth::USERS_API_SCOPES;
use crate::error::AuthError;
use crate::state::Services;

///
/// # Graph Access
/// A signed-in [`User`] together with a delegated access token covering the
/// Microsoft Graph scopes of the users API.
///
/// If the token cannot be obtained silently the request is refused with `401`
/// so that the caller sends the user through sign-in again.
///
pub struct GraphAccess {
	pub user: User,
	pub access_token: String,
}

impl std::fmt::Debug for GraphAccess {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("GraphAccess").field("user", &self.user).finish_non_exhaustive()
	}
}

#[rocket::async_trait]
impl<'r> FromRequest<'r> for GraphAccess {
	type Error = AuthError;

	async fn from_request(request: &'r Request<'_>) -> request::Outcome<Self, Self::Error> {
		let user = try_outcome!(request.guard::<User>().await);
		let Some(services) = request.rocket().state::<Services>() else {
			return failure(AuthError::Unconfigured);
		};

		match services.tokens.access_token_for_user(&user.session.account_id, &USERS_API_SCOPES).await {
			Ok(access_token) => Outcome::Success(Self { user, access_token }),
			Err(e) => failure(e.into()),
		}
	}
}
