use rocket::{catch, get, Request};

use crate::auth::remove_cookie;
use crate::state::Services;
use crate::user_types::{SessionDropped, User};

pub mod authentication;
pub mod users;

/// Landing page after sign-in and sign-out.
#[get("/")]
pub fn index(user: Option<User>) -> String {
	match user.and_then(|user| user.session.name.or(user.session.preferred_username)) {
		Some(name) => format!("Signed in as {name}"),
		None => "Not signed in".to_string(),
	}
}

/// Also clears a session cookie the guards refused.
#[catch(401)]
pub fn unauthorized(request: &Request<'_>) -> &'static str {
	if SessionDropped::is_set(request) {
		if let Some(services) = request.rocket().state::<Services>() {
			remove_cookie(request.cookies(), &services.config.session.cookie_name);
		}
	}
	"Authentication required."
}
