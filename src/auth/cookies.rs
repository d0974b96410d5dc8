use rocket::http::{Cookie, CookieJar, SameSite};
use rocket::time::Duration;

use crate::config::SessionConfig;
use crate::secrets::SessionKey;
use crate::tokens::{UserJWTTokenClaims, SIGN_IN_LIFETIME_SECS};

/// Correlation cookie of an in-progress sign-in.
pub const SIGN_IN_COOKIE: &str = ".TravelBook.Oidc";

/// The session cookie. `SameSite=None` so it survives the cross-site POSTs of the
/// sign-in/sign-out round trips; which in turn requires `Secure`.
#[must_use]
pub fn session_cookie(config: &SessionConfig, value: String) -> Cookie<'static> {
	auth_cookie(config.cookie_name.clone(), value, config.lifetime_secs())
}

#[must_use]
pub fn sign_in_cookie(value: String) -> Cookie<'static> {
	auth_cookie(SIGN_IN_COOKIE.to_string(), value, SIGN_IN_LIFETIME_SECS)
}

fn auth_cookie(name: String, value: String, max_age_secs: u64) -> Cookie<'static> {
	Cookie::build((name, value))
		.path("/")
		.secure(true)
		.http_only(true)
		.same_site(SameSite::None)
		.max_age(Duration::seconds(i64::try_from(max_age_secs).unwrap_or(i64::MAX)))
		.build()
}

pub fn remove_cookie(jar: &CookieJar<'_>, name: &str) {
	jar.remove(Cookie::build((name.to_string(), "")).path("/"));
}

/// The session carried by the request, checked for signature and expiry only.
#[must_use]
pub fn current_session(jar: &CookieJar<'_>, config: &SessionConfig, key: &SessionKey) -> Option<UserJWTTokenClaims> {
	let cookie = jar.get(&config.cookie_name)?;
	UserJWTTokenClaims::decode(cookie.value(), key).ok()
}
