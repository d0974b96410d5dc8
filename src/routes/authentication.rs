use rocket::form::{Form, Lenient};
use rocket::http::CookieJar;
use rocket::response::Redirect;
use rocket::{get, post, routes, FromForm, Route, State};
use tracing::info;

use crate::auth::{
	authorize_url, current_session, end_session_url, random_token, remove_cookie, session_cookie, sign_in_cookie, AuthorizationRequest, CachedAccount, Pkce,
	SIGN_IN_COOKIE,
};
use crate::error::AuthError;
use crate::state::Services;
use crate::tokens::{AppStateTokenClaims, IdTokenClaims, UserJWTTokenClaims};
use crate::user_types::{AppState, PublicOrigin};

/// Routes mounted under `/Authentication`.
#[must_use]
pub fn routes() -> Vec<Route> {
	routes![log_in, log_out]
}

/// Routes mounted at `azure_ad.callback_path`.
#[must_use]
pub fn callback_routes() -> Vec<Route> {
	routes![sign_in_callback, sign_in_callback_form_post]
}

/// Routes mounted at `azure_ad.signed_out_callback_path`.
#[must_use]
pub fn signed_out_routes() -> Vec<Route> {
	routes![signed_out]
}

///
/// # Log In
/// Challenges the user: redirects to the Entra ID authorize endpoint and sets
/// the correlation cookie. A login hint from an existing session is forwarded
/// so that Entra ID can pick the right account silently.
///
#[get("/LogIn")]
pub fn log_in(origin: PublicOrigin, services: &State<Services>, cookies: &CookieJar<'_>) -> Result<Redirect, AuthError> {
	let azure = &services.config.azure_ad;
	let login_hint = current_session(cookies, &services.config.session, &services.session_key).and_then(|session| session.login_hint);

	let pkce = Pkce::generate();
	let state = random_token();
	let nonce = random_token();
	let scopes = services.sign_in_scopes();
	let redirect_uri = origin.url(&azure.callback_path);

	let url = authorize_url(
		azure,
		&AuthorizationRequest {
			redirect_uri: &redirect_uri,
			scopes: &scopes,
			state: &state,
			nonce: &nonce,
			code_challenge: &pkce.challenge,
			login_hint: login_hint.as_deref(),
		},
	)?;

	let app_state = AppStateTokenClaims::new("/".to_string(), state, nonce, pkce.verifier);
	cookies.add(sign_in_cookie(app_state.encode(&services.session_key)?));

	Ok(Redirect::to(url.to_string()))
}

///
/// # Log Out
/// Drops the session cookie and the cached tokens, then signs the user out of
/// Entra ID with the ID token and login hint of the session as hints.
///
#[post("/LogOut")]
pub fn log_out(origin: PublicOrigin, services: &State<Services>, cookies: &CookieJar<'_>) -> Result<Redirect, AuthError> {
	let azure = &services.config.azure_ad;
	let session = current_session(cookies, &services.config.session, &services.session_key);
	remove_cookie(cookies, &services.config.session.cookie_name);

	if let Some(session) = &session {
		services.token_cache.remove(&session.account_id);
		info!(account_id = %session.account_id, "user signed out");
	}

	let post_logout_redirect_uri = azure.signed_out_redirect_uri.clone().unwrap_or_else(|| origin.url(&azure.signed_out_callback_path));
	let url = end_session_url(
		azure,
		session.as_ref().and_then(|session| session.id_token.as_deref()),
		session.as_ref().and_then(|session| session.login_hint.as_deref()),
		Some(&post_logout_redirect_uri),
	)?;

	Ok(Redirect::to(url.to_string()))
}

/// Parameters Entra ID sends back to the redirect URI.
#[derive(Debug, Default, FromForm)]
pub struct SignInCallback {
	pub code: Option<String>,
	pub state: Option<String>,
	pub error: Option<String>,
	pub error_description: Option<String>,
}

#[get("/?<callback..>")]
pub async fn sign_in_callback(
	callback: SignInCallback,
	app_state: Result<AppState, AuthError>,
	origin: PublicOrigin,
	services: &State<Services>,
	cookies: &CookieJar<'_>,
) -> Result<Redirect, AuthError> {
	complete_sign_in(callback, app_state, &origin, services, cookies).await
}

#[post("/", data = "<callback>")]
pub async fn sign_in_callback_form_post(
	callback: Form<Lenient<SignInCallback>>,
	app_state: Result<AppState, AuthError>,
	origin: PublicOrigin,
	services: &State<Services>,
	cookies: &CookieJar<'_>,
) -> Result<Redirect, AuthError> {
	complete_sign_in(callback.into_inner().into_inner(), app_state, &origin, services, cookies).await
}

///
/// # Complete Sign-in
/// Checks the callback against the correlation cookie, redeems the code,
/// caches the tokens and issues the session cookie.
///
async fn complete_sign_in(
	callback: SignInCallback,
	app_state: Result<AppState, AuthError>,
	origin: &PublicOrigin,
	services: &Services,
	cookies: &CookieJar<'_>,
) -> Result<Redirect, AuthError> {
	remove_cookie(cookies, SIGN_IN_COOKIE);

	if let Some(error) = callback.error {
		return Err(AuthError::IdentityProvider { error, description: callback.error_description.unwrap_or_default() });
	}

	let app_state = app_state?.token;
	if callback.state.as_deref() != Some(app_state.state.as_str()) {
		return Err(AuthError::SignInStateMismatch);
	}
	let Some(code) = callback.code else {
		return Err(AuthError::MissingCode);
	};

	let azure = &services.config.azure_ad;
	let scopes = services.sign_in_scopes();
	let redirect_uri = origin.url(&azure.callback_path);
	let token = services.identity.redeem_code(&code, &redirect_uri, &app_state.code_verifier, &scopes).await.map_err(AuthError::CodeRedemption)?;

	let Some(id_token) = token.id_token.clone() else {
		return Err(AuthError::InvalidIdToken("missing from token response".to_string()));
	};
	let claims = IdTokenClaims::decode(&id_token, &azure.client_id).map_err(|e| AuthError::InvalidIdToken(e.to_string()))?;
	if claims.nonce.as_deref() != Some(app_state.nonce.as_str()) {
		return Err(AuthError::NonceMismatch);
	}

	services.token_cache.store(CachedAccount::from_token(claims.account_id(), claims.preferred_username.clone(), &token, &scopes));

	let session = UserJWTTokenClaims::from_id_token(&claims, id_token, services.config.session.lifetime_secs());
	cookies.add(session_cookie(&services.config.session, session.encode(&services.session_key)?));
	info!(account_id = %session.account_id, "user signed in");

	Ok(Redirect::to(local_return_uri(app_state.uri)))
}

/// Only same-site paths are followed after sign-in.
fn local_return_uri(uri: Option<String>) -> String {
	match uri {
		Some(uri) if uri.starts_with('/') && !uri.starts_with("//") => uri,
		_ => "/".to_string(),
	}
}

#[get("/")]
pub fn signed_out() -> Redirect {
	Redirect::to("/")
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn return_uri_must_stay_on_site() {
		assert_eq!(local_return_uri(Some("/trips".to_string())), "/trips");
		assert_eq!(local_return_uri(Some("//evil.example".to_string())), "/");
		assert_eq!(local_return_uri(Some("https://evil.example".to_string())), "/");
		assert_eq!(local_return_uri(None), "/");
	}
}
