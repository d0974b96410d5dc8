use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use rand::random;
use sha2::{Digest, Sha256};
use url::Url;

use crate::config::AzureAdConfig;

/// Scopes the users controller needs on Microsoft Graph.
pub const USERS_API_SCOPES: [&str; 3] = ["user.read", "user.readwrite.all", "device.read.all"];

/// URL-safe random value for `state` and `nonce`.
#[must_use]
pub fn random_token() -> String {
	URL_SAFE_NO_PAD.encode(random::<[u8; 32]>())
}

/// PKCE verifier and its S256 challenge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pkce {
	pub verifier: String,
	pub challenge: String,
}

impl Pkce {
	#[must_use]
	pub fn generate() -> Self {
		Self::from_verifier(random_token())
	}

	#[must_use]
	pub fn from_verifier(verifier: String) -> Self {
		let challenge = URL_SAFE_NO_PAD.encode(Sha256::digest(verifier.as_bytes()));
		Self { verifier, challenge }
	}
}

///
/// # Sign-in Scopes
/// OpenID scopes plus everything the users controller and the configured
/// Microsoft Graph section need, without duplicates.
///
#[must_use]
pub fn sign_in_scopes(graph_scopes: &[String]) -> Vec<String> {
	let mut scopes: Vec<String> = ["openid", "profile", "offline_access"].into_iter().chain(USERS_API_SCOPES).map(str::to_string).collect();
	for scope in graph_scopes {
		let scope = scope.to_ascii_lowercase();
		if !scopes.contains(&scope) {
			scopes.push(scope);
		}
	}
	scopes
}

/// Parameters of one authorization request.
#[derive(Debug, Clone)]
pub struct AuthorizationRequest<'a> {
	pub redirect_uri: &'a str,
	pub scopes: &'a [String],
	pub state: &'a str,
	pub nonce: &'a str,
	pub code_challenge: &'a str,
	pub login_hint: Option<&'a str>,
}

/// `{authority}/authorize?...` for the authorization code flow with PKCE.
///
/// # Errors
/// Fails when the configured instance is not a valid URL.
pub fn authorize_url(azure: &AzureAdConfig, request: &AuthorizationRequest<'_>) -> Result<Url, url::ParseError> {
	let scope = request.scopes.join(" ");
	let mut params = vec![
		("client_id", azure.client_id.as_str()),
		("response_type", "code"),
		("redirect_uri", request.redirect_uri),
		("response_mode", "query"),
		("scope", scope.as_str()),
		("state", request.state),
		("nonce", request.nonce),
		("code_challenge", request.code_challenge),
		("code_challenge_method", "S256"),
	];
	if let Some(login_hint) = request.login_hint {
		params.push(("login_hint", login_hint));
	}

	Url::parse_with_params(&format!("{}/authorize", azure.authority()), params)
}

/// `{authority}/logout?...`, Entra ID's end-session endpoint.
///
/// # Errors
/// Fails when the configured instance is not a valid URL.
pub fn end_session_url(azure: &AzureAdConfig, id_token_hint: Option<&str>, logout_hint: Option<&str>, post_logout_redirect_uri: Option<&str>) -> Result<Url, url::ParseError> {
	let mut url = Url::parse(&format!("{}/logout", azure.authority()))?;
	{
		let mut query = url.query_pairs_mut();
		if let Some(id_token_hint) = id_token_hint {
			query.append_pair("id_token_hint", id_token_hint);
		}
		if let Some(logout_hint) = logout_hint {
			query.append_pair("logout_hint", logout_hint);
		}
		if let Some(uri) = post_logout_redirect_uri {
			query.append_pair("post_logout_redirect_uri", uri);
		}
	}
	if url.query() == Some("") {
		url.set_query(None);
	}
	Ok(url)
}
