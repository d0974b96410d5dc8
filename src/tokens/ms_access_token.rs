#![deny(missing_docs)]
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::config::AzureAdConfig;

/// # Microsoft Azure Active Directory Authentication Token
/// Response of the Entra ID token endpoint. The access token is used to call the
/// Microsoft Graph API on behalf of the signed-in user.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MSAccessToken {
	/// Type of token
	#[serde(default)]
	pub token_type: String,
	/// Expiration duration in seconds
	pub expires_in: u64,
	/// Extension expiration duration
	#[serde(default)]
	pub ext_expires_in: u64,
	/// Token
	pub access_token: String,
	/// Refresh token, present when `offline_access` was granted
	#[serde(default)]
	pub refresh_token: Option<String>,
	/// OpenID Connect ID token, present on code redemption
	#[serde(default)]
	pub id_token: Option<String>,
	/// Space-separated scopes actually granted
	#[serde(default)]
	pub scope: Option<String>,
}

impl MSAccessToken {
	/// Granted scopes, lower-cased. Graph scopes come back fully qualified
	/// (`https://graph.microsoft.com/User.Read`); the resource prefix is dropped.
	#[must_use]
	pub fn granted_scopes(&self) -> Vec<String> {
		self.scope
			.as_deref()
			.unwrap_or_default()
			.split_whitespace()
			.map(|scope| scope.rsplit('/').next().unwrap_or(scope).to_ascii_lowercase())
			.collect()
	}
}

/// Failure obtaining tokens from Entra ID.
#[derive(Debug, Error)]
pub enum IdentityError {
	/// The token endpoint refused the grant.
	#[error("{error}: {description}")]
	Rejected {
		/// OAuth error code, e.g. `invalid_grant`
		error: String,
		/// Human readable description
		description: String,
	},
	/// The application has no client secret configured.
	#[error("Entra ID client secret is not configured")]
	MissingClientSecret,
	/// The token endpoint could not be reached or answered garbage.
	#[error("Failed to reach the Entra ID token endpoint: {0}")]
	Transport(#[from] reqwest::Error),
}

impl IdentityError {
	/// True when the refresh token or authorization code is no longer usable.
	#[must_use]
	pub fn is_invalid_grant(&self) -> bool {
		matches!(self, Self::Rejected { error, .. } if error == "invalid_grant")
	}
}

/// # Identity Provider
/// Token endpoint operations used by sign-in and token acquisition.
#[rocket::async_trait]
pub trait IdentityProvider: Send + Sync {
	/// Redeems an authorization code (with its PKCE verifier) for tokens.
	async fn redeem_code(&self, code: &str, redirect_uri: &str, code_verifier: &str, scopes: &[String]) -> Result<MSAccessToken, IdentityError>;

	/// Exchanges a refresh token for a new access token covering `scopes`.
	async fn refresh(&self, refresh_token: &str, scopes: &[String]) -> Result<MSAccessToken, IdentityError>;
}

/// # Entra ID Identity Provider
/// Posts form-encoded grants to `{authority}/token` as a confidential client.
#[derive(Debug, Clone)]
pub struct EntraIdentityProvider {
	http: reqwest::Client,
	token_endpoint: String,
	client_id: String,
	client_secret: Option<String>,
}

#[derive(Deserialize)]
struct TokenErrorResponse {
	error: String,
	#[serde(default)]
	error_description: String,
}

impl EntraIdentityProvider {
	/// Builds a provider for the application registration in `azure`.
	#[must_use]
	pub fn new(http: reqwest::Client, azure: &AzureAdConfig) -> Self {
		Self { http, token_endpoint: format!("{}/token", azure.authority()), client_id: azure.client_id.clone(), client_secret: azure.client_secret.clone() }
	}

	async fn request_token(&self, grant: &[(&str, &str)]) -> Result<MSAccessToken, IdentityError> {
		let Some(client_secret) = self.client_secret.as_deref() else {
			return Err(IdentityError::MissingClientSecret);
		};

		let mut params = vec![("client_id", self.client_id.as_str()), ("client_secret", client_secret)];
		params.extend_from_slice(grant);

		let response = self.http.post(&self.token_endpoint).form(&params).send().await?;
		let status = response.status();
		if status.is_success() {
			return Ok(response.json::<MSAccessToken>().await?);
		}

		let body = response.text().await.unwrap_or_default();
		debug!(%status, "token endpoint refused grant");
		match serde_json::from_str::<TokenErrorResponse>(&body) {
			Ok(error) => Err(IdentityError::Rejected { error: error.error, description: error.error_description }),
			Err(_) => Err(IdentityError::Rejected { error: status.as_u16().to_string(), description: body }),
		}
	}
}

#[rocket::async_trait]
impl IdentityProvider for EntraIdentityProvider {
	async fn redeem_code(&self, code: &str, redirect_uri: &str, code_verifier: &str, scopes: &[String]) -> Result<MSAccessToken, IdentityError> {
		let scope = scopes.join(" ");
		self.request_token(&[
			("grant_type", "authorization_code"),
			("code", code),
			("redirect_uri", redirect_uri),
			("code_verifier", code_verifier),
			("scope", scope.as_str()),
		])
		.await
	}

	async fn refresh(&self, refresh_token: &str, scopes: &[String]) -> Result<MSAccessToken, IdentityError> {
		let scope = scopes.join(" ");
		self.request_token(&[("grant_type", "refresh_token"), ("refresh_token", refresh_token), ("scope", scope.as_str())]).await
	}
}
