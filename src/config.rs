use std::path::PathBuf;

use rocket::figment::providers::Env;
use rocket::figment::Figment;
use serde::{Deserialize, Deserializer};
use thiserror::Error;

/// Docker secret holding the Entra ID client secret when `use_entra_id` is set.
pub const DOCKER_CLIENT_SECRET_NAME: &str = "travelbook_azure_client_secret";

/// Configuration loading and validation errors.
#[derive(Debug, Error)]
pub enum ConfigError {
	#[error("Failed to read configuration: {0}")]
	Figment(#[from] Box<rocket::figment::Error>),

	#[error("Azure domain is not set in configuration")]
	MissingDomain,

	#[error("Missing configuration value: {0}")]
	Missing(&'static str),

	#[error("{key} must be an absolute path starting with '/', got {value:?}")]
	InvalidPath { key: &'static str, value: String },
}

///
/// # Application Configuration
/// Everything the service needs besides Rocket's own server settings.
///
/// Values come from `Rocket.toml` (selected profile), `ROCKET_*` variables and
/// `TRAVELBOOK_*` variables, the latter using `__` to separate nested keys, e.g.
/// `TRAVELBOOK_AZURE_AD__CLIENT_SECRET`.
///
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
	#[serde(default)]
	pub azure_ad: AzureAdConfig,
	#[serde(default)]
	pub key_vault: KeyVaultConfig,
	#[serde(default, deserialize_with = "deserialize_flag")]
	pub use_entra_id: bool,
	#[serde(default)]
	pub microsoft_graph: MicrosoftGraphConfig,
	#[serde(default = "default_secrets_dir")]
	pub secrets_dir: PathBuf,
	#[serde(default)]
	pub session: SessionConfig,
}

/// Entra ID application registration.
#[derive(Debug, Clone, Deserialize)]
pub struct AzureAdConfig {
	#[serde(default = "default_instance")]
	pub instance: String,
	#[serde(default)]
	pub domain: String,
	#[serde(default)]
	pub tenant_id: String,
	#[serde(default)]
	pub client_id: String,
	#[serde(default)]
	pub client_secret: Option<String>,
	#[serde(default = "default_callback_path")]
	pub callback_path: String,
	#[serde(default = "default_signed_out_callback_path")]
	pub signed_out_callback_path: String,
	#[serde(default)]
	pub signed_out_redirect_uri: Option<String>,
}

impl Default for AzureAdConfig {
	fn default() -> Self {
		Self {
			instance: default_instance(),
			domain: String::new(),
			tenant_id: String::new(),
			client_id: String::new(),
			client_secret: None,
			callback_path: default_callback_path(),
			signed_out_callback_path: default_signed_out_callback_path(),
			signed_out_redirect_uri: None,
		}
	}
}

impl AzureAdConfig {
	/// `{instance}{tenant}/oauth2/v2.0`, the base of every Entra ID endpoint used here.
	#[must_use]
	pub fn authority(&self) -> String {
		format!("{}/{}/oauth2/v2.0", self.instance.trim_end_matches('/'), self.tenant_id)
	}
}

/// Optional Key Vault holding the Entra ID client secret.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct KeyVaultConfig {
	#[serde(default)]
	pub vault_uri: Option<String>,
	#[serde(default)]
	pub azure_ad_client_secret: Option<String>,
}

/// Downstream Microsoft Graph API.
#[derive(Debug, Clone, Deserialize)]
pub struct MicrosoftGraphConfig {
	#[serde(default = "default_graph_base_url")]
	pub base_url: String,
	#[serde(default = "default_graph_scopes")]
	pub scopes: String,
}

impl Default for MicrosoftGraphConfig {
	fn default() -> Self {
		Self { base_url: default_graph_base_url(), scopes: default_graph_scopes() }
	}
}

impl MicrosoftGraphConfig {
	/// Configured scopes, split on whitespace.
	#[must_use]
	pub fn scopes(&self) -> Vec<String> {
		self.scopes.split_whitespace().map(str::to_string).collect()
	}
}

/// Session cookie settings.
#[derive(Debug, Clone, Deserialize)]
pub struct SessionConfig {
	#[serde(default = "default_cookie_name")]
	pub cookie_name: String,
	#[serde(default = "default_lifetime_hours")]
	pub lifetime_hours: u64,
	#[serde(default)]
	pub signing_key: Option<String>,
	#[serde(default = "default_key_dir")]
	pub key_dir: PathBuf,
}

impl Default for SessionConfig {
	fn default() -> Self {
		Self { cookie_name: default_cookie_name(), lifetime_hours: default_lifetime_hours(), signing_key: None, key_dir: default_key_dir() }
	}
}

impl SessionConfig {
	/// Session lifetime in seconds.
	#[must_use]
	pub const fn lifetime_secs(&self) -> u64 {
		self.lifetime_hours * 3600
	}
}

impl Default for AppConfig {
	fn default() -> Self {
		Self {
			azure_ad: AzureAdConfig::default(),
			key_vault: KeyVaultConfig::default(),
			use_entra_id: false,
			microsoft_graph: MicrosoftGraphConfig::default(),
			secrets_dir: default_secrets_dir(),
			session: SessionConfig::default(),
		}
	}
}

impl AppConfig {
	/// Extracts the configuration from a figment without validating it.
	///
	/// # Errors
	/// Returns [`ConfigError::Figment`] if a value has the wrong shape.
	pub fn from_figment(figment: &Figment) -> Result<Self, ConfigError> {
		figment.extract().map_err(|e| ConfigError::Figment(Box::new(e)))
	}

	/// Checks the values every request path depends on.
	///
	/// # Errors
	/// Returns the first problem found.
	pub fn validate(&self) -> Result<(), ConfigError> {
		if self.azure_ad.domain.trim().is_empty() {
			return Err(ConfigError::MissingDomain);
		}
		if self.azure_ad.tenant_id.trim().is_empty() {
			return Err(ConfigError::Missing("azure_ad.tenant_id"));
		}
		if self.azure_ad.client_id.trim().is_empty() {
			return Err(ConfigError::Missing("azure_ad.client_id"));
		}
		check_path("azure_ad.callback_path", &self.azure_ad.callback_path)?;
		check_path("azure_ad.signed_out_callback_path", &self.azure_ad.signed_out_callback_path)?;
		Ok(())
	}
}

/// Rocket's figment extended with `TRAVELBOOK_*` environment variables.
#[must_use]
pub fn figment() -> Figment {
	rocket::Config::figment().merge(Env::prefixed("TRAVELBOOK_").split("__"))
}

fn check_path(key: &'static str, value: &str) -> Result<(), ConfigError> {
	if value.starts_with('/') && !value.contains(['?', '#', ' ']) {
		Ok(())
	} else {
		Err(ConfigError::InvalidPath { key, value: value.to_string() })
	}
}

/// Accepts a boolean or a string equal to `"true"` in any case.
fn deserialize_flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
	D: Deserializer<'de>,
{
	#[derive(Deserialize)]
	#[serde(untagged)]
	enum Flag {
		Bool(bool),
		Text(String),
	}

	Ok(match Flag::deserialize(deserializer)? {
		Flag::Bool(value) => value,
		Flag::Text(value) => value.trim().eq_ignore_ascii_case("true"),
	})
}

fn default_instance() -> String {
	"https://login.microsoftonline.com/".to_string()
}

fn default_callback_path() -> String {
	"/signin-oidc".to_string()
}

fn default_signed_out_callback_path() -> String {
	"/signout-callback-oidc".to_string()
}

fn default_graph_base_url() -> String {
	"https://graph.microsoft.com/v1.0".to_string()
}

fn default_graph_scopes() -> String {
	"user.read".to_string()
}

fn default_secrets_dir() -> PathBuf {
	PathBuf::from("/run/secrets")
}

fn default_cookie_name() -> String {
	".TravelBook.Auth".to_string()
}

const fn default_lifetime_hours() -> u64 {
	8
}

fn default_key_dir() -> PathBuf {
	PathBuf::from("/home/data-protection")
}
