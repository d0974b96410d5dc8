use std::sync::Arc;

use crate::auth::{sign_in_scopes, TokenAcquisition, TokenCache};
use crate::config::AppConfig;
use crate::graph::{GraphHttpClient, GraphUserService};
use crate::secrets::SessionKey;
use crate::tokens::{EntraIdentityProvider, IdentityProvider};

///
/// # Services
/// Everything the routes and request guards share, managed by Rocket.
///
pub struct Services {
	pub config: AppConfig,
	pub session_key: SessionKey,
	pub graph: Arc<dyn GraphUserService>,
	pub identity: Arc<dyn IdentityProvider>,
	pub token_cache: Arc<TokenCache>,
	pub tokens: TokenAcquisition,
}

impl Services {
	pub fn new(config: AppConfig, session_key: SessionKey, graph: Arc<dyn GraphUserService>, identity: Arc<dyn IdentityProvider>) -> Self {
		let token_cache = Arc::new(TokenCache::new());
		let tokens = TokenAcquisition::new(token_cache.clone(), identity.clone());
		Self { config, session_key, graph, identity, token_cache, tokens }
	}

	/// Wires the real Microsoft Graph and Entra ID clients.
	///
	/// # Errors
	/// Fails if the HTTP client cannot be built (TLS backend initialisation).
	pub fn from_config(config: AppConfig, session_key: SessionKey) -> Result<Self, reqwest::Error> {
		let http = reqwest::Client::builder().user_agent(concat!("travelbook/", env!("CARGO_PKG_VERSION"))).build()?;
		let graph = Arc::new(GraphHttpClient::new(http.clone(), &config.microsoft_graph.base_url));
		let identity = Arc::new(EntraIdentityProvider::new(http, &config.azure_ad));
		Ok(Self::new(config, session_key, graph, identity))
	}

	/// Scopes requested at sign-in.
	#[must_use]
	pub fn sign_in_scopes(&self) -> Vec<String> {
		sign_in_scopes(&self.config.microsoft_graph.scopes())
	}
}
