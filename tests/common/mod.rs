#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use chrono::{Duration, Utc};
use rocket::http::{Cookie, Header};
use rocket::local::asynchronous::Client;
use travelbook::auth::{CachedAccount, TokenCache};
use travelbook::config::{AppConfig, AzureAdConfig};
use travelbook::graph::{GraphError, GraphUser, GraphUserService, NewGraphUser, UserQuery};
use travelbook::secrets::SessionKey;
use travelbook::tokens::{IdentityError, IdentityProvider, MSAccessToken, UserJWTTokenClaims};
use travelbook::Services;

pub const ACCOUNT_ID: &str = "oid-1.tid-1";
pub const CLIENT_ID: &str = "client-1";
pub const HOST: &str = "travelbook.example";

/// Graph stand-in answering with canned results and recording what it was sent.
#[derive(Default)]
pub struct FakeGraph {
	pub users: Mutex<Vec<GraphUser>>,
	pub list_error: Mutex<Option<(u16, String)>>,
	pub created: Mutex<Option<Result<Option<GraphUser>, (u16, String)>>>,
	pub queries: Mutex<Vec<UserQuery>>,
	pub new_users: Mutex<Vec<NewGraphUser>>,
	pub tokens: Mutex<Vec<String>>,
}

impl FakeGraph {
	pub fn with_users(users: Vec<GraphUser>) -> Self {
		Self { users: Mutex::new(users), ..Self::default() }
	}
}

fn service_error((status, message): (u16, String)) -> GraphError {
	GraphError::Service { status, code: Some("Request_BadRequest".to_string()), message }
}

#[rocket::async_trait]
impl GraphUserService for FakeGraph {
	async fn list_users(&self, access_token: &str, query: &UserQuery) -> Result<Vec<GraphUser>, GraphError> {
		self.tokens.lock().unwrap().push(access_token.to_string());
		self.queries.lock().unwrap().push(query.clone());
		match self.list_error.lock().unwrap().clone() {
			Some(error) => Err(service_error(error)),
			None => Ok(self.users.lock().unwrap().clone()),
		}
	}

	async fn create_user(&self, access_token: &str, user: &NewGraphUser) -> Result<Option<GraphUser>, GraphError> {
		self.tokens.lock().unwrap().push(access_token.to_string());
		self.new_users.lock().unwrap().push(user.clone());
		match self.created.lock().unwrap().clone() {
			Some(result) => result.map_err(service_error),
			None => Ok(Some(GraphUser {
				id: Some("new-id".to_string()),
				user_principal_name: Some(user.user_principal_name.clone()),
				display_name: Some(user.display_name.clone()),
				mail_nickname: Some(user.mail_nickname.clone()),
			})),
		}
	}
}

/// Token endpoint stand-in. `id_token` is what code redemption hands back.
#[derive(Default)]
pub struct FakeIdentity {
	pub id_token: Mutex<Option<String>>,
	pub redeemed: Mutex<Vec<(String, String, String)>>,
}

#[rocket::async_trait]
impl IdentityProvider for FakeIdentity {
	async fn redeem_code(&self, code: &str, redirect_uri: &str, code_verifier: &str, _scopes: &[String]) -> Result<MSAccessToken, IdentityError> {
		self.redeemed.lock().unwrap().push((code.to_string(), redirect_uri.to_string(), code_verifier.to_string()));
		Ok(MSAccessToken {
			token_type: "Bearer".to_string(),
			expires_in: 3600,
			ext_expires_in: 3600,
			access_token: "graph-token".to_string(),
			refresh_token: Some("refresh-token".to_string()),
			id_token: self.id_token.lock().unwrap().clone(),
			scope: Some("User.Read User.ReadWrite.All Device.Read.All openid profile".to_string()),
		})
	}

	async fn refresh(&self, _refresh_token: &str, _scopes: &[String]) -> Result<MSAccessToken, IdentityError> {
		Err(IdentityError::Rejected { error: "invalid_grant".to_string(), description: "AADSTS70008: expired".to_string() })
	}
}

pub fn config() -> AppConfig {
	AppConfig {
		azure_ad: AzureAdConfig {
			domain: "contoso.com".to_string(),
			tenant_id: "tid-1".to_string(),
			client_id: CLIENT_ID.to_string(),
			client_secret: Some("secret".to_string()),
			..AzureAdConfig::default()
		},
		..AppConfig::default()
	}
}

pub struct TestApp {
	pub client: Client,
	pub graph: Arc<FakeGraph>,
	pub identity: Arc<FakeIdentity>,
	pub token_cache: Arc<TokenCache>,
	pub session_key: SessionKey,
}

impl TestApp {
	pub async fn start(graph: FakeGraph) -> Self {
		let graph = Arc::new(graph);
		let identity = Arc::new(FakeIdentity::default());
		let session_key = SessionKey::generate();
		let services = Services::new(config(), session_key.clone(), graph.clone(), identity.clone());
		let token_cache = services.token_cache.clone();

		let client = Client::tracked(travelbook::build(rocket::Config::figment(), services)).await.unwrap();
		Self { client, graph, identity, token_cache, session_key }
	}

	/// Puts a signed-in account with a valid Graph token in the cache.
	pub fn seed_account(&self) {
		self.token_cache.store(CachedAccount {
			account_id: ACCOUNT_ID.to_string(),
			username: Some("jdoe@contoso.com".to_string()),
			access_token: "graph-token".to_string(),
			refresh_token: Some("refresh-token".to_string()),
			scopes: ["user.read", "user.readwrite.all", "device.read.all"].map(str::to_string).to_vec(),
			expires_at: Utc::now() + Duration::hours(1),
		});
	}

	/// Session cookie for [`ACCOUNT_ID`].
	pub fn session_cookie(&self) -> Cookie<'static> {
		self.session_cookie_issued_at(jsonwebtoken::get_current_timestamp())
	}

	/// Eight hour session cookie for [`ACCOUNT_ID`] issued at `iat`.
	pub fn session_cookie_issued_at(&self, iat: u64) -> Cookie<'static> {
		let claims = UserJWTTokenClaims {
			account_id: ACCOUNT_ID.to_string(),
			name: Some("John Doe".to_string()),
			preferred_username: Some("jdoe@contoso.com".to_string()),
			login_hint: Some("hint-1".to_string()),
			id_token: None,
			iat,
			exp: iat + 8 * 3600,
		};
		Cookie::new(".TravelBook.Auth", claims.encode(&self.session_key).unwrap())
	}
}

pub fn host() -> Header<'static> {
	Header::new("Host", HOST)
}

/// True when the response clears the cookie `name`.
pub fn removes_cookie(response: &rocket::local::asynchronous::LocalResponse<'_>, name: &str) -> bool {
	response.headers().get("Set-Cookie").any(|value| value.starts_with(&format!("{name}=;")) || (value.starts_with(&format!("{name}=")) && value.contains("Max-Age=0")))
}

pub fn user(id: &str, upn: &str) -> GraphUser {
	GraphUser {
		id: Some(id.to_string()),
		user_principal_name: Some(upn.to_string()),
		display_name: Some("John Doe".to_string()),
		mail_nickname: upn.split('@').next().map(str::to_string),
	}
}
