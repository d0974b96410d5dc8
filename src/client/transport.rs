use std::sync::Arc;

use reqwest::cookie::Jar;
use reqwest::StatusCode;
use url::Url;

use super::ClientError;

/// Status, reason phrase and raw body of an API response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiResponse {
	pub status: u16,
	pub reason: Option<String>,
	pub body: String,
}

impl ApiResponse {
	#[must_use]
	pub const fn is_success(&self) -> bool {
		self.status >= 200 && self.status < 300
	}
}

///
/// # API Transport
/// Posts JSON to a path relative to the API base URL.
///
#[rocket::async_trait]
pub trait ApiTransport: Send + Sync {
	async fn post_json(&self, path: &str, body: &serde_json::Value) -> Result<ApiResponse, ClientError>;
}

///
/// # HTTP API Transport
/// `reqwest` transport carrying the session cookie of a signed-in user.
///
#[derive(Debug, Clone)]
pub struct HttpApiTransport {
	http: reqwest::Client,
	base_url: Url,
}

impl HttpApiTransport {
	/// # Errors
	/// Fails on an invalid base URL or if the HTTP client cannot be built.
	pub fn new(base_url: &str, session_cookie: Option<(&str, &str)>) -> Result<Self, ClientError> {
		let mut base_url = Url::parse(base_url)?;
		if !base_url.path().ends_with('/') {
			let path = format!("{}/", base_url.path());
			base_url.set_path(&path);
		}

		let jar = Arc::new(Jar::default());
		if let Some((name, value)) = session_cookie {
			jar.add_cookie_str(&format!("{name}={value}; Path=/"), &base_url);
		}

		let http = reqwest::Client::builder().cookie_provider(jar).build()?;
		Ok(Self { http, base_url })
	}
}

#[rocket::async_trait]
impl ApiTransport for HttpApiTransport {
	async fn post_json(&self, path: &str, body: &serde_json::Value) -> Result<ApiResponse, ClientError> {
		let url = self.base_url.join(path)?;
		let response = self.http.post(url).json(body).send().await?;

		let status: StatusCode = response.status();
		let body = response.text().await?;
		Ok(ApiResponse { status: status.as_u16(), reason: status.canonical_reason().map(str::to_string), body })
	}
}
