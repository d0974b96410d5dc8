use rocket::request::{self, FromRequest, Outcome, Request};

use super::failure;
use crate::error::AuthError;

///
/// # Public Origin
/// `scheme://host` under which the browser reaches the service, honouring the
/// `X-Forwarded-Proto` and `X-Forwarded-Host` headers of a reverse proxy.
/// The scheme defaults to `https`.
///
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublicOrigin(pub String);

impl PublicOrigin {
	/// Absolute URL of `path` on this origin.
	#[must_use]
	pub fn url(&self, path: &str) -> String {
		format!("{}{path}", self.0)
	}
}

fn first_value(header: Option<&str>) -> Option<&str> {
	header.and_then(|value| value.split(',').next()).map(str::trim).filter(|value| !value.is_empty())
}

/// `scheme://host` from the forwarded headers, else the request's own host.
fn public_origin(forwarded_proto: Option<&str>, forwarded_host: Option<&str>, host: Option<&str>) -> Option<String> {
	let scheme = first_value(forwarded_proto).unwrap_or("https");
	let host = first_value(forwarded_host).or_else(|| host.map(str::trim).filter(|host| !host.is_empty()))?;
	Some(format!("{scheme}://{host}"))
}

#[rocket::async_trait]
impl<'r> FromRequest<'r> for PublicOrigin {
	type Error = AuthError;

	async fn from_request(request: &'r Request<'_>) -> request::Outcome<Self, Self::Error> {
		let headers = request.headers();
		// The raw header covers requests whose authority was never parsed.
		let host = request.host().map(|host| host.to_string());
		let host = host.as_deref().or_else(|| headers.get_one("Host"));

		match public_origin(headers.get_one("X-Forwarded-Proto"), headers.get_one("X-Forwarded-Host"), host) {
			Some(origin) => Outcome::Success(Self(origin)),
			None => failure(AuthError::MissingHost),
		}
	}
}
