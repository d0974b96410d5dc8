#![warn(clippy::pedantic, clippy::nursery, clippy::all, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::module_name_repetitions)]

use rocket::figment::Figment;
use rocket::{catchers, routes, Build, Rocket};

pub use config::{AppConfig, ConfigError};
pub use error::{ApiError, AuthError, CreateUserError};
pub use state::Services;
pub use user_types::*;

pub mod auth;
pub mod client;
pub mod config;
pub mod dto;
pub mod error;
pub mod graph;
pub mod logging;
pub mod routes;
pub mod secrets;
mod state;
pub mod tokens;
mod user_types;

///
/// # Build
/// Assembles the web application: users API, sign-in/sign-out endpoints and
/// the OpenID Connect callbacks at their configured paths.
///
/// `services.config` must have passed [`AppConfig::validate`].
///
#[must_use]
pub fn build(figment: Figment, services: Services) -> Rocket<Build> {
	let callback_path = services.config.azure_ad.callback_path.clone();
	let signed_out_callback_path = services.config.azure_ad.signed_out_callback_path.clone();

	rocket::custom(figment)
		.mount("/", routes![routes::index])
		.mount("/api/users", routes::users::routes())
		.mount("/Authentication", routes::authentication::routes())
		.mount(callback_path.as_str(), routes::authentication::callback_routes())
		.mount(signed_out_callback_path.as_str(), routes::authentication::signed_out_routes())
		.register("/", catchers![routes::unauthorized])
		.manage(services)
}
