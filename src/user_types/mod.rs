pub use app_state::AppState;
pub use graph_access::GraphAccess;
pub use origin::PublicOrigin;
pub use user::{SessionDropped, User};

mod app_state;
mod graph_access;
mod origin;
mod user;

use rocket::request::Outcome;

use crate::error::AuthError;

/// Fails the guard with the status matching `error`.
fn failure<T>(error: AuthError) -> Outcome<T, AuthError> {
	Outcome::Error((error.status(), error))
}
