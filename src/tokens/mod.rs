//! Signed cookie claims and the Entra ID token endpoint.
#![deny(missing_docs)]
pub use app_state::{AppStateTokenClaims, SIGN_IN_LIFETIME_SECS};
pub use id_token::IdTokenClaims;
pub use ms_access_token::{EntraIdentityProvider, IdentityError, IdentityProvider, MSAccessToken};
pub use user_jwt::UserJWTTokenClaims;

mod app_state;
mod id_token;
mod ms_access_token;
mod user_jwt;
