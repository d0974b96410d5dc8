pub use cookie_events::{validate_principal, PrincipalValidation};
pub use cookies::{current_session, remove_cookie, session_cookie, sign_in_cookie, SIGN_IN_COOKIE};
pub use oidc::{authorize_url, end_session_url, random_token, sign_in_scopes, AuthorizationRequest, Pkce, USERS_API_SCOPES};
pub use token_acquisition::{TokenAcquisition, TokenAcquisitionError, INVALID_GRANT, NO_TOKENS_FOUND, USER_NULL};
pub use token_cache::{CachedAccount, TokenCache};

mod cookie_events;
mod cookies;
mod oidc;
mod token_acquisition;
mod token_cache;
