use thiserror::Error;

pub use docker::{load_docker_client_secret, read_docker_secret};
pub use key_vault::{AzureAdSecretLoader, AzureKeyVaultSecretReader, SecretReader};
pub use session_key::SessionKey;

mod docker;
mod key_vault;
mod session_key;

/// Errors raised while loading secrets at startup.
#[derive(Debug, Error)]
pub enum SecretError {
	#[error("Docker secret not found: {0}")]
	DockerSecretNotFound(String),

	#[error("Failed to read secret file {path}: {source}")]
	Io { path: String, source: std::io::Error },

	#[error("Key Vault error: {0}")]
	KeyVault(String),

	#[error("Key Vault secret {0} has no value")]
	EmptySecret(String),

	#[error("Session signing key is invalid: {0}")]
	InvalidSessionKey(String),
}
