use std::fs;
use std::path::Path;

use tracing::info;

use super::SecretError;
use crate::config::{AppConfig, DOCKER_CLIENT_SECRET_NAME};

/// Reads `{dir}/{name}` and trims surrounding whitespace.
///
/// # Errors
/// [`SecretError::DockerSecretNotFound`] when the file does not exist.
pub fn read_docker_secret(dir: &Path, name: &str) -> Result<String, SecretError> {
	let path = dir.join(name);
	if !path.exists() {
		return Err(SecretError::DockerSecretNotFound(path.display().to_string()));
	}

	match fs::read_to_string(&path) {
		Ok(contents) => Ok(contents.trim().to_string()),
		Err(source) => Err(SecretError::Io { path: path.display().to_string(), source }),
	}
}

///
/// # Docker Client Secret
/// When Entra ID is switched on, the client secret is mounted as a Docker secret
/// rather than stored in configuration.
///
/// # Errors
/// Propagates [`read_docker_secret`] failures.
pub fn load_docker_client_secret(config: &mut AppConfig) -> Result<(), SecretError> {
	if !config.use_entra_id {
		return Ok(());
	}

	let secret = read_docker_secret(&config.secrets_dir, DOCKER_CLIENT_SECRET_NAME)?;
	info!(secret = DOCKER_CLIENT_SECRET_NAME, "loaded Entra ID client secret from Docker secret");
	config.azure_ad.client_secret = Some(secret);
	Ok(())
}
