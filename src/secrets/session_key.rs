use std::fs;
use std::path::Path;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use rand::random;
use tracing::info;

use super::SecretError;
use crate::config::SessionConfig;

const KEY_FILE_NAME: &str = "travelbook-session.key";
const MIN_KEY_LEN: usize = 32;

///
/// # Session Key
/// HMAC key signing the session and sign-in correlation cookies.
///
/// Either configured inline (`session.signing_key`) or persisted in
/// `session.key_dir` so that cookies survive restarts and are shared between
/// instances mounting the same directory.
///
#[derive(Clone)]
pub struct SessionKey(Vec<u8>);

impl std::fmt::Debug for SessionKey {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.write_str("SessionKey(..)")
	}
}

impl SessionKey {
	/// # Errors
	/// Keys shorter than 32 bytes are refused.
	pub fn from_bytes(bytes: impl Into<Vec<u8>>) -> Result<Self, SecretError> {
		let bytes = bytes.into();
		if bytes.len() < MIN_KEY_LEN {
			return Err(SecretError::InvalidSessionKey(format!("expected at least {MIN_KEY_LEN} bytes, got {}", bytes.len())));
		}
		Ok(Self(bytes))
	}

	/// A fresh random key.
	#[must_use]
	pub fn generate() -> Self {
		let mut bytes = random::<[u8; 32]>().to_vec();
		bytes.extend_from_slice(&random::<[u8; 32]>());
		Self(bytes)
	}

	/// # Errors
	/// Fails when the key file cannot be read, decoded or created.
	pub fn load_or_create(config: &SessionConfig) -> Result<Self, SecretError> {
		if let Some(key) = config.signing_key.as_deref().filter(|key| !key.is_empty()) {
			return Self::from_bytes(key.as_bytes());
		}
		Self::load_or_create_file(&config.key_dir)
	}

	fn load_or_create_file(dir: &Path) -> Result<Self, SecretError> {
		let path = dir.join(KEY_FILE_NAME);
		let io_error = |source| SecretError::Io { path: path.display().to_string(), source };

		if path.exists() {
			let encoded = fs::read_to_string(&path).map_err(io_error)?;
			let bytes = STANDARD.decode(encoded.trim()).map_err(|e| SecretError::InvalidSessionKey(e.to_string()))?;
			return Self::from_bytes(bytes);
		}

		fs::create_dir_all(dir).map_err(io_error)?;
		let key = Self::generate();
		fs::write(&path, STANDARD.encode(&key.0)).map_err(io_error)?;
		info!(path = %path.display(), "created session signing key");
		Ok(key)
	}

	#[must_use]
	pub fn as_bytes(&self) -> &[u8] {
		&self.0
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn key_file_is_reused_across_loads() {
		let dir = tempfile::tempdir().unwrap();
		let config = SessionConfig { key_dir: dir.path().join("keys"), ..SessionConfig::default() };

		let first = SessionKey::load_or_create(&config).unwrap();
		let second = SessionKey::load_or_create(&config).unwrap();

		assert_eq!(first.as_bytes(), second.as_bytes());
		assert_eq!(first.as_bytes().len(), 64);
	}

	#[test]
	fn inline_key_wins_over_key_dir() {
		let config = SessionConfig {
			signing_key: Some("an inline signing key that is long enough".to_string()),
			key_dir: "/nonexistent/should/not/be/created".into(),
			..SessionConfig::default()
		};

		let key = SessionKey::load_or_create(&config).unwrap();
		assert_eq!(key.as_bytes(), b"an inline signing key that is long enough");
	}

	#[test]
	fn short_keys_are_refused() {
		assert!(matches!(SessionKey::from_bytes("short"), Err(SecretError::InvalidSessionKey(_))));
	}
}
