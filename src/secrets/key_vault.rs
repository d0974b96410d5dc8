use azure_security_keyvault::KeyvaultClient;
use tracing::{debug, info};

use super::SecretError;
use crate::config::AppConfig;

///
/// # Secret Reader
/// Reads a single secret from a vault.
///
#[rocket::async_trait]
pub trait SecretReader: Send + Sync {
	/// Returns the secret value, or `None` when the vault holds an empty secret.
	async fn read_secret(&self, vault_uri: &str, secret_name: &str) -> Result<Option<String>, SecretError>;
}

///
/// # Azure Key Vault Secret Reader
/// Authenticates with the default Azure credential chain (environment, managed
/// identity, Azure CLI) and reads secrets through [`KeyvaultClient`].
///
#[derive(Debug, Default, Clone, Copy)]
pub struct AzureKeyVaultSecretReader;

#[rocket::async_trait]
impl SecretReader for AzureKeyVaultSecretReader {
	async fn read_secret(&self, vault_uri: &str, secret_name: &str) -> Result<Option<String>, SecretError> {
		let azure_credentials = match azure_identity::create_credential() {
			Ok(credentials) => credentials,
			Err(e) => return Err(SecretError::KeyVault(format!("Failed to create Azure credentials: {e}"))),
		};
		let client = match KeyvaultClient::new(vault_uri, azure_credentials) {
			Ok(client) => client,
			Err(e) => return Err(SecretError::KeyVault(format!("Failed to login to Azure Key Vault: {e}"))),
		};

		debug!(vault_uri, secret_name, "reading Key Vault secret");
		match client.secret_client().get(secret_name).await {
			Ok(secret) if secret.value.is_empty() => Ok(None),
			Ok(secret) => Ok(Some(secret.value)),
			Err(e) => Err(SecretError::KeyVault(format!("Failed to get secret {secret_name}: {e}"))),
		}
	}
}

///
/// # Azure AD Secret Loader
/// Replaces `azure_ad.client_secret` with the Key Vault secret named by
/// `key_vault.azure_ad_client_secret`. Without both Key Vault settings the
/// configuration is left untouched.
///
pub struct AzureAdSecretLoader<R> {
	reader: R,
}

impl<R: SecretReader> AzureAdSecretLoader<R> {
	pub const fn new(reader: R) -> Self {
		Self { reader }
	}

	/// # Errors
	/// Fails when the vault cannot be read or the secret has no value.
	pub async fn load(&self, config: &mut AppConfig) -> Result<(), SecretError> {
		let vault_uri = config.key_vault.vault_uri.as_deref().unwrap_or_default();
		let secret_name = config.key_vault.azure_ad_client_secret.as_deref().unwrap_or_default();

		if vault_uri.is_empty() || secret_name.is_empty() {
			return Ok(());
		}

		let Some(secret) = self.reader.read_secret(vault_uri, secret_name).await? else {
			return Err(SecretError::EmptySecret(secret_name.to_string()));
		};

		info!(vault_uri, secret_name, "loaded Entra ID client secret from Key Vault");
		config.azure_ad.client_secret = Some(secret);
		Ok(())
	}
}
