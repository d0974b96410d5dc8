use std::error::Error;

use tracing::info;
use travelbook::config::{self, AppConfig};
use travelbook::secrets::{load_docker_client_secret, AzureAdSecretLoader, AzureKeyVaultSecretReader, SessionKey};
use travelbook::Services;

#[rocket::main]
async fn main() -> Result<(), Box<dyn Error>> {
	travelbook::logging::init("travelbook=info");

	let figment = config::figment();
	let mut app_config = AppConfig::from_figment(&figment)?;

	// Docker secret first; a configured Key Vault overrides it.
	load_docker_client_secret(&mut app_config)?;
	AzureAdSecretLoader::new(AzureKeyVaultSecretReader).load(&mut app_config).await?;
	app_config.validate()?;

	let session_key = SessionKey::load_or_create(&app_config.session)?;
	let services = Services::from_config(app_config, session_key)?;

	info!("starting TravelBook");
	let _rocket = travelbook::build(figment, services).launch().await?;
	Ok(())
}
