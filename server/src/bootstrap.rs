//! Startup sequence: read required environment, derive the vault, open the
//! store, load `config.json`, and assemble `AppState`. Secrets come from
//! `std::env`, everything else from a JSON settings file.

use base64::Engine;
use eaglechat_core::vault::Vault;
use eaglechat_types::prelude::*;

use crate::app::{App, AppBuilder};
use crate::settings::Settings;

const CONFIG_PATH_ENV: &str = "EAGLECHAT_CONFIG";
const DEFAULT_CONFIG_PATH: &str = "./config.json";

fn required_env(name: &str) -> ClResult<String> {
	std::env::var(name).map_err(|_| Error::ConfigError(format!("{name} is required but not set")))
}

pub async fn run() -> ClResult<App> {
	rustls::crypto::CryptoProvider::install_default(rustls::crypto::aws_lc_rs::default_provider())
		.map_err(|_| Error::ConfigError("failed to install default crypto provider".into()))?;

	let master_key_b64 = required_env("MASTER_KEY")?;
	let master_key = base64::engine::general_purpose::STANDARD
		.decode(master_key_b64)
		.map_err(|e| Error::ConfigError(format!("MASTER_KEY is not valid base64: {e}")))?;
	let vault = Vault::new(&master_key)?;

	let store_url = required_env("STORE_URL")?;
	// Validated present but otherwise unused at this layer: reserved for a
	// future store-side auth handshake, not consumed by the SQLite adapter.
	let _store_service_key = required_env("STORE_SERVICE_KEY")?;

	let (tenant_store, conversation_store) = eaglechat_store_sqlite::open(&store_url).await?;

	let config_path = std::env::var(CONFIG_PATH_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
	let settings = Settings::load(&config_path).await?;

	init_tracing(&settings);

	info!(config = %config_path, store = %store_url, "EagleChat Gateway starting");

	AppBuilder::new(tenant_store, conversation_store, vault, settings).build()
}

fn init_tracing(settings: &Settings) {
	let filter = tracing_subscriber::EnvFilter::try_from_default_env()
		.unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(settings.logging.level.as_filter()));
	tracing_subscriber::fmt().with_env_filter(filter).with_target(false).init();
}

// vim: ts=4
