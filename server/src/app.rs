//! Process-wide application state: the vault, both stores, the registration
//! coordinator, the provider-key broker, and the rate limiter, all built once
//! at startup and shared behind `Arc` for the lifetime of the process.

use std::sync::Arc;

use eaglechat_core::http_client::HttpClient;
use eaglechat_core::rate_limit::AddressRateLimiter;
use eaglechat_core::vault::Vault;
use eaglechat_core::worker::WorkerPool;
use eaglechat_gateway::prelude::*;
use eaglechat_store_sqlite::{SqliteConversationStore, SqliteTenantStore};

use crate::settings::Settings;

pub struct AppState {
	pub tenant_store: Arc<dyn TenantStore>,
	pub conversation_store: Arc<SqliteConversationStore>,
	pub vault: Arc<Vault>,
	pub registration: RegistrationCoordinator,
	pub broker: ProviderKeyBroker,
	pub rate_limiter: AddressRateLimiter,
	pub http: HttpClient,
	pub settings: Settings,
}

pub type App = Arc<AppState>;

pub struct AppBuilder {
	tenant_store: Arc<SqliteTenantStore>,
	conversation_store: Arc<SqliteConversationStore>,
	vault: Arc<Vault>,
	settings: Settings,
}

impl AppBuilder {
	pub fn new(
		tenant_store: SqliteTenantStore,
		conversation_store: SqliteConversationStore,
		vault: Vault,
		settings: Settings,
	) -> Self {
		Self {
			tenant_store: Arc::new(tenant_store),
			conversation_store: Arc::new(conversation_store),
			vault: Arc::new(vault),
			settings,
		}
	}

	pub fn build(self) -> ClResult<App> {
		let http = HttpClient::new()?;
		let workers = Arc::new(WorkerPool::default());

		let registration = RegistrationCoordinator::new(
			self.tenant_store.clone(),
			http.clone(),
			workers,
			self.settings.callback.retry_policy(),
			self.settings.api.development_mode,
		);

		let broker = ProviderKeyBroker::new(self.tenant_store.clone(), self.vault.clone(), http.clone());

		Ok(Arc::new(AppState {
			tenant_store: self.tenant_store,
			conversation_store: self.conversation_store,
			vault: self.vault,
			registration,
			broker,
			rate_limiter: AddressRateLimiter::new(),
			http,
			settings: self.settings,
		}))
	}
}

// vim: ts=4
