//! Provider-key broker: validates a tenant-supplied upstream key against its
//! provider with a minimal probe, then seals and stores it. Retrieval
//! decrypts on demand and returns masked views for display; plaintext is
//! never cached or logged.

use std::num::NonZeroUsize;
use std::sync::Arc;

use eaglechat_core::http_client::HttpClient;
use eaglechat_core::vault::Vault;
use eaglechat_types::prelude::*;
use eaglechat_types::provider::ProbeMethod;
use eaglechat_types::utils::mask_secret;
use lru::LruCache;
use parking_lot::Mutex;

const PROBE_TIMEOUT: std::time::Duration = std::time::Duration::from_secs(15);
const CACHE_CAPACITY: usize = 4096;

pub struct ProviderKeyBroker {
	store: Arc<dyn TenantStore>,
	vault: Arc<Vault>,
	http: HttpClient,
	/// `tenant_id -> {provider -> sealed_ciphertext}`. Elides store
	/// round-trips on the hot path; never holds plaintext.
	cache: Mutex<LruCache<TenantId, SealedProviderKeys>>,
}

impl ProviderKeyBroker {
	pub fn new(store: Arc<dyn TenantStore>, vault: Arc<Vault>, http: HttpClient) -> Self {
		Self {
			store,
			vault,
			http,
			cache: Mutex::new(LruCache::new(NonZeroUsize::new(CACHE_CAPACITY).unwrap_or(NonZeroUsize::MIN))),
		}
	}

	pub async fn configure(&self, tenant_id: TenantId, provider: Provider, plaintext_key: &str) -> ClResult<()> {
		if !plaintext_key.starts_with(provider.key_prefix()) {
			return Err(Error::InvalidProviderKey(provider));
		}

		self.probe(provider, plaintext_key).await?;

		let sealed = self.vault.seal(plaintext_key);
		self.store.set_provider_key(tenant_id, provider, Some(&sealed)).await?;
		self.invalidate(tenant_id);

		Ok(())
	}

	pub async fn mask(&self, tenant_id: TenantId, provider: Provider) -> ClResult<String> {
		let plaintext = self.use_key(tenant_id, provider).await?;
		Ok(mask_secret(&plaintext))
	}

	/// Returns a short-lived plaintext copy for the duration of one outbound
	/// call. The caller is contractually required to discard it after use —
	/// it is never written back to the cache or to disk.
	pub async fn use_key(&self, tenant_id: TenantId, provider: Provider) -> ClResult<String> {
		let sealed = self.sealed_for(tenant_id, provider).await?.ok_or(Error::NoProviderKey(provider))?;
		self.vault.open(&sealed)
	}

	pub async fn remove(&self, tenant_id: TenantId, provider: Provider) -> ClResult<()> {
		self.store.set_provider_key(tenant_id, provider, None).await?;
		self.invalidate(tenant_id);
		Ok(())
	}

	async fn sealed_for(&self, tenant_id: TenantId, provider: Provider) -> ClResult<Option<String>> {
		if let Some(keys) = self.cache.lock().get(&tenant_id) {
			return Ok(keys.get(provider).map(str::to_owned));
		}

		let keys = self.store.get_provider_keys(tenant_id).await?;
		let sealed = keys.get(provider).map(str::to_owned);
		self.cache.lock().put(tenant_id, keys);
		Ok(sealed)
	}

	fn invalidate(&self, tenant_id: TenantId) {
		self.cache.lock().pop(&tenant_id);
	}

	async fn probe(&self, provider: Provider, plaintext_key: &str) -> ClResult<()> {
		let spec = provider.probe_spec();
		let url = format!("{}{}", provider.base_url(), spec.path);
		let auth_value = match spec.auth_header {
			"authorization" => format!("Bearer {plaintext_key}"),
			_ => plaintext_key.to_string(),
		};
		let mut headers = vec![(spec.auth_header, auth_value.as_str())];
		if let Some((name, value)) = spec.extra_header {
			headers.push((name, value));
		}

		let response = match spec.method {
			ProbeMethod::Get => {
				tokio::time::timeout(PROBE_TIMEOUT, self.http.get(&url, &headers)).await
			}
			ProbeMethod::Post => {
				let body = spec.body.unwrap_or("{}");
				tokio::time::timeout(PROBE_TIMEOUT, self.http.post_json(&url, body, &headers)).await
			}
		};

		let response = response
			.map_err(|_| Error::ProbeUnavailable(provider))?
			.map_err(|_| Error::ProbeUnavailable(provider))?;

		if response.status == hyper::StatusCode::UNAUTHORIZED || response.status == hyper::StatusCode::FORBIDDEN {
			return Err(Error::InvalidProviderKey(provider));
		}
		if !response.status.is_success() {
			return Err(Error::ProbeUnavailable(provider));
		}

		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn anthropic_prefix_is_enforced() {
		assert_eq!(Provider::Anthropic.key_prefix(), "sk-ant-");
		assert_eq!(Provider::OpenAi.key_prefix(), "sk-");
	}
}

// vim: ts=4
