//! Registration coordinator: the three-party handshake that onboards a new
//! tenant. The caller posts `{site_url, admin_email, callback_token}`; the
//! coordinator proves the caller controls `site_url` by calling back into it
//! before any credential is minted.
//!
//! States: `Accepted -> Verifying -> Verified -> Persisted`, with side
//! branches `Rejected(reason)` and `CallbackFailed`.

use std::sync::Arc;
use std::time::Duration;

use eaglechat_core::http_client::HttpClient;
use eaglechat_core::ssrf;
use eaglechat_core::worker::WorkerPool;
use eaglechat_types::prelude::*;
use eaglechat_types::utils::{generate_api_key, is_valid_callback_token, normalize_domain, site_hash};
use hickory_resolver::TokioResolver;
use regex::Regex;
use serde::{Deserialize, Serialize};

const CALLBACK_PATH: &str = "/wp-json/eaglechat-plugin/v1/verify";
const MIN_CALLBACK_TOKEN_LEN: usize = 16;

/// Operator-configurable callback retry policy (`callback.retry_attempts`,
/// `callback.retry_delay_seconds` in `config.json`).
#[derive(Clone, Copy, Debug)]
pub struct CallbackRetryPolicy {
	pub attempts: u32,
	pub delay: Duration,
}

impl Default for CallbackRetryPolicy {
	fn default() -> Self {
		Self { attempts: 3, delay: Duration::from_secs(3) }
	}
}

pub struct RegistrationRequest {
	pub site_url: String,
	pub admin_email: String,
	pub callback_token: String,
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationResponse {
	pub tenant_id: TenantId,
	pub api_key: String,
}

#[derive(Serialize, Deserialize)]
struct CallbackRequestBody<'a> {
	callback_token: &'a str,
}

#[derive(Deserialize, Default)]
struct CallbackResponseBody {
	#[serde(default)]
	verified: bool,
}

pub struct RegistrationCoordinator {
	store: Arc<dyn TenantStore>,
	http: HttpClient,
	resolver: TokioResolver,
	workers: Arc<WorkerPool>,
	retry_policy: CallbackRetryPolicy,
	development_mode: bool,
}

impl RegistrationCoordinator {
	pub fn new(
		store: Arc<dyn TenantStore>,
		http: HttpClient,
		workers: Arc<WorkerPool>,
		retry_policy: CallbackRetryPolicy,
		development_mode: bool,
	) -> Self {
		Self { store, http, resolver: ssrf::build_resolver(), workers, retry_policy, development_mode }
	}

	pub async fn register(&self, req: RegistrationRequest) -> ClResult<RegistrationResponse> {
		// Accepted: structural validation first, cheapest to reject.
		let url = parse_site_url(&req.site_url)?;
		validate_email(&req.admin_email)?;
		if !is_valid_callback_token(&req.callback_token) {
			return Err(Error::Validation(format!(
				"callback_token must be at least {MIN_CALLBACK_TOKEN_LEN} printable characters"
			)));
		}

		let domain = normalize_domain(&url)
			.ok_or_else(|| Error::Validation("site_url has no host".into()))?;

		// Reject early on known-bad requests before burning remote capacity
		// or dereferencing the origin.
		self.reject_if_duplicate(&req.site_url, &req.admin_email).await?;

		let host = url.host_str().ok_or_else(|| Error::Validation("site_url has no host".into()))?;
		ssrf::check_host(&self.resolver, host, self.development_mode).await?;

		// Verifying: callback happens before credential minting, so a
		// transient WordPress outage never leaks credentials into storage.
		self.verify_callback(&req.site_url, &req.callback_token).await?;

		// Verified -> Persisted: mint credentials and insert.
		let tenant_id = TenantId::new();
		let api_key = self.workers.run_immed(generate_api_key).await?;
		let hash = site_hash(&domain, tenant_id);

		let draft = DraftTenant {
			tenant_id,
			api_key: api_key.clone(),
			site_url: req.site_url,
			admin_email: req.admin_email,
			domain,
			site_hash: hash,
		};

		let record = self.store.insert(draft).await?;
		info!(tenant_id = %record.tenant_id, "tenant registered");

		Ok(RegistrationResponse { tenant_id: record.tenant_id, api_key })
	}

	async fn reject_if_duplicate(&self, site_url: &str, admin_email: &str) -> ClResult<()> {
		// Best-effort: avoids burning a callback attempt on a request that is
		// certain to fail. The race against a concurrent insert is still
		// resolved by the store's uniqueness constraints, not by this check.
		match self.store.find_duplicate(site_url, admin_email).await? {
			Some(kind) => Err(Error::DuplicateTenant(kind)),
			None => Ok(()),
		}
	}

	async fn verify_callback(&self, site_url: &str, callback_token: &str) -> ClResult<()> {
		let url = format!("{}{CALLBACK_PATH}", site_url.trim_end_matches('/'));
		let body = serde_json::to_string(&CallbackRequestBody { callback_token })
			.map_err(|e| Error::Internal(format!("failed to encode callback body: {e}")))?;

		let mut last_reason = String::new();
		for attempt in 1..=self.retry_policy.attempts {
			match self.http.post_json(&url, &body, &[]).await {
				Ok(response) if response.status.is_success() => {
					match serde_json::from_slice::<CallbackResponseBody>(&response.body) {
						Ok(parsed) if parsed.verified => return Ok(()),
						Ok(_) => last_reason = "callback replied without verified=true".into(),
						Err(e) => last_reason = format!("callback reply was not valid JSON: {e}"),
					}
				}
				Ok(response) => {
					last_reason = format!("callback returned HTTP {}", response.status);
				}
				Err(e) => {
					last_reason = format!("callback request failed: {e}");
				}
			}

			warn!(attempt, attempts = self.retry_policy.attempts, reason = %last_reason, "callback attestation attempt failed");

			if attempt < self.retry_policy.attempts {
				tokio::time::sleep(self.retry_policy.delay).await;
			}
		}

		Err(Error::CallbackFailed { reason: last_reason, attempts: self.retry_policy.attempts })
	}
}

fn parse_site_url(site_url: &str) -> ClResult<url::Url> {
	let url = url::Url::parse(site_url).map_err(|_| Error::Validation("site_url is not a valid URL".into()))?;
	if url.scheme() != "http" && url.scheme() != "https" {
		return Err(Error::Validation("site_url must be http or https".into()));
	}
	if url.host_str().is_none() {
		return Err(Error::Validation("site_url has no host".into()));
	}
	Ok(url)
}

fn validate_email(email: &str) -> ClResult<()> {
	// A pragmatic RFC-5322-compatible shape, not a full grammar — matches the
	// platform's own validator style elsewhere.
	let email_regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$")
		.map_err(|e| Error::Internal(format!("email regex compilation failed: {e}")))?;
	if email_regex.is_match(email) {
		Ok(())
	} else {
		Err(Error::Validation("admin_email is not a valid email address".into()))
	}
}


// vim: ts=4
