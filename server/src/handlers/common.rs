//! Shared helpers for the unprotected-but-credentialed endpoints
//! (`configure-hmac`, `configure-keys`, `get-key-status`, `remove-key`):
//! each authenticates with the plain `{tenant_id, api_key}` pair rather than
//! the HMAC envelope, which is reserved for the chat surface.

use eaglechat_types::prelude::*;

use crate::app::App;

/// Parses `tenant_id` and checks `api_key` against the store. Returns the
/// parsed id on success so callers don't re-parse it.
pub async fn authenticate(app: &App, tenant_id: &str, api_key: &str) -> ClResult<TenantId> {
	let tenant_id: TenantId =
		tenant_id.parse().map_err(|_| Error::Validation("tenant_id is not a valid UUID".into()))?;

	if app.tenant_store.validate(tenant_id, api_key).await? {
		Ok(tenant_id)
	} else {
		Err(Error::InvalidCredentials)
	}
}

// vim: ts=4
