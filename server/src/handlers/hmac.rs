//! `POST /api/v1/configure-hmac` — installs the HMAC secret a tenant will
//! sign `/api/v1/chat` and `/api/v1/conversation-history` requests with.
//!
//! `site_hash` doubles as an anti-swap check (see the data model's note on
//! it): re-supplying `site_url` here re-derives `domain` and `site_hash`
//! from the tenant's current origin rather than trusting whatever was
//! recorded at registration.

use axum::extract::State;
use axum::Json;
use eaglechat_types::prelude::*;
use eaglechat_types::utils::{normalize_domain, site_hash};
use serde::{Deserialize, Serialize};

use crate::app::App;
use crate::handlers::common::authenticate;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigureHmacBody {
	pub tenant_id: String,
	pub api_key: String,
	pub site_url: String,
	pub hmac_secret: String,
}

#[derive(Serialize)]
pub struct ConfigureHmacResponse {
	configured: bool,
}

pub async fn configure_hmac(
	State(app): State<App>,
	Json(body): Json<ConfigureHmacBody>,
) -> ClResult<Json<ConfigureHmacResponse>> {
	let tenant_id = authenticate(&app, &body.tenant_id, &body.api_key).await?;

	let url = url::Url::parse(&body.site_url).map_err(|_| Error::Validation("site_url is not a valid URL".into()))?;
	let domain =
		normalize_domain(&url).ok_or_else(|| Error::Validation("site_url has no host".into()))?;
	let hash = site_hash(&domain, tenant_id);

	let sealed = app.vault.seal(&body.hmac_secret);
	app.tenant_store.set_hmac_context(tenant_id, &sealed, &domain, &hash).await?;

	Ok(Json(ConfigureHmacResponse { configured: true }))
}

// vim: ts=4
