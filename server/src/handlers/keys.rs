//! `configure-keys`, `get-key-status`, `remove-key` — the three provider-key
//! broker operations exposed on the unprotected surface.

use axum::extract::State;
use axum::Json;
use eaglechat_types::prelude::*;
use serde::{Deserialize, Serialize};

use crate::app::App;
use crate::handlers::common::authenticate;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigureKeysBody {
	pub tenant_id: String,
	pub api_key: String,
	pub provider: Provider,
	pub provider_key: String,
}

#[derive(Serialize)]
pub struct ConfigureKeysResponse {
	configured: bool,
}

pub async fn configure_keys(
	State(app): State<App>,
	Json(body): Json<ConfigureKeysBody>,
) -> ClResult<Json<ConfigureKeysResponse>> {
	let tenant_id = authenticate(&app, &body.tenant_id, &body.api_key).await?;
	app.broker.configure(tenant_id, body.provider, &body.provider_key).await?;
	Ok(Json(ConfigureKeysResponse { configured: true }))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeyStatusBody {
	pub tenant_id: String,
	pub api_key: String,
	pub provider: Provider,
}

#[derive(Serialize)]
pub struct KeyStatusResponse {
	provider: Provider,
	masked_key: String,
}

pub async fn get_key_status(
	State(app): State<App>,
	Json(body): Json<KeyStatusBody>,
) -> ClResult<Json<KeyStatusResponse>> {
	let tenant_id = authenticate(&app, &body.tenant_id, &body.api_key).await?;
	let masked_key = app.broker.mask(tenant_id, body.provider).await?;
	Ok(Json(KeyStatusResponse { provider: body.provider, masked_key }))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoveKeyBody {
	pub tenant_id: String,
	pub api_key: String,
	pub provider: Provider,
}

#[derive(Serialize)]
pub struct RemoveKeyResponse {
	removed: bool,
}

pub async fn remove_key(
	State(app): State<App>,
	Json(body): Json<RemoveKeyBody>,
) -> ClResult<Json<RemoveKeyResponse>> {
	let tenant_id = authenticate(&app, &body.tenant_id, &body.api_key).await?;
	app.broker.remove(tenant_id, body.provider).await?;
	Ok(Json(RemoveKeyResponse { removed: true }))
}

// vim: ts=4
