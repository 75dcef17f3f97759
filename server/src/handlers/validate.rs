//! `POST /api/v1/validate` — credential check used by the WordPress plugin
//! to confirm a tenant's api key is still good.

use axum::extract::State;
use axum::Json;
use eaglechat_types::prelude::*;
use serde::{Deserialize, Serialize};

use crate::app::App;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidateBody {
	pub tenant_id: String,
	pub api_key: String,
}

#[derive(Serialize)]
pub struct ValidateResponse {
	valid: bool,
}

pub async fn validate(
	State(app): State<App>,
	Json(body): Json<ValidateBody>,
) -> ClResult<Json<ValidateResponse>> {
	let tenant_id: TenantId =
		body.tenant_id.parse().map_err(|_| Error::Validation("tenant_id is not a valid UUID".into()))?;

	if app.tenant_store.validate(tenant_id, &body.api_key).await? {
		Ok(Json(ValidateResponse { valid: true }))
	} else {
		Err(Error::InvalidCredentials)
	}
}

// vim: ts=4
