//! `POST /api/v1/register` — tenant onboarding via callback attestation.

use axum::extract::State;
use axum::Json;
use eaglechat_gateway::prelude::*;
use serde::Deserialize;

use crate::app::App;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterBody {
	pub site_url: String,
	pub admin_email: String,
	pub callback_token: String,
}

pub async fn register(
	State(app): State<App>,
	Json(body): Json<RegisterBody>,
) -> ClResult<Json<RegistrationResponse>> {
	let response = app
		.registration
		.register(RegistrationRequest {
			site_url: body.site_url,
			admin_email: body.admin_email,
			callback_token: body.callback_token,
		})
		.await?;

	Ok(Json(response))
}

// vim: ts=4
