//! `GET /` — unauthenticated liveness and version probe.

use axum::extract::State;
use axum::Json;
use serde::Serialize;

use crate::app::App;

#[derive(Serialize)]
pub struct HealthResponse {
	title: String,
	description: String,
	version: String,
}

pub async fn health(State(app): State<App>) -> Json<HealthResponse> {
	Json(HealthResponse {
		title: app.settings.api.title.clone(),
		description: app.settings.api.description.clone(),
		version: app.settings.api.version.clone(),
	})
}

// vim: ts=4
