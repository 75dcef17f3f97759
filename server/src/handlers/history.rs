//! `POST /api/v1/conversation-history` — the other HMAC-protected endpoint.
//! Same envelope verification as `chat`, but read-only.

use axum::extract::State;
use axum::http::HeaderMap;
use axum::Json;
use eaglechat_types::prelude::*;
use serde::{Deserialize, Serialize};

use crate::app::App;
use crate::handlers::chat::verify_envelope;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryRequest {
	pub session_id: String,
}

#[derive(Serialize)]
pub struct HistoryResponse {
	messages: Vec<MessageRecord>,
}

pub async fn conversation_history(
	State(app): State<App>,
	headers: HeaderMap,
	body: axum::body::Bytes,
) -> ClResult<Json<HistoryResponse>> {
	let tenant_id = verify_envelope(&app, &headers, &body).await?;
	let request: HistoryRequest =
		serde_json::from_slice(&body).map_err(|e| Error::Validation(format!("invalid request body: {e}")))?;

	let messages = app.conversation_store.list_messages(tenant_id, &request.session_id).await?;
	Ok(Json(HistoryResponse { messages }))
}

// vim: ts=4
