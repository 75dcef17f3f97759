//! `POST /api/v1/chat` — the HMAC-protected surface. Verifies the envelope,
//! spends the tenant's provider key on one upstream call, and records both
//! sides of the exchange.

use axum::extract::State;
use axum::http::HeaderMap;
use axum::Json;
use eaglechat_core::signer::{self, SignatureHeaders};
use eaglechat_types::prelude::*;
use serde::{Deserialize, Serialize};

use crate::app::App;

pub const TENANT_ID_HEADER: &str = "x-eaglechat-tenant-id";

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatRequest {
	pub provider: Provider,
	pub session_id: String,
	pub message: String,
}

#[derive(Serialize)]
pub struct ChatResponse {
	reply: String,
}

pub async fn chat(
	State(app): State<App>,
	headers: HeaderMap,
	body: axum::body::Bytes,
) -> ClResult<Json<ChatResponse>> {
	let tenant_id = verify_envelope(&app, &headers, &body).await?;
	let request: ChatRequest =
		serde_json::from_slice(&body).map_err(|e| Error::Validation(format!("invalid request body: {e}")))?;

	let key = app.broker.use_key(tenant_id, request.provider).await?;

	let conversation = app
		.conversation_store
		.get_or_create_conversation(tenant_id, &request.session_id, None, None)
		.await?;

	app.conversation_store
		.append_message(conversation.id, tenant_id, Role::User, &request.message)
		.await?;

	let reply = call_provider(&app, request.provider, &key, &request.message).await?;

	app.conversation_store.append_message(conversation.id, tenant_id, Role::Assistant, &reply).await?;

	Ok(Json(ChatResponse { reply }))
}

/// Shared by `chat` and `history`: extracts the tenant id and the three
/// signature headers, resolves the HMAC context, and verifies the envelope
/// over the raw body. A tenant with no HMAC secret configured is rejected
/// the same way as a bad signature — the distinction isn't observable on
/// the wire.
pub async fn verify_envelope(app: &App, headers: &HeaderMap, body: &[u8]) -> ClResult<TenantId> {
	let tenant_id = headers
		.get(TENANT_ID_HEADER)
		.and_then(|v| v.to_str().ok())
		.ok_or_else(|| Error::Validation("missing tenant id header".into()))?;
	let tenant_id: TenantId =
		tenant_id.parse().map_err(|_| Error::Validation("tenant id header is not a valid UUID".into()))?;

	let signature = header_str(headers, signer::SIGNATURE_HEADER)?;
	let timestamp = header_str(headers, signer::TIMESTAMP_HEADER)?;
	let version = header_str(headers, signer::VERSION_HEADER)?;

	let context = match app.tenant_store.get_hmac_context(tenant_id).await {
		Ok(context) => context,
		Err(Error::NotFound) => return Err(Error::HmacNotConfigured),
		Err(e) => return Err(e),
	};

	let secret = app.vault.open(&context.sealed_secret)?;
	let sig_headers = SignatureHeaders { signature, timestamp, version };
	signer::verify(sig_headers, &secret, body, Timestamp::now())?;

	Ok(tenant_id)
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> ClResult<&'a str> {
	headers
		.get(name)
		.and_then(|v| v.to_str().ok())
		.ok_or(Error::BadSignature)
}

/// Proxies `message` to `provider`'s chat completion endpoint and extracts
/// the reply text. Parsed leniently via `serde_json::Value` rather than a
/// strict response struct — providers add fields to these payloads often
/// enough that a strict struct would break on a field we never needed.
async fn call_provider(app: &App, provider: Provider, key: &str, message: &str) -> ClResult<String> {
	let (url, body, headers) = match provider {
		Provider::Anthropic => {
			let body = serde_json::json!({
				"model": "claude-3-5-haiku-20241022",
				"max_tokens": 1024,
				"messages": [{"role": "user", "content": message}],
			});
			(
				format!("{}/v1/messages", provider.base_url()),
				body,
				vec![("x-api-key".to_string(), key.to_string()), ("anthropic-version".to_string(), "2023-06-01".to_string())],
			)
		}
		Provider::OpenAi => {
			let body = serde_json::json!({
				"model": "gpt-4o-mini",
				"messages": [{"role": "user", "content": message}],
			});
			(
				format!("{}/v1/chat/completions", provider.base_url()),
				body,
				vec![("authorization".to_string(), format!("Bearer {key}"))],
			)
		}
	};

	let header_refs: Vec<(&str, &str)> = headers.iter().map(|(k, v)| (k.as_str(), v.as_str())).collect();
	let response = app.http.post_json(&url, &body.to_string(), &header_refs).await?;

	if !response.status.is_success() {
		return Err(Error::ProbeUnavailable(provider));
	}

	let value: serde_json::Value =
		serde_json::from_slice(&response.body).map_err(|e| Error::Internal(format!("malformed provider response: {e}")))?;

	extract_reply(provider, &value).ok_or_else(|| Error::Internal("provider response had no text content".into()))
}

fn extract_reply(provider: Provider, value: &serde_json::Value) -> Option<String> {
	match provider {
		Provider::Anthropic => value.get("content")?.as_array()?.first()?.get("text")?.as_str().map(str::to_owned),
		Provider::OpenAi => value
			.get("choices")?
			.as_array()?
			.first()?
			.get("message")?
			.get("content")?
			.as_str()
			.map(str::to_owned),
	}
}

// vim: ts=4
