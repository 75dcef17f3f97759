//! HTTP route table. Unprotected, credentialed, and HMAC-protected surfaces
//! all share one router; the rate limiter applies to all of it.

use axum::routing::{get, post};
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::app::App;
use crate::handlers::{chat, health, history, hmac, keys, register, validate};
use crate::middleware::rate_limit;

pub fn build(app: App) -> Router {
	Router::new()
		.route("/", get(health::health))
		.route("/api/v1/register", post(register::register))
		.route("/api/v1/validate", post(validate::validate))
		.route("/api/v1/configure-hmac", post(hmac::configure_hmac))
		.route("/api/v1/configure-keys", post(keys::configure_keys))
		.route("/api/v1/get-key-status", post(keys::get_key_status))
		.route("/api/v1/remove-key", post(keys::remove_key))
		.route("/api/v1/chat", post(chat::chat))
		.route("/api/v1/conversation-history", post(history::conversation_history))
		.route_layer(axum::middleware::from_fn_with_state(app.clone(), rate_limit))
		.layer(TraceLayer::new_for_http())
		.with_state(app)
}

// vim: ts=4
