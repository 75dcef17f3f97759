mod common;

use axum::http::StatusCode;
use eaglechat_server::routes;
use eaglechat_types::prelude::*;
use serde_json::json;

async fn provisioned_tenant(app: &eaglechat_server::app::App) -> (TenantId, String) {
	let tenant_id = TenantId::new();
	let api_key = format!("eck_{tenant_id}");
	let draft = DraftTenant {
		tenant_id,
		api_key: api_key.clone(),
		site_url: "https://shop.example.com".to_string(),
		admin_email: "owner@shop.example.com".to_string(),
		domain: "shop.example.com".to_string(),
		site_hash: "deadbeef".to_string(),
	};
	app.tenant_store.insert(draft).await.expect("insert tenant");
	(tenant_id, api_key)
}

#[tokio::test]
async fn configure_keys_rejects_a_key_with_the_wrong_prefix_before_any_network_call() {
	let app = common::test_app().await;
	let (tenant_id, api_key) = provisioned_tenant(&app).await;
	let router = routes::build(app);

	let (status, body) = common::post_json(
		&router,
		"/api/v1/configure-keys",
		json!({
			"tenantId": tenant_id.to_string(),
			"apiKey": api_key,
			"provider": "anthropic",
			"providerKey": "sk-not-an-anthropic-key",
		}),
	)
	.await;

	assert_eq!(status, StatusCode::BAD_REQUEST);
	assert_eq!(body["error"]["code"], "E-KEY-INVALID");
}

#[tokio::test]
async fn get_key_status_without_a_configured_key_is_rejected() {
	let app = common::test_app().await;
	let (tenant_id, api_key) = provisioned_tenant(&app).await;
	let router = routes::build(app);

	let (status, body) = common::post_json(
		&router,
		"/api/v1/get-key-status",
		json!({"tenantId": tenant_id.to_string(), "apiKey": api_key, "provider": "openai"}),
	)
	.await;

	assert_eq!(status, StatusCode::BAD_REQUEST);
	assert_eq!(body["error"]["code"], "E-KEY-MISSING");
}

#[tokio::test]
async fn bad_credentials_are_rejected_before_any_broker_call() {
	let app = common::test_app().await;
	let (tenant_id, _) = provisioned_tenant(&app).await;
	let router = routes::build(app);

	let (status, body) = common::post_json(
		&router,
		"/api/v1/remove-key",
		json!({"tenantId": tenant_id.to_string(), "apiKey": "wrong-key", "provider": "openai"}),
	)
	.await;

	assert_eq!(status, StatusCode::UNAUTHORIZED);
	assert_eq!(body["error"]["code"], "E-AUTH-INVALID");
}

// vim: ts=4
