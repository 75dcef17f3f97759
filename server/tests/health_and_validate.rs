mod common;

use axum::http::StatusCode;
use eaglechat_server::routes;
use eaglechat_types::prelude::*;
use serde_json::json;

#[tokio::test]
async fn health_reports_configured_title_and_version() {
	let app = common::test_app().await;
	let router = routes::build(app);

	let request = axum::http::Request::builder()
		.method("GET")
		.uri("/")
		.body(axum::body::Body::empty())
		.expect("build request");
	let mut request = request;
	request.extensions_mut().insert(axum::extract::ConnectInfo(common::client_addr()));

	let response = tower::ServiceExt::oneshot(router, request).await.expect("router call");
	assert_eq!(response.status(), StatusCode::OK);

	let bytes = http_body_util::BodyExt::collect(response.into_body()).await.expect("collect body").to_bytes();
	let body: serde_json::Value = serde_json::from_slice(&bytes).expect("json body");
	assert_eq!(body["title"], "EagleChat Gateway");
}

#[tokio::test]
async fn validate_accepts_the_right_key_and_rejects_the_wrong_one() {
	let app = common::test_app().await;

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
	let router = routes::build(app);

	let (status, body) =
		common::post_json(&router, "/api/v1/validate", json!({"tenantId": tenant_id.to_string(), "apiKey": api_key})).await;
	assert_eq!(status, StatusCode::OK);
	assert_eq!(body["valid"], true);

	let (status, _) =
		common::post_json(&router, "/api/v1/validate", json!({"tenantId": tenant_id.to_string(), "apiKey": "wrong"})).await;
	assert_eq!(status, StatusCode::UNAUTHORIZED);
}

// vim: ts=4
