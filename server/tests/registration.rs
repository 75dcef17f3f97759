mod common;

use axum::http::StatusCode;
use eaglechat_server::routes;
use hyper::StatusCode as HStatus;
use serde_json::json;

#[tokio::test]
async fn happy_path_registration_mints_credentials() {
	let app = common::test_app().await;
	let mock = common::MockServer::start(vec![(HStatus::OK, r#"{"verified":true}"#.to_string())]).await;
	let router = routes::build(app);

	let (status, body) = common::post_json(
		&router,
		"/api/v1/register",
		json!({
			"siteUrl": mock.base_url,
			"adminEmail": "owner@shop.example.com",
			"callbackToken": "a-sixteen-char-plus-token",
		}),
	)
	.await;

	assert_eq!(status, StatusCode::OK);
	assert!(body["tenantId"].is_string());
	assert!(body["apiKey"].as_str().expect("apiKey").starts_with("eck_"));
	assert_eq!(mock.request_count(), 1);
}

#[tokio::test]
async fn callback_exhaustion_surfaces_as_registration_failure() {
	let app = common::test_app().await;
	let mock = common::MockServer::start(vec![(HStatus::INTERNAL_SERVER_ERROR, "oops".to_string())]).await;
	let router = routes::build(app);

	let (status, body) = common::post_json(
		&router,
		"/api/v1/register",
		json!({
			"siteUrl": mock.base_url,
			"adminEmail": "owner@shop.example.com",
			"callbackToken": "a-sixteen-char-plus-token",
		}),
	)
	.await;

	assert_eq!(status, StatusCode::BAD_REQUEST);
	assert_eq!(body["error"]["code"], "E-REG-CALLBACK");
	assert_eq!(body["error"]["attempts"], 2);
	// One attempt per retry, none skipped after the final failure.
	assert_eq!(mock.request_count(), 2);
}

#[tokio::test]
async fn duplicate_site_url_is_rejected_before_a_second_callback() {
	let app = common::test_app().await;
	let mock = common::MockServer::start(vec![(HStatus::OK, r#"{"verified":true}"#.to_string())]).await;
	let router = routes::build(app);

	let body = json!({
		"siteUrl": mock.base_url,
		"adminEmail": "owner@shop.example.com",
		"callbackToken": "a-sixteen-char-plus-token",
	});

	let (first_status, _) = common::post_json(&router, "/api/v1/register", body.clone()).await;
	assert_eq!(first_status, StatusCode::OK);

	let mut second = body.clone();
	second["adminEmail"] = json!("someone-else@shop.example.com");
	let (status, body) = common::post_json(&router, "/api/v1/register", second).await;

	assert_eq!(status, StatusCode::BAD_REQUEST);
	assert_eq!(body["error"]["code"], "E-REG-DUPLICATE");
	// Rejected by the pre-check, so the callback was never hit a second time.
	assert_eq!(mock.request_count(), 1);
}

// vim: ts=4
