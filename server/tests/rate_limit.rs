mod common;

use axum::http::StatusCode;
use eaglechat_server::routes;
use serde_json::json;

#[tokio::test]
async fn exhausting_the_bucket_yields_429_with_retry_after() {
	let app = common::test_app().await;
	let router = routes::build(app);

	let body = json!({"tenantId": "00000000-0000-0000-0000-000000000000", "apiKey": "wrong"});

	// The default bucket allows 20 requests per address before limiting.
	for _ in 0..20 {
		let (status, _) = common::post_json(&router, "/api/v1/validate", body.clone()).await;
		assert_eq!(status, StatusCode::UNAUTHORIZED);
	}

	let (status, response_body) = common::post_json(&router, "/api/v1/validate", body).await;
	assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
	assert_eq!(response_body["error"]["code"], "E-RATE-LIMITED");
}

// vim: ts=4
