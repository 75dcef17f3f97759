mod common;

use axum::http::StatusCode;
use eaglechat_server::routes;
use eaglechat_types::prelude::*;
use eaglechat_types::utils::{normalize_domain, site_hash};
use serde_json::json;

#[tokio::test]
async fn configure_hmac_rederives_domain_and_site_hash_from_site_url() {
	let app = common::test_app().await;

	let tenant_id = TenantId::new();
	let api_key = format!("eck_{tenant_id}");
	let draft = DraftTenant {
		tenant_id,
		api_key: api_key.clone(),
		site_url: "https://old-domain.example.com".to_string(),
		admin_email: "owner@shop.example.com".to_string(),
		domain: "old-domain.example.com".to_string(),
		site_hash: "stale-hash".to_string(),
	};
	app.tenant_store.insert(draft).await.expect("insert tenant");
	let router = routes::build(app.clone());

	let (status, body) = common::post_json(
		&router,
		"/api/v1/configure-hmac",
		json!({
			"tenantId": tenant_id.to_string(),
			"apiKey": api_key,
			"siteUrl": "https://new-domain.example.com/storefront",
			"hmacSecret": "a-fresh-hmac-secret",
		}),
	)
	.await;

	assert_eq!(status, StatusCode::OK);
	assert_eq!(body["configured"], true);

	let context = app.tenant_store.get_hmac_context(tenant_id).await.expect("get hmac context");
	let url = url::Url::parse("https://new-domain.example.com/storefront").expect("parse");
	let expected_domain = normalize_domain(&url).expect("domain");
	assert_eq!(context.domain, expected_domain);
	assert_eq!(context.site_hash, site_hash(&expected_domain, tenant_id));

	assert_eq!(app.vault.open(&context.sealed_secret).expect("open"), "a-fresh-hmac-secret");
}

// vim: ts=4
