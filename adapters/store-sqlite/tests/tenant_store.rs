use eaglechat_store_sqlite::open;
use eaglechat_types::prelude::*;

fn draft(site_url: &str, admin_email: &str) -> DraftTenant {
	let tenant_id = TenantId::new();
	DraftTenant {
		tenant_id,
		api_key: format!("eck_{tenant_id}"),
		site_url: site_url.to_string(),
		admin_email: admin_email.to_string(),
		domain: "shop.example.com".to_string(),
		site_hash: "deadbeef".to_string(),
	}
}

#[tokio::test]
async fn insert_then_validate_round_trips() {
	let (store, _conv) = open("sqlite::memory:").await.expect("open store");
	let d = draft("https://shop.example.com", "a@shop.example.com");
	let tenant_id = d.tenant_id;
	let api_key = d.api_key.clone();

	let record = store.insert(d).await.expect("insert");
	assert_eq!(record.tenant_id, tenant_id);

	assert!(store.validate(tenant_id, &api_key).await.expect("validate"));
	assert!(!store.validate(tenant_id, "wrong-key").await.expect("validate"));
}

#[tokio::test]
async fn duplicate_site_url_is_rejected() {
	let (store, _conv) = open("sqlite::memory:").await.expect("open store");
	store.insert(draft("https://shop.example.com", "a@shop.example.com")).await.expect("first insert");

	let result = store.insert(draft("https://shop.example.com", "b@shop.example.com")).await;
	assert!(matches!(result, Err(Error::DuplicateTenant(DuplicateKind::Site))));
}

#[tokio::test]
async fn duplicate_admin_email_is_rejected() {
	let (store, _conv) = open("sqlite::memory:").await.expect("open store");
	store.insert(draft("https://shop.example.com", "a@shop.example.com")).await.expect("first insert");

	let result = store.insert(draft("https://other.example.com", "a@shop.example.com")).await;
	assert!(matches!(result, Err(Error::DuplicateTenant(DuplicateKind::Email))));
}

#[tokio::test]
async fn find_duplicate_detects_conflicts_before_insert() {
	let (store, _conv) = open("sqlite::memory:").await.expect("open store");
	store.insert(draft("https://shop.example.com", "a@shop.example.com")).await.expect("first insert");

	let conflict = store.find_duplicate("https://shop.example.com", "new@shop.example.com").await.expect("find");
	assert_eq!(conflict, Some(DuplicateKind::Site));

	let no_conflict = store.find_duplicate("https://fresh.example.com", "fresh@shop.example.com").await.expect("find");
	assert_eq!(no_conflict, None);
}

#[tokio::test]
async fn hmac_context_round_trips() {
	let (store, _conv) = open("sqlite::memory:").await.expect("open store");
	let record = store.insert(draft("https://shop.example.com", "a@shop.example.com")).await.expect("insert");

	assert!(matches!(store.get_hmac_context(record.tenant_id).await, Err(Error::NotFound)));

	store
		.set_hmac_context(record.tenant_id, "sealed-secret", "shop.example.com", "deadbeef")
		.await
		.expect("set hmac context");

	let ctx = store.get_hmac_context(record.tenant_id).await.expect("get hmac context");
	assert_eq!(ctx.sealed_secret, "sealed-secret");
}

#[tokio::test]
async fn provider_keys_round_trip_and_remove() {
	let (store, _conv) = open("sqlite::memory:").await.expect("open store");
	let record = store.insert(draft("https://shop.example.com", "a@shop.example.com")).await.expect("insert");

	store.set_provider_key(record.tenant_id, Provider::Anthropic, Some("sealed-anthropic")).await.expect("set key");
	let keys = store.get_provider_keys(record.tenant_id).await.expect("get keys");
	assert_eq!(keys.anthropic.as_deref(), Some("sealed-anthropic"));
	assert_eq!(keys.openai, None);

	store.set_provider_key(record.tenant_id, Provider::Anthropic, None).await.expect("clear key");
	let keys = store.get_provider_keys(record.tenant_id).await.expect("get keys");
	assert_eq!(keys.anthropic, None);
}

#[tokio::test]
async fn deactivate_then_validate_fails() {
	let (store, _conv) = open("sqlite::memory:").await.expect("open store");
	let d = draft("https://shop.example.com", "a@shop.example.com");
	let api_key = d.api_key.clone();
	let record = store.insert(d).await.expect("insert");

	store.deactivate(record.tenant_id).await.expect("deactivate");
	assert!(!store.validate(record.tenant_id, &api_key).await.expect("validate"));
}

// vim: ts=4
