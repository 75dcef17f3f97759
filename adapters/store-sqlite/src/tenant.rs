//! `TenantStore` implementation backed by SQLite.

use async_trait::async_trait;
use eaglechat_types::prelude::*;
use eaglechat_types::types::SealedProviderKeys;
use sqlx::{Row, SqlitePool};
use subtle::ConstantTimeEq;

use crate::utils::{async_map_res, duplicate_kind_from_error, inspect, map_res};

pub struct SqliteTenantStore {
	pub(crate) db: SqlitePool,
}

impl SqliteTenantStore {
	pub(crate) fn new(db: SqlitePool) -> Self {
		Self { db }
	}
}

fn row_to_tenant(row: sqlx::sqlite::SqliteRow) -> Result<TenantRecord, sqlx::Error> {
	let tenant_id_str: String = row.try_get("tenant_id")?;
	let tenant_id: TenantId = tenant_id_str.parse().map_err(|_| sqlx::Error::Decode("bad tenant_id".into()))?;
	let metadata_str: String = row.try_get("metadata")?;
	let metadata = serde_json::from_str(&metadata_str).unwrap_or(serde_json::Value::Null);

	Ok(TenantRecord {
		tenant_id,
		api_key: row.try_get("api_key")?,
		site_url: row.try_get("site_url")?,
		admin_email: row.try_get("admin_email")?,
		domain: row.try_get("domain")?,
		site_hash: row.try_get("site_hash")?,
		hmac_secret_sealed: row.try_get("hmac_secret_sealed")?,
		hmac_secret_updated_at: row.try_get::<Option<i64>, _>("hmac_secret_updated_at")?.map(Timestamp),
		anthropic_key_sealed: row.try_get("anthropic_key_sealed")?,
		openai_key_sealed: row.try_get("openai_key_sealed")?,
		provider_keys_updated_at: row.try_get::<Option<i64>, _>("provider_keys_updated_at")?.map(Timestamp),
		created_at: Timestamp(row.try_get("created_at")?),
		last_seen_at: row.try_get::<Option<i64>, _>("last_seen_at")?.map(Timestamp),
		is_active: row.try_get::<i64, _>("is_active")? != 0,
		metadata,
	})
}

#[async_trait]
impl TenantStore for SqliteTenantStore {
	async fn insert(&self, draft: DraftTenant) -> ClResult<TenantRecord> {
		let now = Timestamp::now();
		let res = sqlx::query(
			"INSERT INTO tenants (tenant_id, api_key, site_url, admin_email, domain, site_hash, created_at, is_active, metadata)
			 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, 1, '{}')
			 RETURNING *",
		)
		.bind(draft.tenant_id.to_string())
		.bind(&draft.api_key)
		.bind(&draft.site_url)
		.bind(&draft.admin_email)
		.bind(&draft.domain)
		.bind(&draft.site_hash)
		.bind(now.0)
		.fetch_one(&self.db)
		.await;

		match res {
			Ok(row) => row_to_tenant(row).map_err(|e| {
				inspect(&e);
				Error::StoreUnavailable
			}),
			Err(err) => {
				if let Some(kind) = duplicate_kind_from_error(&err) {
					Err(Error::DuplicateTenant(kind))
				} else {
					inspect(&err);
					Err(Error::StoreUnavailable)
				}
			}
		}
	}

	async fn find_duplicate(&self, site_url: &str, admin_email: &str) -> ClResult<Option<DuplicateKind>> {
		let res = sqlx::query(
			"SELECT site_url, admin_email FROM tenants WHERE is_active = 1 AND (site_url = ?1 OR admin_email = ?2) LIMIT 1",
		)
		.bind(site_url)
		.bind(admin_email)
		.fetch_optional(&self.db)
		.await
		.inspect_err(inspect)
		.map_err(|_| Error::StoreUnavailable)?;

		let Some(row) = res else { return Ok(None) };
		let found_site: String = row.try_get("site_url").map_err(|_| Error::StoreUnavailable)?;
		if found_site == site_url {
			Ok(Some(DuplicateKind::Site))
		} else {
			Ok(Some(DuplicateKind::Email))
		}
	}

	async fn validate(&self, tenant_id: TenantId, api_key: &str) -> ClResult<bool> {
		let res = sqlx::query(
			"SELECT api_key FROM tenants WHERE tenant_id = ?1 AND is_active = 1",
		)
		.bind(tenant_id.to_string())
		.fetch_optional(&self.db)
		.await
		.inspect_err(inspect)
		.map_err(|_| Error::StoreUnavailable)?;

		// Runtime must not depend on whether the tenant exists or which byte
		// of the key mismatched: always perform a constant-time comparison
		// against either the stored key or a same-length dummy.
		let stored: String = match res {
			Some(ref row) => row.try_get("api_key").map_err(|_| Error::StoreUnavailable)?,
			None => "x".repeat(api_key.len()),
		};

		let matched = bool::from(stored.as_bytes().ct_eq(api_key.as_bytes())) && res.is_some();

		if matched {
			let now = Timestamp::now();
			sqlx::query("UPDATE tenants SET last_seen_at = ?1 WHERE tenant_id = ?2")
				.bind(now.0)
				.bind(tenant_id.to_string())
				.execute(&self.db)
				.await
				.inspect_err(inspect)
				.map_err(|_| Error::StoreUnavailable)?;
		}

		Ok(matched)
	}

	async fn get_hmac_context(&self, tenant_id: TenantId) -> ClResult<HmacContext> {
		let res = sqlx::query(
			"SELECT hmac_secret_sealed, domain, site_hash, hmac_secret_updated_at FROM tenants WHERE tenant_id = ?1 AND is_active = 1",
		)
		.bind(tenant_id.to_string())
		.fetch_one(&self.db)
		.await;

		async_map_res(res, async |row| {
			let sealed_secret: Option<String> = row.try_get("hmac_secret_sealed")?;
			let Some(sealed_secret) = sealed_secret else {
				return Err(sqlx::Error::RowNotFound);
			};
			let updated_at: Option<i64> = row.try_get("hmac_secret_updated_at")?;
			Ok(HmacContext {
				sealed_secret,
				domain: row.try_get("domain")?,
				site_hash: row.try_get("site_hash")?,
				updated_at: Timestamp(updated_at.unwrap_or_default()),
			})
		})
		.await
	}

	async fn set_hmac_context(
		&self,
		tenant_id: TenantId,
		sealed_secret: &str,
		domain: &str,
		site_hash: &str,
	) -> ClResult<()> {
		let now = Timestamp::now();
		let result = sqlx::query(
			"UPDATE tenants SET hmac_secret_sealed = ?1, domain = ?2, site_hash = ?3, hmac_secret_updated_at = ?4
			 WHERE tenant_id = ?5 AND is_active = 1",
		)
		.bind(sealed_secret)
		.bind(domain)
		.bind(site_hash)
		.bind(now.0)
		.bind(tenant_id.to_string())
		.execute(&self.db)
		.await
		.inspect_err(inspect)
		.map_err(|_| Error::StoreUnavailable)?;

		if result.rows_affected() == 0 {
			return Err(Error::NotFound);
		}
		Ok(())
	}

	async fn set_provider_key(&self, tenant_id: TenantId, provider: Provider, sealed: Option<&str>) -> ClResult<()> {
		let now = Timestamp::now();
		let column = match provider {
			Provider::Anthropic => "anthropic_key_sealed",
			Provider::OpenAi => "openai_key_sealed",
		};
		let sql = format!(
			"UPDATE tenants SET {column} = ?1, provider_keys_updated_at = ?2 WHERE tenant_id = ?3 AND is_active = 1"
		);
		let result = sqlx::query(&sql)
			.bind(sealed)
			.bind(now.0)
			.bind(tenant_id.to_string())
			.execute(&self.db)
			.await
			.inspect_err(inspect)
			.map_err(|_| Error::StoreUnavailable)?;

		if result.rows_affected() == 0 {
			return Err(Error::NotFound);
		}
		Ok(())
	}

	async fn get_provider_keys(&self, tenant_id: TenantId) -> ClResult<SealedProviderKeys> {
		let res = sqlx::query(
			"SELECT anthropic_key_sealed, openai_key_sealed FROM tenants WHERE tenant_id = ?1 AND is_active = 1",
		)
		.bind(tenant_id.to_string())
		.fetch_one(&self.db)
		.await;

		map_res(res, |row| {
			Ok(SealedProviderKeys {
				anthropic: row.try_get("anthropic_key_sealed")?,
				openai: row.try_get("openai_key_sealed")?,
			})
		})
	}

	async fn deactivate(&self, tenant_id: TenantId) -> ClResult<()> {
		let result = sqlx::query("UPDATE tenants SET is_active = 0 WHERE tenant_id = ?1 AND is_active = 1")
			.bind(tenant_id.to_string())
			.execute(&self.db)
			.await
			.inspect_err(inspect)
			.map_err(|_| Error::StoreUnavailable)?;

		if result.rows_affected() == 0 {
			return Err(Error::NotFound);
		}
		Ok(())
	}
}

// vim: ts=4
