//! Database schema initialization.

use sqlx::SqlitePool;

pub(crate) async fn init_db(db: &SqlitePool) -> Result<(), sqlx::Error> {
	let mut tx = db.begin().await?;

	sqlx::query(
		"CREATE TABLE IF NOT EXISTS tenants (
			tenant_id text NOT NULL,
			api_key text NOT NULL,
			site_url text NOT NULL,
			admin_email text NOT NULL,
			domain text NOT NULL,
			site_hash text NOT NULL,
			hmac_secret_sealed text,
			hmac_secret_updated_at integer,
			anthropic_key_sealed text,
			openai_key_sealed text,
			provider_keys_updated_at integer,
			created_at integer NOT NULL,
			last_seen_at integer,
			is_active integer NOT NULL DEFAULT 1,
			metadata text NOT NULL DEFAULT '{}',
			PRIMARY KEY(tenant_id)
		)",
	)
	.execute(&mut *tx)
	.await?;
	sqlx::query("CREATE UNIQUE INDEX IF NOT EXISTS idx_tenants_api_key ON tenants (api_key)")
		.execute(&mut *tx)
		.await?;
	sqlx::query(
		"CREATE UNIQUE INDEX IF NOT EXISTS idx_tenants_site_url_active ON tenants (site_url) WHERE is_active = 1",
	)
	.execute(&mut *tx)
	.await?;
	sqlx::query(
		"CREATE UNIQUE INDEX IF NOT EXISTS idx_tenants_admin_email_active ON tenants (admin_email) WHERE is_active = 1",
	)
	.execute(&mut *tx)
	.await?;

	sqlx::query(
		"CREATE TABLE IF NOT EXISTS conversations (
			id integer PRIMARY KEY AUTOINCREMENT,
			tenant_id text NOT NULL,
			session_id text NOT NULL,
			user_ip text,
			user_agent text,
			created_at integer NOT NULL,
			updated_at integer NOT NULL,
			metadata text NOT NULL DEFAULT '{}'
		)",
	)
	.execute(&mut *tx)
	.await?;
	sqlx::query(
		"CREATE UNIQUE INDEX IF NOT EXISTS idx_conversations_tenant_session ON conversations (tenant_id, session_id)",
	)
	.execute(&mut *tx)
	.await?;

	sqlx::query(
		"CREATE TABLE IF NOT EXISTS messages (
			id integer PRIMARY KEY AUTOINCREMENT,
			conversation_id integer NOT NULL,
			tenant_id text NOT NULL,
			role text NOT NULL,
			content text NOT NULL,
			ts integer NOT NULL,
			metadata text NOT NULL DEFAULT '{}'
		)",
	)
	.execute(&mut *tx)
	.await?;
	sqlx::query("CREATE INDEX IF NOT EXISTS idx_messages_conversation ON messages (conversation_id)")
		.execute(&mut *tx)
		.await?;

	tx.commit().await?;
	Ok(())
}

// vim: ts=4
