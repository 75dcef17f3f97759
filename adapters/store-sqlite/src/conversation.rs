//! `ConversationStore` implementation backed by SQLite. A thin collaborator:
//! no uniqueness invariants beyond `(tenant_id, session_id)`, no crypto.

use async_trait::async_trait;
use eaglechat_types::prelude::*;
use sqlx::{Row, SqlitePool};

use crate::utils::{inspect, map_res};

pub struct SqliteConversationStore {
	pub(crate) db: SqlitePool,
}

impl SqliteConversationStore {
	pub(crate) fn new(db: SqlitePool) -> Self {
		Self { db }
	}
}

fn row_to_conversation(row: sqlx::sqlite::SqliteRow) -> Result<ConversationRecord, sqlx::Error> {
	let tenant_id_str: String = row.try_get("tenant_id")?;
	let tenant_id: TenantId = tenant_id_str.parse().map_err(|_| sqlx::Error::Decode("bad tenant_id".into()))?;
	let metadata_str: String = row.try_get("metadata")?;
	Ok(ConversationRecord {
		id: row.try_get("id")?,
		tenant_id,
		session_id: row.try_get("session_id")?,
		user_ip: row.try_get("user_ip")?,
		user_agent: row.try_get("user_agent")?,
		created_at: Timestamp(row.try_get("created_at")?),
		updated_at: Timestamp(row.try_get("updated_at")?),
		metadata: serde_json::from_str(&metadata_str).unwrap_or(serde_json::Value::Null),
	})
}

fn row_to_message(row: sqlx::sqlite::SqliteRow) -> Result<MessageRecord, sqlx::Error> {
	let tenant_id_str: String = row.try_get("tenant_id")?;
	let tenant_id: TenantId = tenant_id_str.parse().map_err(|_| sqlx::Error::Decode("bad tenant_id".into()))?;
	let role_str: String = row.try_get("role")?;
	let role = match role_str.as_str() {
		"user" => Role::User,
		_ => Role::Assistant,
	};
	let metadata_str: String = row.try_get("metadata")?;
	Ok(MessageRecord {
		id: row.try_get("id")?,
		conversation_id: row.try_get("conversation_id")?,
		tenant_id,
		role,
		content: row.try_get("content")?,
		ts: Timestamp(row.try_get("ts")?),
		metadata: serde_json::from_str(&metadata_str).unwrap_or(serde_json::Value::Null),
	})
}

#[async_trait]
impl ConversationStore for SqliteConversationStore {
	async fn get_or_create_conversation(
		&self,
		tenant_id: TenantId,
		session_id: &str,
		user_ip: Option<&str>,
		user_agent: Option<&str>,
	) -> ClResult<ConversationRecord> {
		let existing = sqlx::query("SELECT * FROM conversations WHERE tenant_id = ?1 AND session_id = ?2")
			.bind(tenant_id.to_string())
			.bind(session_id)
			.fetch_optional(&self.db)
			.await
			.inspect_err(inspect)
			.map_err(|_| Error::StoreUnavailable)?;

		if let Some(row) = existing {
			return row_to_conversation(row).map_err(|_| Error::StoreUnavailable);
		}

		let now = Timestamp::now();
		let res = sqlx::query(
			"INSERT INTO conversations (tenant_id, session_id, user_ip, user_agent, created_at, updated_at, metadata)
			 VALUES (?1, ?2, ?3, ?4, ?5, ?5, '{}')
			 RETURNING *",
		)
		.bind(tenant_id.to_string())
		.bind(session_id)
		.bind(user_ip)
		.bind(user_agent)
		.bind(now.0)
		.fetch_one(&self.db)
		.await;

		map_res(res, row_to_conversation)
	}

	async fn append_message(
		&self,
		conversation_id: i64,
		tenant_id: TenantId,
		role: Role,
		content: &str,
	) -> ClResult<MessageRecord> {
		let now = Timestamp::now();
		let role_str = match role {
			Role::User => "user",
			Role::Assistant => "assistant",
		};

		let res = sqlx::query(
			"INSERT INTO messages (conversation_id, tenant_id, role, content, ts, metadata)
			 VALUES (?1, ?2, ?3, ?4, ?5, '{}')
			 RETURNING *",
		)
		.bind(conversation_id)
		.bind(tenant_id.to_string())
		.bind(role_str)
		.bind(content)
		.bind(now.0)
		.fetch_one(&self.db)
		.await;

		let message = map_res(res, row_to_message)?;

		sqlx::query("UPDATE conversations SET updated_at = ?1 WHERE id = ?2")
			.bind(now.0)
			.bind(conversation_id)
			.execute(&self.db)
			.await
			.inspect_err(inspect)
			.map_err(|_| Error::StoreUnavailable)?;

		Ok(message)
	}

	async fn list_messages(&self, tenant_id: TenantId, session_id: &str) -> ClResult<Vec<MessageRecord>> {
		let conversation = sqlx::query("SELECT id FROM conversations WHERE tenant_id = ?1 AND session_id = ?2")
			.bind(tenant_id.to_string())
			.bind(session_id)
			.fetch_optional(&self.db)
			.await
			.inspect_err(inspect)
			.map_err(|_| Error::StoreUnavailable)?;

		let Some(conversation) = conversation else { return Ok(Vec::new()) };
		let conversation_id: i64 = conversation.try_get("id").map_err(|_| Error::StoreUnavailable)?;

		let rows = sqlx::query("SELECT * FROM messages WHERE conversation_id = ?1 ORDER BY ts ASC, id ASC")
			.bind(conversation_id)
			.fetch_all(&self.db)
			.await
			.inspect_err(inspect)
			.map_err(|_| Error::StoreUnavailable)?;

		rows.into_iter().map(row_to_message).collect::<Result<Vec<_>, _>>().map_err(|_| Error::StoreUnavailable)
	}
}

// vim: ts=4
