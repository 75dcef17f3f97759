//! SQLite-backed implementation of `eaglechat_types::store::{TenantStore, ConversationStore}`.
//!
//! Uniqueness is enforced by `UNIQUE` indexes on `tenants`, not by
//! read-then-write: races between concurrent `insert`s are resolved by the
//! database, and the loser sees `Error::DuplicateTenant`.

mod conversation;
mod schema;
mod tenant;
mod utils;

pub use conversation::SqliteConversationStore;
pub use tenant::SqliteTenantStore;

use eaglechat_types::error::{ClResult, Error};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::str::FromStr;

/// Opens (creating if necessary) a SQLite database at `url` — e.g.
/// `sqlite://./eaglechat.db` or `sqlite::memory:` for tests — runs schema
/// migrations, and returns both store handles sharing one connection pool.
pub async fn open(url: &str) -> ClResult<(SqliteTenantStore, SqliteConversationStore)> {
	let options = SqliteConnectOptions::from_str(url)
		.map_err(|e| Error::ConfigError(format!("invalid STORE_URL: {e}")))?
		.create_if_missing(true);

	// An in-memory database is private to a single connection; pooling more
	// than one would silently hand out unrelated empty databases.
	let max_connections = if url.contains(":memory:") { 1 } else { 8 };

	let pool = SqlitePoolOptions::new()
		.max_connections(max_connections)
		.connect_with(options)
		.await
		.map_err(|e| Error::Internal(format!("failed to open store: {e}")))?;

	schema::init_db(&pool).await.map_err(|e| Error::Internal(format!("failed to initialize schema: {e}")))?;

	Ok((SqliteTenantStore::new(pool.clone()), SqliteConversationStore::new(pool)))
}

/// Same as [`open`], but for an already-constructed pool — used by tests
/// that want an in-memory database shared across assertions.
pub async fn from_pool(pool: SqlitePool) -> ClResult<(SqliteTenantStore, SqliteConversationStore)> {
	schema::init_db(&pool).await.map_err(|e| Error::Internal(format!("failed to initialize schema: {e}")))?;
	Ok((SqliteTenantStore::new(pool.clone()), SqliteConversationStore::new(pool)))
}

// vim: ts=4
