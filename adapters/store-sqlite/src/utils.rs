//! Helper functions shared by the tenant and conversation store impls.

use eaglechat_types::error::{ClResult, DuplicateKind, Error};
use sqlx::sqlite::SqliteRow;
use tracing::warn;

pub(crate) fn inspect(err: &sqlx::Error) {
	warn!("db: {:#?}", err);
}

pub(crate) fn map_res<T, F>(row: Result<SqliteRow, sqlx::Error>, f: F) -> ClResult<T>
where
	F: FnOnce(SqliteRow) -> Result<T, sqlx::Error>,
{
	match row {
		Ok(row) => f(row).inspect_err(inspect).map_err(|_| Error::StoreUnavailable),
		Err(sqlx::Error::RowNotFound) => Err(Error::NotFound),
		Err(err) => {
			inspect(&err);
			Err(Error::StoreUnavailable)
		}
	}
}

pub(crate) async fn async_map_res<T, F, Fut>(row: Result<SqliteRow, sqlx::Error>, f: F) -> ClResult<T>
where
	F: FnOnce(SqliteRow) -> Fut,
	Fut: std::future::Future<Output = Result<T, sqlx::Error>>,
{
	match row {
		Ok(row) => f(row).await.inspect_err(inspect).map_err(|_| Error::StoreUnavailable),
		Err(sqlx::Error::RowNotFound) => Err(Error::NotFound),
		Err(err) => {
			inspect(&err);
			Err(Error::StoreUnavailable)
		}
	}
}

/// Maps a `UNIQUE constraint failed` error from an `insert` attempt onto the
/// invariant it tripped, by inspecting which column the database named.
pub(crate) fn duplicate_kind_from_error(err: &sqlx::Error) -> Option<DuplicateKind> {
	let sqlx::Error::Database(db_err) = err else { return None };
	if !db_err.is_unique_violation() {
		return None;
	}

	let message = db_err.message();
	if message.contains("tenants.site_url") {
		Some(DuplicateKind::Site)
	} else if message.contains("tenants.admin_email") {
		Some(DuplicateKind::Email)
	} else if message.contains("tenants.api_key") {
		Some(DuplicateKind::ApiKey)
	} else if message.contains("tenants.tenant_id") || message.contains("tenants.PRIMARY") {
		Some(DuplicateKind::TenantId)
	} else {
		None
	}
}

// vim: ts=4
