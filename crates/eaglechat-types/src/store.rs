//! Storage traits implemented by the SQLite adapter crate.

use async_trait::async_trait;

use crate::error::{ClResult, DuplicateKind};
use crate::types::{
	ConversationRecord, HmacContext, MessageRecord, Provider, Role, SealedProviderKeys, TenantId,
	TenantRecord, Timestamp,
};

/// A not-yet-persisted tenant, as minted by the registration coordinator
/// after callback attestation succeeds.
#[derive(Clone, Debug)]
pub struct DraftTenant {
	pub tenant_id: TenantId,
	pub api_key: String,
	pub site_url: String,
	pub admin_email: String,
	pub domain: String,
	pub site_hash: String,
}

/// Persistent mapping from tenant-id to tenant record. One implementation,
/// `SqliteTenantStore`, lives in the `eaglechat-store-sqlite` adapter crate;
/// the gateway and server crates depend only on this trait.
#[async_trait]
pub trait TenantStore: Send + Sync {
	/// Atomically inserts `draft`, enforcing the tenant_id / api_key /
	/// site_url / admin_email uniqueness invariants. Fails with
	/// `Error::DuplicateTenant` naming the invariant that tripped.
	async fn insert(&self, draft: DraftTenant) -> ClResult<TenantRecord>;

	/// Cheap pre-check used by the registration coordinator to reject known-bad
	/// requests before burning a callback attempt. `insert` remains the
	/// authority: a race between this check and `insert` is resolved there,
	/// by the storage layer's uniqueness constraints, not here.
	async fn find_duplicate(&self, site_url: &str, admin_email: &str) -> ClResult<Option<DuplicateKind>>;

	/// True iff an active tenant with `tenant_id` holds exactly `api_key`.
	/// Touches `last_seen_at` on success. Runtime must not depend on
	/// whether or where the comparison failed.
	async fn validate(&self, tenant_id: TenantId, api_key: &str) -> ClResult<bool>;

	async fn get_hmac_context(&self, tenant_id: TenantId) -> ClResult<HmacContext>;

	async fn set_hmac_context(
		&self,
		tenant_id: TenantId,
		sealed_secret: &str,
		domain: &str,
		site_hash: &str,
	) -> ClResult<()>;

	/// `sealed = None` clears the key for that provider.
	async fn set_provider_key(
		&self,
		tenant_id: TenantId,
		provider: Provider,
		sealed: Option<&str>,
	) -> ClResult<()>;

	async fn get_provider_keys(&self, tenant_id: TenantId) -> ClResult<SealedProviderKeys>;

	/// Soft delete: flips `is_active` to false. Cascades to conversations.
	async fn deactivate(&self, tenant_id: TenantId) -> ClResult<()>;
}

/// Thin collaborator storing conversation and message state. Kept separate
/// from `TenantStore` because conversation retrieval has no uniqueness or
/// crypto invariants of its own.
#[async_trait]
pub trait ConversationStore: Send + Sync {
	async fn get_or_create_conversation(
		&self,
		tenant_id: TenantId,
		session_id: &str,
		user_ip: Option<&str>,
		user_agent: Option<&str>,
	) -> ClResult<ConversationRecord>;

	async fn append_message(
		&self,
		conversation_id: i64,
		tenant_id: TenantId,
		role: Role,
		content: &str,
	) -> ClResult<MessageRecord>;

	async fn list_messages(
		&self,
		tenant_id: TenantId,
		session_id: &str,
	) -> ClResult<Vec<MessageRecord>>;
}

/// A timestamped marker used by stores that need `now()` without pulling in
/// `eaglechat-core` (which would create a dependency cycle with the broker).
pub fn touch() -> Timestamp {
	Timestamp::now()
}

// vim: ts=4
