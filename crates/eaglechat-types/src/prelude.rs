//! Common imports pulled in with `use eaglechat_types::prelude::*;`.

pub use crate::error::{ClResult, DuplicateKind, Error};
pub use crate::store::{ConversationStore, DraftTenant, TenantStore};
pub use crate::types::{
	ConversationRecord, HmacContext, MessageRecord, Provider, Role, SealedProviderKeys, TenantId,
	TenantRecord, Timestamp,
};

pub use tracing::{debug, debug_span, error, error_span, info, info_span, warn, warn_span};

// vim: ts=4
