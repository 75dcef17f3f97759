//! Common types shared by the gateway core, the store adapter, and the server.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::time::SystemTime;
use uuid::Uuid;

// TenantId //
//**********//

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct TenantId(pub Uuid);

impl TenantId {
	pub fn new() -> Self {
		Self(Uuid::new_v4())
	}
}

impl Default for TenantId {
	fn default() -> Self {
		Self::new()
	}
}

impl std::fmt::Display for TenantId {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}", self.0)
	}
}

impl std::str::FromStr for TenantId {
	type Err = uuid::Error;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		Ok(Self(Uuid::parse_str(s)?))
	}
}

impl Serialize for TenantId {
	fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
	where
		S: Serializer,
	{
		serializer.serialize_str(&self.0.to_string())
	}
}

impl<'de> Deserialize<'de> for TenantId {
	fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
	where
		D: Deserializer<'de>,
	{
		let s = String::deserialize(deserializer)?;
		Uuid::parse_str(&s).map(TenantId).map_err(serde::de::Error::custom)
	}
}

// Timestamp //
//***********//

#[derive(Clone, Copy, Debug, Default)]
pub struct Timestamp(pub i64);

impl Timestamp {
	pub fn now() -> Timestamp {
		let res = SystemTime::now().duration_since(SystemTime::UNIX_EPOCH).unwrap_or_default();
		Timestamp(res.as_secs() as i64)
	}

	pub fn add_seconds(&self, seconds: i64) -> Timestamp {
		Timestamp(self.0 + seconds)
	}

	/// Signed distance in seconds from `other`, positive if `self` is later.
	pub fn delta(&self, other: Timestamp) -> i64 {
		self.0 - other.0
	}
}

impl std::fmt::Display for Timestamp {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}", self.0)
	}
}

impl std::cmp::PartialEq for Timestamp {
	fn eq(&self, other: &Self) -> bool {
		self.0 == other.0
	}
}

impl std::cmp::Eq for Timestamp {}

impl std::cmp::PartialOrd for Timestamp {
	fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
		Some(self.cmp(other))
	}
}

impl std::cmp::Ord for Timestamp {
	fn cmp(&self, other: &Self) -> std::cmp::Ordering {
		self.0.cmp(&other.0)
	}
}

impl Serialize for Timestamp {
	fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
	where
		S: Serializer,
	{
		serializer.serialize_i64(self.0)
	}
}

impl<'de> Deserialize<'de> for Timestamp {
	fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
	where
		D: Deserializer<'de>,
	{
		Ok(Timestamp(i64::deserialize(deserializer)?))
	}
}

// Provider //
//**********//

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
	Anthropic,
	OpenAi,
}

impl Provider {
	pub fn as_str(self) -> &'static str {
		match self {
			Self::Anthropic => "anthropic",
			Self::OpenAi => "openai",
		}
	}

	/// The syntactic prefix a plaintext key for this provider must carry.
	pub fn key_prefix(self) -> &'static str {
		match self {
			Self::Anthropic => "sk-ant-",
			Self::OpenAi => "sk-",
		}
	}
}

impl std::fmt::Display for Provider {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}", self.as_str())
	}
}

// Tenant record //
//***************//

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TenantRecord {
	pub tenant_id: TenantId,
	pub api_key: String,
	pub site_url: String,
	pub admin_email: String,
	pub domain: String,
	pub site_hash: String,
	pub hmac_secret_sealed: Option<String>,
	pub hmac_secret_updated_at: Option<Timestamp>,
	pub anthropic_key_sealed: Option<String>,
	pub openai_key_sealed: Option<String>,
	pub provider_keys_updated_at: Option<Timestamp>,
	pub created_at: Timestamp,
	pub last_seen_at: Option<Timestamp>,
	pub is_active: bool,
	pub metadata: serde_json::Value,
}

/// Subset of [`TenantRecord`] the signer needs to verify a request.
#[derive(Clone, Debug)]
pub struct HmacContext {
	pub sealed_secret: String,
	pub domain: String,
	pub site_hash: String,
	pub updated_at: Timestamp,
}

/// Sealed provider keys as stored, before the broker decrypts on demand.
#[derive(Clone, Debug, Default)]
pub struct SealedProviderKeys {
	pub anthropic: Option<String>,
	pub openai: Option<String>,
}

impl SealedProviderKeys {
	pub fn get(&self, provider: Provider) -> Option<&str> {
		match provider {
			Provider::Anthropic => self.anthropic.as_deref(),
			Provider::OpenAi => self.openai.as_deref(),
		}
	}
}

// Conversation / message //
//*************************//

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
	User,
	Assistant,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversationRecord {
	pub id: i64,
	pub tenant_id: TenantId,
	pub session_id: String,
	pub user_ip: Option<String>,
	pub user_agent: Option<String>,
	pub created_at: Timestamp,
	pub updated_at: Timestamp,
	pub metadata: serde_json::Value,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageRecord {
	pub id: i64,
	pub conversation_id: i64,
	pub tenant_id: TenantId,
	pub role: Role,
	pub content: String,
	pub ts: Timestamp,
	pub metadata: serde_json::Value,
}

// vim: ts=4
