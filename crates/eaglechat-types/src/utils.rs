//! Small stateless helpers shared across the gateway: domain normalization,
//! masked-secret display, and credential generation.

use rand::Rng;
use sha2::{Digest, Sha256};

use crate::types::TenantId;

const API_KEY_PREFIX: &str = "eck_";
const API_KEY_RANDOM_LEN: usize = 44;
const MASK_RUN: usize = 12;
const MASK_PREFIX: usize = 8;
const MASK_SUFFIX: usize = 4;

const URL_SAFE_ALPHABET: &[u8] =
	b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789-_";

/// Generates `eck_` followed by 44 URL-safe random characters (>= 256 bits
/// of entropy).
pub fn generate_api_key() -> String {
	let mut rng = rand::rng();
	let mut key = String::with_capacity(API_KEY_PREFIX.len() + API_KEY_RANDOM_LEN);
	key.push_str(API_KEY_PREFIX);
	for _ in 0..API_KEY_RANDOM_LEN {
		let idx = rng.random_range(0..URL_SAFE_ALPHABET.len());
		key.push(URL_SAFE_ALPHABET[idx] as char);
	}
	key
}

/// Lowercases the host and strips the scheme and any default port. `site_url`
/// must already be a parsed absolute URL.
pub fn normalize_domain(url: &url::Url) -> Option<String> {
	url.host_str().map(str::to_lowercase)
}

/// `SHA-256(domain ‖ tenant_id)`, hex-encoded.
pub fn site_hash(domain: &str, tenant_id: TenantId) -> String {
	let mut hasher = Sha256::new();
	hasher.update(domain.as_bytes());
	hasher.update(tenant_id.0.as_bytes());
	hex::encode(hasher.finalize())
}

/// `first8 + "*"*12 + last4`, regardless of the plaintext's actual length,
/// so the mask never leaks how long the secret is.
pub fn mask_secret(plaintext: &str) -> String {
	let chars: Vec<char> = plaintext.chars().collect();
	if chars.len() <= MASK_PREFIX + MASK_SUFFIX {
		return "*".repeat(MASK_RUN);
	}
	let prefix: String = chars[..MASK_PREFIX].iter().collect();
	let suffix: String = chars[chars.len() - MASK_SUFFIX..].iter().collect();
	format!("{prefix}{}{suffix}", "*".repeat(MASK_RUN))
}

/// A printable callback token of at least 16 characters, per the
/// registration coordinator's validation rule.
pub fn is_valid_callback_token(token: &str) -> bool {
	token.chars().count() >= 16 && token.chars().all(|c| !c.is_control())
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn mask_reveals_only_prefix_and_suffix() {
		let masked = mask_secret("sk-ant-REDACTED");
		assert_eq!(masked, "sk-ant-a************wxyz");
	}

	#[test]
	fn mask_handles_short_input_without_panicking() {
		let masked = mask_secret("short");
		assert_eq!(masked, "*".repeat(MASK_RUN));
	}

	#[test]
	fn api_key_matches_shape() {
		let key = generate_api_key();
		assert!(key.starts_with(API_KEY_PREFIX));
		assert_eq!(key.len(), API_KEY_PREFIX.len() + API_KEY_RANDOM_LEN);
	}
}

// vim: ts=4
