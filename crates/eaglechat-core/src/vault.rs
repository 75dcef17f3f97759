//! Master-keyed secret vault.
//!
//! Derives a single process-wide data-encryption key from an operator
//! master secret via a fixed-salt PBKDF2-HMAC-SHA256 stretch, then seals and
//! opens ciphertexts through a Fernet-style AEAD (AES-128-CBC + HMAC-SHA256,
//! versioned envelope carrying its own IV and authentication tag).

use base64::Engine;
use eaglechat_types::prelude::*;
use fernet::Fernet;
use pbkdf2::pbkdf2_hmac;
use sha2::Sha256;

const KDF_ITERATIONS: u32 = 100_000;
const KDF_SALT: &[u8] = b"eaglechat-vault-kdf-v1";
const KEY_LEN: usize = 32;

/// Immutable once built. The derived key is never mutated or rotated at
/// runtime; rotation, if ever needed, means restarting with a new
/// `MASTER_KEY` and re-sealing every stored secret.
pub struct Vault {
	fernet: Fernet,
}

impl Vault {
	/// `master_secret` is the raw master key bytes (decoded from the
	/// operator-supplied base64 `MASTER_KEY`). Stretching happens once, here,
	/// not per-ciphertext: the fixed salt is acceptable because the master
	/// secret itself is assumed high-entropy, and per-ciphertext freshness
	/// comes from the AEAD's own IV.
	pub fn new(master_secret: &[u8]) -> ClResult<Self> {
		let mut derived = [0u8; KEY_LEN];
		pbkdf2_hmac::<Sha256>(master_secret, KDF_SALT, KDF_ITERATIONS, &mut derived);

		let fernet_key = base64::engine::general_purpose::URL_SAFE.encode(derived);
		let fernet = Fernet::new(&fernet_key)
			.ok_or_else(|| Error::Internal("failed to build vault cipher from derived key".into()))?;

		Ok(Self { fernet })
	}

	/// Seals `plaintext` into a self-describing, versioned ciphertext.
	pub fn seal(&self, plaintext: &str) -> String {
		self.fernet.encrypt(plaintext.as_bytes())
	}

	/// Opens a ciphertext produced by [`Vault::seal`]. Any tag mismatch or
	/// malformed envelope fails with `Error::SealIntegrity`.
	pub fn open(&self, ciphertext: &str) -> ClResult<String> {
		let bytes = self.fernet.decrypt(ciphertext).map_err(|_| Error::SealIntegrity)?;
		String::from_utf8(bytes).map_err(|_| Error::SealIntegrity)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn test_vault() -> Vault {
		Vault::new(b"a sufficiently long and high entropy master secret").expect("vault init")
	}

	#[test]
	fn seal_then_open_round_trips() {
		let vault = test_vault();
		let sealed = vault.seal("sk-ant-super-secret-key");
		let opened = vault.open(&sealed).expect("open");
		assert_eq!(opened, "sk-ant-super-secret-key");
	}

	#[test]
	fn tampered_ciphertext_fails_integrity() {
		let vault = test_vault();
		let mut sealed = vault.seal("sk-ant-super-secret-key");
		let last = sealed.pop().expect("non-empty token");
		sealed.push(if last == 'A' { 'B' } else { 'A' });

		let result = vault.open(&sealed);
		assert!(matches!(result, Err(Error::SealIntegrity)));
	}

	#[test]
	fn different_master_secrets_cannot_open_each_other() {
		let vault_a = Vault::new(b"master secret number one, long enough").expect("vault a");
		let vault_b = Vault::new(b"master secret number two, also long enough").expect("vault b");

		let sealed = vault_a.seal("payload");
		assert!(matches!(vault_b.open(&sealed), Err(Error::SealIntegrity)));
	}
}

// vim: ts=4
