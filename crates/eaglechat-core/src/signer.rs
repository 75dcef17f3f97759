//! Request signer / verifier: the HMAC envelope over `(timestamp, body)`.
//!
//! Wire representation is three headers: `X-EagleChat-Signature`,
//! `X-EagleChat-Timestamp`, `X-EagleChat-Version`. The signed string is
//! exactly `timestamp + "\n" + raw_body`.

use eaglechat_types::prelude::*;
use hmac::{Hmac, Mac};
use sha2::Sha256;
use subtle::ConstantTimeEq;

type HmacSha256 = Hmac<Sha256>;

/// Clock-skew tolerance: a signature is accepted iff its timestamp is within
/// this many seconds of wall-clock now, in either direction. Not
/// configurable — widening it widens the replay window.
pub const FRESHNESS_WINDOW_SECS: i64 = 300;

pub const SIGNATURE_HEADER: &str = "x-eaglechat-signature";
pub const TIMESTAMP_HEADER: &str = "x-eaglechat-timestamp";
pub const VERSION_HEADER: &str = "x-eaglechat-version";
pub const SIGNATURE_VERSION: &str = "v1";

/// The three headers a protected request must carry, already extracted from
/// the transport layer by the caller.
pub struct SignatureHeaders<'a> {
	pub signature: &'a str,
	pub timestamp: &'a str,
	pub version: &'a str,
}

/// Computes `hmac-sha256=<hex>` over `timestamp + "\n" + body` under `secret`.
pub fn sign(secret: &str, timestamp: i64, body: &[u8]) -> ClResult<String> {
	let mac = mac_over(secret, timestamp, body)?;
	Ok(format!("hmac-sha256={}", hex::encode(mac.into_bytes())))
}

/// Verifies `headers` against `secret` and `body` at `now`. Returns `Ok(())`
/// on a valid, fresh, matching signature.
pub fn verify(headers: SignatureHeaders<'_>, secret: &str, body: &[u8], now: Timestamp) -> ClResult<()> {
	if headers.version != SIGNATURE_VERSION {
		return Err(Error::BadSignature);
	}

	let claimed_ts: i64 = headers.timestamp.parse().map_err(|_| Error::BadSignature)?;
	if (Timestamp(claimed_ts).delta(now)).abs() > FRESHNESS_WINDOW_SECS {
		return Err(Error::StaleTimestamp);
	}

	let expected = sign(secret, claimed_ts, body)?;

	// Constant-time comparison: runtime must not depend on where the first
	// mismatched byte falls.
	if bool::from(expected.as_bytes().ct_eq(headers.signature.as_bytes())) {
		Ok(())
	} else {
		Err(Error::BadSignature)
	}
}

fn mac_over(secret: &str, timestamp: i64, body: &[u8]) -> ClResult<HmacSha256> {
	let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
		.map_err(|_| Error::Internal("hmac key of invalid length".into()))?;
	mac.update(timestamp.to_string().as_bytes());
	mac.update(b"\n");
	mac.update(body);
	Ok(mac)
}

#[cfg(test)]
mod tests {
	use super::*;

	const SECRET: &str = "tenant-hmac-secret";

	#[test]
	fn valid_signature_within_window_is_accepted() {
		let now = Timestamp::now();
		let body = b"{\"message\":\"hi\"}";
		let signature = sign(SECRET, now.0, body).expect("sign");

		let headers = SignatureHeaders {
			signature: &signature,
			timestamp: &now.0.to_string(),
			version: SIGNATURE_VERSION,
		};
		assert!(verify(headers, SECRET, body, now).is_ok());
	}

	#[test]
	fn signature_outside_window_is_stale() {
		let signed_at = Timestamp(1_000_000);
		let now = Timestamp(1_000_000 + FRESHNESS_WINDOW_SECS + 1);
		let body = b"payload";
		let signature = sign(SECRET, signed_at.0, body).expect("sign");

		let headers = SignatureHeaders {
			signature: &signature,
			timestamp: &signed_at.0.to_string(),
			version: SIGNATURE_VERSION,
		};
		assert!(matches!(verify(headers, SECRET, body, now), Err(Error::StaleTimestamp)));
	}

	#[test]
	fn flipped_bit_is_rejected() {
		let now = Timestamp::now();
		let body = b"payload";
		let mut signature = sign(SECRET, now.0, body).expect("sign");
		let last = signature.pop().expect("non-empty signature");
		signature.push(if last == '0' { '1' } else { '0' });

		let headers = SignatureHeaders { signature: &signature, timestamp: &now.0.to_string(), version: SIGNATURE_VERSION };
		assert!(matches!(verify(headers, SECRET, body, now), Err(Error::BadSignature)));
	}

	#[test]
	fn wrong_secret_is_rejected() {
		let now = Timestamp::now();
		let body = b"payload";
		let signature = sign(SECRET, now.0, body).expect("sign");

		let headers = SignatureHeaders { signature: &signature, timestamp: &now.0.to_string(), version: SIGNATURE_VERSION };
		assert!(matches!(verify(headers, "a different secret", body, now), Err(Error::BadSignature)));
	}
}

// vim: ts=4
