//! SSRF guard for the registration coordinator's callback dereference.
//!
//! The coordinator accepts an arbitrary `site_url` and calls back into it.
//! Before that happens the resolved address of the host is checked against
//! RFC 1918, loopback, and link-local ranges. This is not optional except
//! under `development_mode`, where the operator has explicitly relaxed it.

use std::net::IpAddr;

use eaglechat_types::prelude::*;
use hickory_resolver::config::ResolverConfig;
use hickory_resolver::name_server::TokioConnectionProvider;
use hickory_resolver::TokioResolver;

pub fn build_resolver() -> TokioResolver {
	TokioResolver::builder_with_config(ResolverConfig::default(), TokioConnectionProvider::default()).build()
}

/// Resolves `host` and rejects the callback if any resolved address is
/// private, loopback, or link-local, unless `development_mode` is set.
pub async fn check_host(resolver: &TokioResolver, host: &str, development_mode: bool) -> ClResult<()> {
	if development_mode {
		return Ok(());
	}

	if let Ok(addr) = host.parse::<IpAddr>() {
		return reject_if_private(addr);
	}

	let lookup = resolver
		.lookup_ip(host)
		.await
		.map_err(|e| Error::Validation(format!("could not resolve site_url host: {e}")))?;

	let mut saw_any = false;
	for addr in lookup.iter() {
		saw_any = true;
		reject_if_private(addr)?;
	}

	if !saw_any {
		return Err(Error::Validation("site_url host did not resolve to any address".into()));
	}

	Ok(())
}

fn reject_if_private(addr: IpAddr) -> ClResult<()> {
	let blocked = match addr {
		IpAddr::V4(v4) => {
			v4.is_private() || v4.is_loopback() || v4.is_link_local() || v4.is_broadcast() || v4.is_unspecified()
		}
		IpAddr::V6(v6) => v6.is_loopback() || v6.is_unspecified() || is_unique_local_v6(v6),
	};

	if blocked {
		Err(Error::Validation("site_url resolves to a private or loopback address".into()))
	} else {
		Ok(())
	}
}

/// `fc00::/7` — IPv6's equivalent of RFC 1918 space. Stable on current Rust
/// without the nightly-gated `Ipv6Addr::is_unique_local`.
fn is_unique_local_v6(addr: std::net::Ipv6Addr) -> bool {
	(addr.segments()[0] & 0xfe00) == 0xfc00
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::net::Ipv4Addr;

	#[test]
	fn rejects_private_ipv4() {
		assert!(reject_if_private(IpAddr::V4(Ipv4Addr::new(10, 0, 0, 1))).is_err());
		assert!(reject_if_private(IpAddr::V4(Ipv4Addr::new(192, 168, 1, 1))).is_err());
		assert!(reject_if_private(IpAddr::V4(Ipv4Addr::new(127, 0, 0, 1))).is_err());
	}

	#[test]
	fn allows_public_ipv4() {
		assert!(reject_if_private(IpAddr::V4(Ipv4Addr::new(93, 184, 216, 34))).is_ok());
	}

	#[tokio::test]
	async fn development_mode_skips_the_check() {
		let resolver = build_resolver();
		assert!(check_host(&resolver, "localhost", true).await.is_ok());
	}
}

// vim: ts=4
