//! Per-source-address token bucket rate limiting.
//!
//! A thin collaborator: one tier, keyed by the literal source address, built
//! on the same `governor` GCRA primitive the platform's hierarchical limiter
//! uses, without the ipv4/ipv6 network-level bucketing that limiter adds.

use std::net::IpAddr;
use std::num::NonZeroU32;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use eaglechat_types::prelude::*;
use governor::clock::{Clock, DefaultClock};
use governor::state::keyed::DashMapStateStore;
use governor::{Quota, RateLimiter as GovernorLimiter};

type KeyedLimiter = GovernorLimiter<IpAddr, DashMapStateStore<IpAddr>, DefaultClock>;

const DEFAULT_REQUESTS: u32 = 20;
const DEFAULT_WINDOW: Duration = Duration::from_secs(60);

/// How many `check` calls elapse between sweeps of idle buckets.
const CLEANUP_INTERVAL_CHECKS: u64 = 4096;

/// Default 20 requests / 60 s with per-second refill. Buckets for addresses
/// that have gone idle are swept out periodically so the keyed map doesn't
/// grow for the life of the process.
pub struct AddressRateLimiter {
	limiter: Arc<KeyedLimiter>,
	clock: DefaultClock,
	checks_since_cleanup: AtomicU64,
}

impl AddressRateLimiter {
	pub fn new() -> Self {
		Self::with_quota(DEFAULT_REQUESTS, DEFAULT_WINDOW)
	}

	pub fn with_quota(requests: u32, window: Duration) -> Self {
		let requests = NonZeroU32::new(requests).unwrap_or(NonZeroU32::MIN);
		let period = window / requests.get().max(1);
		let quota = Quota::with_period(period).unwrap_or_else(|| Quota::per_second(requests)).allow_burst(requests);

		Self {
			limiter: Arc::new(GovernorLimiter::keyed(quota)),
			clock: DefaultClock::default(),
			checks_since_cleanup: AtomicU64::new(0),
		}
	}

	/// Checks and consumes one token for `addr`. On exhaustion returns
	/// `Error::RateLimited` carrying a Retry-After in seconds.
	pub fn check(&self, addr: IpAddr) -> ClResult<()> {
		if self.checks_since_cleanup.fetch_add(1, Ordering::Relaxed) % CLEANUP_INTERVAL_CHECKS == 0 {
			self.limiter.retain_recent();
		}

		match self.limiter.check_key(&addr) {
			Ok(()) => Ok(()),
			Err(not_until) => {
				let wait = not_until.wait_time_from(self.clock.now());
				Err(Error::RateLimited { retry_after_secs: wait.as_secs().max(1) })
			}
		}
	}
}

impl Default for AddressRateLimiter {
	fn default() -> Self {
		Self::new()
	}
}


// vim: ts=4
