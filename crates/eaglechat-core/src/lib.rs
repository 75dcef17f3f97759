//! Crypto primitives, the master-keyed vault, the request signer, the rate
//! limiter, the SSRF guard, and the shared outbound HTTP client for the
//! EagleChat gateway.

pub mod http_client;
pub mod rate_limit;
pub mod signer;
pub mod ssrf;
pub mod vault;
pub mod worker;

// vim: ts=4
