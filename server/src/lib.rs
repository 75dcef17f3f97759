//! HTTP boundary for the EagleChat gateway: wires the vault, stores,
//! registration coordinator, provider-key broker, and rate limiter from the
//! core crates into an axum router.

pub mod app;
pub mod bootstrap;
pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod settings;

// vim: ts=4
