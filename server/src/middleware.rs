//! Custom middleware: per-address rate limiting ahead of every route.

use axum::body::Body;
use axum::extract::{ConnectInfo, State};
use axum::http::Request;
use axum::middleware::Next;
use axum::response::Response;
use eaglechat_types::prelude::*;
use std::net::SocketAddr;

use crate::app::App;

pub async fn rate_limit(
	State(app): State<App>,
	ConnectInfo(addr): ConnectInfo<SocketAddr>,
	req: Request<Body>,
	next: Next,
) -> Result<Response, Error> {
	app.rate_limiter.check(addr.ip())?;
	Ok(next.run(req).await)
}

// vim: ts=4
