//! Shared scaffolding for the server's integration tests: an `App` wired to
//! an in-memory store, and a tiny local HTTP server standing in for the
//! WordPress callback the registration coordinator calls back into.

use std::convert::Infallible;
use std::sync::Arc;

use base64::Engine;
use eaglechat_core::vault::Vault;
use eaglechat_server::app::{App, AppBuilder};
use eaglechat_server::settings::Settings;
use http_body_util::{BodyExt, Full};
use hyper::body::{Bytes, Incoming};
use hyper::service::service_fn;
use hyper::{Request, Response, StatusCode};
use hyper_util::rt::TokioIo;
use parking_lot::Mutex;
use tokio::net::TcpListener;

const TEST_MASTER_KEY: &[u8] = b"a sufficiently long and high entropy test master secret";

/// Builds an `App` over a fresh in-memory database. `development_mode` is on
/// so registration's SSRF guard allows callbacks to the loopback mock
/// server below; real deployments never set this.
pub async fn test_app() -> App {
	let (tenant_store, conversation_store) = eaglechat_store_sqlite::open("sqlite::memory:").await.expect("open store");
	let vault = Vault::new(TEST_MASTER_KEY).expect("vault init");

	let mut settings = Settings::default();
	settings.api.development_mode = true;
	settings.callback.retry_attempts = 2;
	settings.callback.retry_delay_seconds = 0;

	AppBuilder::new(tenant_store, conversation_store, vault, settings).build().expect("build app")
}

pub fn test_vault() -> Vault {
	Vault::new(TEST_MASTER_KEY).expect("vault init")
}

pub fn master_key_b64() -> String {
	base64::engine::general_purpose::STANDARD.encode(TEST_MASTER_KEY)
}

/// A scripted response queue a mock server call pops from; once exhausted
/// it repeats the last entry, so a test needn't size the queue exactly.
pub struct MockServer {
	pub base_url: String,
	responses: Arc<Mutex<Vec<(StatusCode, String)>>>,
	pub requests: Arc<Mutex<Vec<String>>>,
}

impl MockServer {
	/// Spawns a background task serving `responses` in order over a
	/// loopback TCP listener on an OS-assigned port.
	pub async fn start(responses: Vec<(StatusCode, String)>) -> Self {
		let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind mock server");
		let addr = listener.local_addr().expect("local addr");
		let responses = Arc::new(Mutex::new(responses));
		let requests = Arc::new(Mutex::new(Vec::new()));

		let responses_bg = responses.clone();
		let requests_bg = requests.clone();
		tokio::spawn(async move {
			loop {
				let Ok((stream, _)) = listener.accept().await else { break };
				let io = TokioIo::new(stream);
				let responses = responses_bg.clone();
				let requests = requests_bg.clone();
				tokio::spawn(async move {
					let service = service_fn(move |req: Request<Incoming>| {
						let responses = responses.clone();
						let requests = requests.clone();
						async move {
							let body = req.into_body().collect().await.map(|b| b.to_bytes()).unwrap_or_default();
							requests.lock().push(String::from_utf8_lossy(&body).into_owned());

							let (status, body) = {
								let queue = responses.lock();
								let idx = requests.lock().len().saturating_sub(1).min(queue.len().saturating_sub(1));
								queue[idx].clone()
							};

							Ok::<_, Infallible>(
								Response::builder()
									.status(status)
									.body(Full::new(Bytes::from(body)))
									.unwrap_or_else(|_| Response::new(Full::new(Bytes::new()))),
							)
						}
					});

					let _ = hyper::server::conn::http1::Builder::new().serve_connection(io, service).await;
				});
			}
		});

		Self { base_url: format!("http://{addr}"), responses, requests }
	}

	pub fn request_count(&self) -> usize {
		self.requests.lock().len()
	}
}

/// A fixed loopback address to stand in for a client's source IP in tests
/// that drive the router directly via `tower::ServiceExt::oneshot` — there
/// is no real TCP connection for axum to read one from.
pub fn client_addr() -> std::net::SocketAddr {
	std::net::SocketAddr::new(std::net::Ipv4Addr::new(203, 0, 113, 1).into(), 0)
}

/// Sends a JSON POST through `router` as if it arrived over the wire,
/// including the `ConnectInfo` extension the rate-limit middleware expects.
pub async fn post_json(
	router: &axum::Router,
	uri: &str,
	body: serde_json::Value,
) -> (hyper::StatusCode, serde_json::Value) {
	post_raw(router, uri, &[], body.to_string().into_bytes()).await
}

/// Sends a raw-body POST with extra headers — used by the HMAC-protected
/// endpoints, which sign the exact bytes on the wire.
pub async fn post_raw(
	router: &axum::Router,
	uri: &str,
	headers: &[(&str, &str)],
	body: Vec<u8>,
) -> (hyper::StatusCode, serde_json::Value) {
	use axum::extract::ConnectInfo;
	use http_body_util::BodyExt;

	let mut builder = axum::http::Request::builder().method("POST").uri(uri).header("content-type", "application/json");
	for (name, value) in headers {
		builder = builder.header(*name, *value);
	}
	let mut request = builder.body(axum::body::Body::from(body)).expect("build request");
	request.extensions_mut().insert(ConnectInfo(client_addr()));

	let response = tower::ServiceExt::oneshot(router.clone(), request).await.expect("router call");
	let status = response.status();
	let bytes = response.into_body().collect().await.expect("collect body").to_bytes();
	let parsed = serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);
	(status, parsed)
}

// vim: ts=4
