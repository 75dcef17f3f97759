//! Shared outbound HTTPS client for callback attestation and provider-key
//! probes. One HTTP/2-capable `hyper-util` client, reused across calls
//! instead of built per-request.

use std::time::Duration;

use eaglechat_types::prelude::*;
use http_body_util::{BodyExt, Full};
use hyper::body::Bytes;
use hyper_rustls::HttpsConnectorBuilder;
use hyper_util::client::legacy::Client;
use hyper_util::rt::TokioExecutor;

const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
const READ_TIMEOUT: Duration = Duration::from_secs(10);

pub struct OutboundResponse {
	pub status: hyper::StatusCode,
	pub body: Vec<u8>,
}

#[derive(Clone)]
pub struct HttpClient {
	inner: Client<hyper_rustls::HttpsConnector<hyper_util::client::legacy::connect::HttpConnector>, Full<Bytes>>,
}

impl HttpClient {
	pub fn new() -> ClResult<Self> {
		let connector = HttpsConnectorBuilder::new()
			.with_native_roots()
			.map_err(|e| Error::Internal(format!("failed to load native TLS roots: {e}")))?
			.https_only()
			.enable_http1()
			.enable_http2()
			.build();

		let inner = Client::builder(TokioExecutor::new()).build(connector);
		Ok(Self { inner })
	}

	/// Issues a request and collects the full body, bounded by `timeout`.
	/// Never follows the status code into an `Err` — callers interpret
	/// status themselves, matching the callback/probe contracts, which
	/// distinguish 2xx from 4xx from 5xx rather than treating all
	/// non-2xx as one failure mode.
	pub async fn send(&self, request: hyper::Request<Full<Bytes>>, timeout: Duration) -> ClResult<OutboundResponse> {
		let call = self.inner.request(request);
		let response = tokio::time::timeout(timeout, call)
			.await
			.map_err(|_| Error::Internal("outbound request timed out".into()))?
			.map_err(|e| Error::Internal(format!("outbound request failed: {e}")))?;

		let status = response.status();
		let body = response
			.into_body()
			.collect()
			.await
			.map_err(|e| Error::Internal(format!("failed to read response body: {e}")))?
			.to_bytes()
			.to_vec();

		Ok(OutboundResponse { status, body })
	}

	pub async fn post_json(&self, url: &str, body: &str, headers: &[(&str, &str)]) -> ClResult<OutboundResponse> {
		let mut builder = hyper::Request::builder()
			.method(hyper::Method::POST)
			.uri(url)
			.header("content-type", "application/json");
		for (name, value) in headers {
			builder = builder.header(*name, *value);
		}
		let request = builder
			.body(Full::new(Bytes::copy_from_slice(body.as_bytes())))
			.map_err(|e| Error::Internal(format!("failed to build request: {e}")))?;

		self.send(request, CONNECT_TIMEOUT + READ_TIMEOUT).await
	}

	pub async fn get(&self, url: &str, headers: &[(&str, &str)]) -> ClResult<OutboundResponse> {
		let mut builder = hyper::Request::builder().method(hyper::Method::GET).uri(url);
		for (name, value) in headers {
			builder = builder.header(*name, *value);
		}
		let request = builder
			.body(Full::new(Bytes::new()))
			.map_err(|e| Error::Internal(format!("failed to build request: {e}")))?;

		self.send(request, CONNECT_TIMEOUT + READ_TIMEOUT).await
	}
}

// vim: ts=4
