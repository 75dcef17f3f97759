//! Error handling subsystem. Implements the gateway's error taxonomy.

use axum::{http::StatusCode, response::IntoResponse, Json};
use serde::Serialize;

use crate::types::Provider;

pub type ClResult<T> = std::result::Result<T, Error>;

/// Which uniqueness invariant a duplicate registration tripped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DuplicateKind {
	Site,
	Email,
	TenantId,
	ApiKey,
}

impl DuplicateKind {
	fn as_str(self) -> &'static str {
		match self {
			Self::Site => "site",
			Self::Email => "email",
			Self::TenantId => "id",
			Self::ApiKey => "api_key",
		}
	}
}

#[derive(Debug)]
pub enum Error {
	// Validation
	Validation(String),
	DuplicateTenant(DuplicateKind),

	// Registration / callback
	CallbackFailed { reason: String, attempts: u32 },

	// Credentials and signing
	InvalidCredentials,
	BadSignature,
	StaleTimestamp,
	HmacNotConfigured,

	// Provider keys
	InvalidProviderKey(Provider),
	ProbeUnavailable(Provider),
	NoProviderKey(Provider),

	// Rate limiting
	RateLimited { retry_after_secs: u64 },

	// Integrity / storage
	SealIntegrity,
	StoreUnavailable,

	NotFound,
	/// Malformed or missing operator configuration (`config.json`, env vars).
	/// Fatal at startup; never reached on the request path.
	ConfigError(String),
	Internal(String),
}

impl std::fmt::Display for Error {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{:?}", self)
	}
}

impl std::error::Error for Error {}

#[derive(Debug, Serialize)]
struct ErrorBody {
	error: ErrorDetails,
}

#[derive(Debug, Serialize)]
struct ErrorDetails {
	code: String,
	message: String,
	#[serde(skip_serializing_if = "Option::is_none")]
	attempts: Option<u32>,
	#[serde(skip_serializing_if = "Option::is_none")]
	provider: Option<&'static str>,
	#[serde(skip_serializing_if = "Option::is_none")]
	retry_after: Option<u64>,
}

impl ErrorBody {
	fn simple(code: &str, message: impl Into<String>) -> Self {
		Self {
			error: ErrorDetails {
				code: code.to_string(),
				message: message.into(),
				attempts: None,
				provider: None,
				retry_after: None,
			},
		}
	}
}

impl IntoResponse for Error {
	fn into_response(self) -> axum::response::Response {
		let (status, body) = match self {
			Error::Validation(msg) => {
				(StatusCode::BAD_REQUEST, ErrorBody::simple("E-VAL-INVALID", msg))
			}
			Error::DuplicateTenant(kind) => (
				StatusCode::BAD_REQUEST,
				ErrorBody::simple(
					"E-REG-DUPLICATE",
					format!("A tenant with this {} already exists", kind.as_str()),
				),
			),
			Error::CallbackFailed { reason, attempts } => {
				let mut body = ErrorBody::simple("E-REG-CALLBACK", reason);
				body.error.attempts = Some(attempts);
				(StatusCode::BAD_REQUEST, body)
			}
			Error::InvalidCredentials => (
				StatusCode::UNAUTHORIZED,
				ErrorBody::simple("E-AUTH-INVALID", "Invalid tenant credentials"),
			),
			Error::BadSignature => (
				StatusCode::UNAUTHORIZED,
				ErrorBody::simple("E-SIGN-BAD", "unauthorized"),
			),
			Error::StaleTimestamp => (
				StatusCode::UNAUTHORIZED,
				ErrorBody::simple("E-SIGN-STALE", "unauthorized"),
			),
			Error::HmacNotConfigured => (
				StatusCode::UNAUTHORIZED,
				ErrorBody::simple("E-SIGN-NOHMAC", "unauthorized"),
			),
			Error::InvalidProviderKey(provider) => {
				let mut body = ErrorBody::simple(
					"E-KEY-INVALID",
					format!("{} rejected the supplied API key", provider.as_str()),
				);
				body.error.provider = Some(provider.as_str());
				(StatusCode::BAD_REQUEST, body)
			}
			Error::ProbeUnavailable(provider) => {
				let mut body = ErrorBody::simple(
					"E-KEY-PROBEFAIL",
					format!("Could not reach {} to validate the key", provider.as_str()),
				);
				body.error.provider = Some(provider.as_str());
				(StatusCode::BAD_REQUEST, body)
			}
			Error::NoProviderKey(provider) => {
				let mut body = ErrorBody::simple(
					"E-KEY-MISSING",
					format!("No {} key configured for this tenant", provider.as_str()),
				);
				body.error.provider = Some(provider.as_str());
				(StatusCode::BAD_REQUEST, body)
			}
			Error::RateLimited { retry_after_secs } => {
				let mut body = ErrorBody::simple("E-RATE-LIMITED", "Too many requests");
				body.error.retry_after = Some(retry_after_secs);
				(StatusCode::TOO_MANY_REQUESTS, body)
			}
			Error::NotFound => {
				(StatusCode::NOT_FOUND, ErrorBody::simple("E-CORE-NOTFOUND", "Resource not found"))
			}
			Error::SealIntegrity => {
				tracing::error!("seal integrity violation");
				(
					StatusCode::INTERNAL_SERVER_ERROR,
					ErrorBody::simple("E-CRYPT-TAMPER", "Internal server error"),
				)
			}
			Error::StoreUnavailable => (
				StatusCode::INTERNAL_SERVER_ERROR,
				ErrorBody::simple("E-STORE-UNAVAIL", "Internal server error"),
			),
			Error::ConfigError(msg) => {
				tracing::error!("configuration error: {}", msg);
				(
					StatusCode::INTERNAL_SERVER_ERROR,
					ErrorBody::simple("E-CONFIG-INVALID", "Internal server error"),
				)
			}
			Error::Internal(msg) => {
				tracing::warn!("internal error: {}", msg);
				(
					StatusCode::INTERNAL_SERVER_ERROR,
					ErrorBody::simple("E-CORE-INTERNAL", "Internal server error"),
				)
			}
		};

		let mut retry_after_secs = None;
		if let ErrorDetails { retry_after: Some(secs), .. } = &body.error {
			retry_after_secs = Some(*secs);
		}

		let mut response = (status, Json(body)).into_response();
		if let Some(secs) = retry_after_secs {
			if let Ok(value) = secs.to_string().parse() {
				response.headers_mut().insert(axum::http::header::RETRY_AFTER, value);
			}
		}
		response
	}
}

// vim: ts=4
