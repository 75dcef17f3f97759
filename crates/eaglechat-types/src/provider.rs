//! Static shape of the "probe" request each upstream provider accepts as a
//! minimal, cheapest-available-model validation of a tenant-supplied key.

use crate::types::Provider;

/// Method + path + body needed to validate a key without incurring
/// meaningful cost. The broker and the core HTTP client share this so the
/// request shape lives in one place.
pub struct ProbeSpec {
	pub method: ProbeMethod,
	pub path: &'static str,
	/// `None` for GET probes.
	pub body: Option<&'static str>,
	pub auth_header: &'static str,
	/// Extra `(name, value)` header the provider requires on every request,
	/// beyond the auth header. `None` when there isn't one.
	pub extra_header: Option<(&'static str, &'static str)>,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ProbeMethod {
	Get,
	Post,
}

impl Provider {
	pub fn base_url(self) -> &'static str {
		match self {
			Provider::Anthropic => "https://api.anthropic.com",
			Provider::OpenAi => "https://api.openai.com",
		}
	}

	pub fn probe_spec(self) -> ProbeSpec {
		match self {
			// Cheapest model, max_tokens: 1 — asserts the key is accepted
			// without generating a meaningful completion.
			Provider::Anthropic => ProbeSpec {
				method: ProbeMethod::Post,
				path: "/v1/messages",
				body: Some(
					r#"{"model":"claude-3-5-haiku-20241022","max_tokens":1,"messages":[{"role":"user","content":"hi"}]}"#,
				),
				auth_header: "x-api-key",
				extra_header: Some(("anthropic-version", "2023-06-01")),
			},
			// The model listing endpoint is free and still authenticates
			// the key, so it stands in for a probe without spending tokens.
			Provider::OpenAi => ProbeSpec {
				method: ProbeMethod::Get,
				path: "/v1/models",
				body: None,
				auth_header: "authorization",
				extra_header: None,
			},
		}
	}
}

// vim: ts=4
