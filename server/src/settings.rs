//! `config.json` schema: the non-secret operator knobs enumerated in the
//! external interfaces. Secrets (`MASTER_KEY`, `STORE_URL`,
//! `STORE_SERVICE_KEY`) come from the environment and never live here — see
//! `bootstrap.rs`.

use std::path::Path;
use std::time::Duration;

use eaglechat_gateway::prelude::*;
use serde::Deserialize;

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Settings {
	pub logging: LoggingSettings,
	pub api: ApiSettings,
	pub callback: CallbackSettings,
}

#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq)]
#[serde(rename_all = "UPPERCASE")]
pub enum LogLevel {
	Debug,
	Info,
	Warn,
	Error,
}

impl LogLevel {
	pub fn as_filter(self) -> &'static str {
		match self {
			Self::Debug => "debug",
			Self::Info => "info",
			Self::Warn => "warn",
			Self::Error => "error",
		}
	}
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
	pub level: LogLevel,
	pub retention_days: u16,
	pub log_directory: String,
}

impl Default for LoggingSettings {
	fn default() -> Self {
		Self { level: LogLevel::Info, retention_days: 30, log_directory: "./logs".to_string() }
	}
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct ApiSettings {
	pub title: String,
	pub description: String,
	pub version: String,
	pub listen: String,
	/// Relaxes the registration coordinator's SSRF origin check so that
	/// callbacks to private/loopback addresses are accepted. Never relaxes
	/// signature verification.
	pub development_mode: bool,
}

impl Default for ApiSettings {
	fn default() -> Self {
		Self {
			title: "EagleChat Gateway".to_string(),
			description: "Multi-tenant API gateway between WordPress sites and AI providers".to_string(),
			version: env!("CARGO_PKG_VERSION").to_string(),
			listen: "0.0.0.0:8080".to_string(),
			development_mode: false,
		}
	}
}

#[derive(Clone, Copy, Debug, Deserialize)]
#[serde(default)]
pub struct CallbackSettings {
	pub retry_attempts: u32,
	pub retry_delay_seconds: u64,
}

impl Default for CallbackSettings {
	fn default() -> Self {
		let default = CallbackRetryPolicy::default();
		Self { retry_attempts: default.attempts, retry_delay_seconds: default.delay.as_secs() }
	}
}

impl CallbackSettings {
	pub fn retry_policy(self) -> CallbackRetryPolicy {
		CallbackRetryPolicy {
			attempts: self.retry_attempts.max(1),
			delay: Duration::from_secs(self.retry_delay_seconds),
		}
	}
}

impl Default for Settings {
	fn default() -> Self {
		Self { logging: LoggingSettings::default(), api: ApiSettings::default(), callback: CallbackSettings::default() }
	}
}

impl Settings {
	/// Loads `path` if it exists; falls back to defaults for a missing file
	/// (a fresh install has no `config.json` yet) and fails loudly on a
	/// present-but-malformed one.
	pub async fn load(path: impl AsRef<Path>) -> ClResult<Self> {
		let path = path.as_ref();
		match tokio::fs::read_to_string(path).await {
			Ok(raw) => serde_json::from_str(&raw)
				.map_err(|e| Error::ConfigError(format!("malformed {}: {e}", path.display()))),
			Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
			Err(e) => Err(Error::ConfigError(format!("cannot read {}: {e}", path.display()))),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn defaults_match_spec_enumerated_values() {
		let settings = Settings::default();
		assert_eq!(settings.logging.level, LogLevel::Info);
		assert_eq!(settings.callback.retry_attempts, 3);
		assert_eq!(settings.callback.retry_delay_seconds, 3);
		assert!(!settings.api.development_mode);
	}

	#[tokio::test]
	async fn missing_file_falls_back_to_defaults() {
		let settings = Settings::load("/nonexistent/config.json").await.expect("load");
		assert_eq!(settings.api.title, "EagleChat Gateway");
	}

	#[tokio::test]
	async fn malformed_file_is_a_config_error() {
		let dir = std::env::temp_dir().join(format!("eaglechat-settings-test-{}", std::process::id()));
		tokio::fs::create_dir_all(&dir).await.expect("mkdir");
		let path = dir.join("config.json");
		tokio::fs::write(&path, b"not json").await.expect("write");

		let result = Settings::load(&path).await;
		assert!(matches!(result, Err(Error::ConfigError(_))));

		tokio::fs::remove_dir_all(&dir).await.ok();
	}
}

// vim: ts=4
