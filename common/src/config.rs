use std::time::Duration;

use crate::logging;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
	#[error("failed to load config: {0}")]
	Load(#[from] config::ConfigError),
}

#[derive(Debug, Clone, PartialEq, serde::Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
	/// The log level to use, this is a tracing env filter
	pub level: String,

	/// What logging mode we should use
	pub mode: logging::Mode,
}

impl Default for LoggingConfig {
	fn default() -> Self {
		Self {
			level: "info".to_string(),
			mode: logging::Mode::Default,
		}
	}
}

#[derive(Debug, Clone, PartialEq, serde::Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
	/// The database URL to use
	pub uri: String,

	/// The maximum number of pooled connections
	pub max_connections: u32,

	/// How long to wait for a pooled connection before giving up
	#[serde(with = "duration_ms")]
	pub acquire_timeout: Duration,

	/// Apply the bundled migrations on startup
	pub run_migrations: bool,
}

impl Default for DatabaseConfig {
	fn default() -> Self {
		Self {
			uri: "postgres://root@localhost:5432/scuffle_dev".to_string(),
			max_connections: 10,
			acquire_timeout: Duration::from_secs(5),
			run_migrations: true,
		}
	}
}

#[derive(Debug, Clone, PartialEq, serde::Deserialize)]
#[serde(default)]
pub struct NatsConfig {
	/// The URI to use for connecting to Nats
	pub servers: Vec<String>,

	/// The username to use for authentication (user-pass auth)
	pub username: Option<String>,

	/// The password to use for authentication (user-pass auth)
	pub password: Option<String>,

	/// The token to use for authentication (token auth)
	pub token: Option<String>,
}

impl Default for NatsConfig {
	fn default() -> Self {
		Self {
			servers: vec!["localhost:4222".into()],
			username: None,
			password: None,
			token: None,
		}
	}
}

/// Durations are written as a number of milliseconds in config files and
/// environment variables.
pub mod duration_ms {
	use std::time::Duration;

	use serde::{Deserialize, Deserializer};

	pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
		u64::deserialize(deserializer).map(Duration::from_millis)
	}
}

/// Loads `C` from an optional config file overlaid with `<prefix>_*`
/// environment variables. Nested keys use `__` as the separator, so
/// `FEED_DATABASE__URI` sets `database.uri`.
///
/// A missing file is only an error when `required` is set; the defaults of
/// `C` fill every key neither source provides.
pub fn parse<C: serde::de::DeserializeOwned>(prefix: &str, config_file: Option<&str>, required: bool) -> Result<C, ConfigError> {
	let mut builder = config::Config::builder();

	if let Some(path) = config_file.filter(|p| !p.is_empty()) {
		builder = builder.add_source(config::File::with_name(path).required(required));
	}

	builder = builder.add_source(
		config::Environment::with_prefix(prefix)
			.prefix_separator("_")
			.separator("__")
			.try_parsing(true)
			.list_separator(",")
			.with_list_parse_key("nats.servers"),
	);

	let config = builder.build()?;

	tracing::debug!(prefix = prefix, "config sources loaded");

	Ok(config.try_deserialize()?)
}
