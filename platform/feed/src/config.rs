use std::num::NonZeroUsize;
use std::time::Duration;

use common::config::{duration_ms, ConfigError, DatabaseConfig, LoggingConfig, NatsConfig};

/// Environment variables starting with `FEED_` override the config file.
pub const ENV_PREFIX: &str = "FEED";

#[derive(Debug, Clone, PartialEq, serde::Deserialize)]
#[serde(default)]
pub struct FeedConfig {
	/// Path to a config file to load, without the extension
	pub config_file: Option<String>,

	/// Name of this instance
	pub name: String,

	/// The logging config
	pub logging: LoggingConfig,

	/// The database config
	pub database: DatabaseConfig,

	/// The NATS config
	pub nats: NatsConfig,

	/// Newsfeed fanout settings
	pub fanout: FanoutConfig,

	/// Comment thread limits
	pub thread: ThreadConfig,
}

impl Default for FeedConfig {
	fn default() -> Self {
		Self {
			config_file: None,
			name: "scuffle-feed".to_string(),
			logging: LoggingConfig::default(),
			database: DatabaseConfig::default(),
			nats: NatsConfig::default(),
			fanout: FanoutConfig::default(),
			thread: ThreadConfig::default(),
		}
	}
}

impl FeedConfig {
	/// Reads `FEED_CONFIG_FILE` (default `config`) and the `FEED_*` environment.
	/// Naming a file explicitly makes it required.
	pub fn parse() -> Result<Self, ConfigError> {
		let config_file = std::env::var(format!("{ENV_PREFIX}_CONFIG_FILE")).ok();
		let required = config_file.is_some();

		common::config::parse(ENV_PREFIX, Some(config_file.as_deref().unwrap_or("config")), required)
	}
}

#[derive(Debug, Clone, PartialEq, serde::Deserialize)]
#[serde(default)]
pub struct FanoutConfig {
	/// Follower ids read per batch when a post's audience changes
	pub batch_size: NonZeroUsize,

	/// Posts read per batch when a user joins or leaves groups
	pub membership_batch_size: NonZeroUsize,

	/// Prefix of every NATS subject the worker uses
	pub subject_prefix: String,

	/// Retries applied to each store call
	pub retry: RetryConfig,
}

impl Default for FanoutConfig {
	fn default() -> Self {
		Self {
			batch_size: NonZeroUsize::new(1000).unwrap_or(NonZeroUsize::MIN),
			membership_batch_size: NonZeroUsize::new(500).unwrap_or(NonZeroUsize::MIN),
			subject_prefix: "feed".to_string(),
			retry: RetryConfig::default(),
		}
	}
}

impl FanoutConfig {
	pub fn subject(&self, name: &str) -> String {
		format!("{}.{name}", self.subject_prefix)
	}
}

#[derive(Debug, Clone, PartialEq, serde::Deserialize)]
#[serde(default)]
pub struct RetryConfig {
	/// Total number of calls, including the first
	pub max_attempts: u32,

	/// Wait before the second call; later waits grow linearly
	#[serde(with = "duration_ms")]
	pub backoff: Duration,
}

impl Default for RetryConfig {
	fn default() -> Self {
		Self {
			max_attempts: 3,
			backoff: Duration::from_millis(100),
		}
	}
}

#[derive(Debug, Clone, PartialEq, serde::Deserialize)]
#[serde(default)]
pub struct ThreadConfig {
	/// Window size used when a caller gives none
	pub default_limit: usize,

	/// Largest window a caller may ask for
	pub max_limit: usize,
}

impl Default for ThreadConfig {
	fn default() -> Self {
		Self {
			default_limit: 10,
			max_limit: 100,
		}
	}
}
