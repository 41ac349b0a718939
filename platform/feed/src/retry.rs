use std::future::Future;
use std::time::Duration;

use crate::config::RetryConfig;

/// Runs an operation again when it fails with an error the caller deems transient.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
	pub max_attempts: u32,
	pub backoff: Duration,
}

impl Default for RetryPolicy {
	fn default() -> Self {
		Self::from(&RetryConfig::default())
	}
}

impl From<&RetryConfig> for RetryPolicy {
	fn from(config: &RetryConfig) -> Self {
		Self {
			max_attempts: config.max_attempts,
			backoff: config.backoff,
		}
	}
}

impl RetryPolicy {
	pub fn none() -> Self {
		Self {
			max_attempts: 1,
			backoff: Duration::ZERO,
		}
	}

	/// Calls `op` until it succeeds, returns an error `is_retryable` rejects, or
	/// `max_attempts` calls have been made. The wait grows linearly with the attempt number.
	pub async fn run<T, E, F, Fut>(&self, mut op: F, is_retryable: impl Fn(&E) -> bool) -> Result<T, E>
	where
		F: FnMut() -> Fut,
		Fut: Future<Output = Result<T, E>>,
		E: std::fmt::Display,
	{
		let max_attempts = self.max_attempts.max(1);
		let mut attempt = 1;

		loop {
			match op().await {
				Ok(value) => return Ok(value),
				Err(err) if attempt < max_attempts && is_retryable(&err) => {
					tracing::warn!(err = %err, attempt, max_attempts, "transient failure, retrying");
					tokio::time::sleep(self.backoff * attempt).await;
					attempt += 1;
				}
				Err(err) => return Err(err),
			}
		}
	}
}
