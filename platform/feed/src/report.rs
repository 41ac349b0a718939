use crate::error::FeedError;

/// Receives failures that were handled locally but should still be seen by an operator.
pub trait ErrorReporter: Send + Sync {
	fn capture(&self, context: &'static str, err: &FeedError);
}

#[derive(Debug, Clone, Copy, Default)]
pub struct TracingReporter;

impl ErrorReporter for TracingReporter {
	fn capture(&self, context: &'static str, err: &FeedError) {
		tracing::error!(context, kind = err.kind(), retryable = err.is_retryable(), err = %err, "captured error");
	}
}

#[derive(Debug, serde::Serialize)]
struct ErrorEvent<'a> {
	context: &'a str,
	kind: &'a str,
	retryable: bool,
	message: String,
}

/// Publishes captured errors to NATS. Publishing happens on a spawned task so
/// the caller never waits on it; a failed publish is only logged.
#[derive(Debug, Clone)]
pub struct NatsReporter {
	nats: async_nats::Client,
	subject: String,
}

impl NatsReporter {
	pub fn new(nats: async_nats::Client, subject: impl Into<String>) -> Self {
		Self {
			nats,
			subject: subject.into(),
		}
	}
}

impl ErrorReporter for NatsReporter {
	fn capture(&self, context: &'static str, err: &FeedError) {
		TracingReporter.capture(context, err);

		let event = ErrorEvent {
			context,
			kind: err.kind(),
			retryable: err.is_retryable(),
			message: err.to_string(),
		};

		let payload = match serde_json::to_vec(&event) {
			Ok(payload) => payload,
			Err(err) => {
				tracing::warn!(err = %err, "failed to serialize error event");
				return;
			}
		};

		let nats = self.nats.clone();
		let subject = self.subject.clone();

		tokio::spawn(async move {
			if let Err(err) = nats.publish(subject, payload.into()).await {
				tracing::warn!(err = %err, "failed to publish error event");
			}
		});
	}
}
