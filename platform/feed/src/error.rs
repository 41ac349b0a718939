pub type Result<T, E = FeedError> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum FeedError {
	#[error("invalid argument: {0}")]
	InvalidArgument(&'static str),
	#[error("not found: {0}")]
	NotFound(&'static str),
	#[error("database error: {0}")]
	Database(#[from] sqlx::Error),
}

impl FeedError {
	/// Transient storage failures that may succeed if the same call is made again.
	pub fn is_retryable(&self) -> bool {
		match self {
			Self::Database(err) => common::database::is_transient(err),
			_ => false,
		}
	}

	pub fn kind(&self) -> &'static str {
		match self {
			Self::InvalidArgument(_) => "invalid_argument",
			Self::NotFound(_) => "not_found",
			Self::Database(_) => "database",
		}
	}
}
