mod ulid;

pub use self::ulid::Ulid;

/// SQLSTATE codes Postgres raises when a transaction lost a race and can be
/// run again unchanged.
pub const RETRYABLE_SQLSTATES: &[&str] = &["40001", "40P01"];

/// Whether running the same statement again could succeed.
pub fn is_transient(err: &sqlx::Error) -> bool {
	match err {
		sqlx::Error::Database(err) => err
			.code()
			.is_some_and(|code| RETRYABLE_SQLSTATES.iter().any(|c| *c == code)),
		sqlx::Error::PoolTimedOut | sqlx::Error::Io(_) => true,
		_ => false,
	}
}
