use chrono::{DateTime, Utc};
use common::database::Ulid;

/// A user's membership of a group. `id` is a monotonically increasing
/// sequence and is the key follower batches are read by.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct Follow {
	pub id: i64,
	pub user_id: Ulid,
	pub group_id: Ulid,
	pub created_at: DateTime<Utc>,
}
