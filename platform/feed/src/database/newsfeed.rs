use common::database::Ulid;

/// A post being present in a user's feed. The pair `(user_id, post_id)` is unique.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NewsfeedEntry {
	pub user_id: Ulid,
	pub post_id: Ulid,
	pub is_seen: bool,
}

impl NewsfeedEntry {
	pub fn unseen(user_id: Ulid, post_id: Ulid) -> Self {
		Self {
			user_id,
			post_id,
			is_seen: false,
		}
	}
}
