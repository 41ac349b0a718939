use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use common::database::Ulid;

use crate::pagination::{Keyed, SortKey};

/// The part of a post the membership backfill pages over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::FromRow)]
pub struct PostRef {
	pub id: Ulid,
	pub created_at: DateTime<Utc>,
}

impl Keyed for PostRef {
	fn sort_key(&self) -> SortKey {
		SortKey::new(self.created_at, self.id)
	}
}

/// The set of groups a post is published to.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostAudience {
	pub post_id: Ulid,
	pub group_ids: BTreeSet<Ulid>,
}

impl PostAudience {
	pub fn new(post_id: Ulid, group_ids: impl IntoIterator<Item = Ulid>) -> Self {
		Self {
			post_id,
			group_ids: group_ids.into_iter().collect(),
		}
	}

	/// Replaces the audience and returns the change the fanout has to apply.
	pub fn update(self, group_ids: impl IntoIterator<Item = Ulid>) -> (Self, AudienceChange) {
		let next = Self::new(self.post_id, group_ids);
		let change = AudienceChange::between(&next.group_ids, &self.group_ids);
		(next, change)
	}
}

/// The difference between two audiences of the same post.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AudienceChange {
	/// Groups in the new audience but not the old one.
	pub attached: Vec<Ulid>,
	/// Groups in the old audience but not the new one.
	pub detached: Vec<Ulid>,
	/// Groups in both audiences.
	pub kept: Vec<Ulid>,
	/// The whole new audience.
	pub current: Vec<Ulid>,
}

impl AudienceChange {
	pub fn between(new: &BTreeSet<Ulid>, old: &BTreeSet<Ulid>) -> Self {
		Self {
			attached: new.difference(old).copied().collect(),
			detached: old.difference(new).copied().collect(),
			kept: new.intersection(old).copied().collect(),
			current: new.iter().copied().collect(),
		}
	}

	pub fn is_empty(&self) -> bool {
		self.attached.is_empty() && self.detached.is_empty()
	}

	/// Followers of these groups already had the post before the change.
	pub fn attach_exclusions(&self) -> &[Ulid] {
		&self.kept
	}

	/// Followers of any group still in the audience keep the post, including
	/// those reached only through a newly attached group.
	pub fn detach_exclusions(&self) -> &[Ulid] {
		&self.current
	}
}
