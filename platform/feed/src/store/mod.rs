use std::future::Future;

use common::database::Ulid;

use crate::database::{Comment, Follow, NewsfeedEntry, PostRef};
use crate::error::Result;
use crate::pagination::KeysetSource;

pub mod postgres;

/// Rules every comment read applies, whatever its scope.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Visibility {
	/// Comments this user has reported are left out.
	pub viewer_id: Option<Ulid>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommentScope {
	/// Comments without a parent.
	Roots,
	/// Replies to one root comment.
	Replies { parent_id: Ulid },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommentFilter {
	pub post_id: Ulid,
	pub scope: CommentScope,
	pub visibility: Visibility,
}

impl CommentFilter {
	pub fn roots(post_id: Ulid, visibility: Visibility) -> Self {
		Self {
			post_id,
			scope: CommentScope::Roots,
			visibility,
		}
	}

	pub fn replies(post_id: Ulid, parent_id: Ulid, visibility: Visibility) -> Self {
		Self {
			post_id,
			scope: CommentScope::Replies { parent_id },
			visibility,
		}
	}
}

pub trait CommentStore: KeysetSource<Row = Comment, Filter = CommentFilter> {
	/// A single comment by id, or `None` if it is missing or not visible.
	fn find_comment(&self, id: Ulid, visibility: &Visibility) -> impl Future<Output = Result<Option<Comment>>> + Send;
}

/// Published, visible posts belonging to any of `group_ids` and none of
/// `exclude_group_ids`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostFilter {
	pub group_ids: Vec<Ulid>,
	pub exclude_group_ids: Vec<Ulid>,
}

pub trait PostIndex: KeysetSource<Row = PostRef, Filter = PostFilter> {}

impl<T: KeysetSource<Row = PostRef, Filter = PostFilter>> PostIndex for T {}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FollowerQuery<'a> {
	pub target_group_ids: &'a [Ulid],
	pub exclude_group_ids: &'a [Ulid],
	/// Only follows with a larger id are returned. `0` starts from the beginning.
	pub after_follow_id: i64,
	pub limit: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FollowerBatch {
	/// One id per follow row, so a user following two target groups shows up twice.
	pub user_ids: Vec<Ulid>,
	/// The largest follow id in the batch, or the query's `after_follow_id` when empty.
	pub latest_follow_id: i64,
}

impl FollowerBatch {
	/// `follows` must be in ascending id order.
	pub fn from_follows(follows: Vec<Follow>, after_follow_id: i64) -> Self {
		Self {
			latest_follow_id: follows.last().map_or(after_follow_id, |follow| follow.id),
			user_ids: follows.into_iter().map(|follow| follow.user_id).collect(),
		}
	}
}

pub trait FollowIndex: Send + Sync {
	/// Followers of any target group who follow none of the excluded groups,
	/// ordered by follow id.
	fn followers(&self, query: &FollowerQuery<'_>) -> impl Future<Output = Result<FollowerBatch>> + Send;

	fn groups_of_user(&self, user_id: Ulid) -> impl Future<Output = Result<Vec<Ulid>>> + Send;
}

/// Every write is idempotent: attaching an existing entry and detaching a
/// missing one are both no-ops.
pub trait NewsfeedStore: Send + Sync {
	fn attach(&self, entries: &[NewsfeedEntry]) -> impl Future<Output = Result<u64>> + Send;

	fn detach(&self, post_id: Ulid, user_ids: &[Ulid]) -> impl Future<Output = Result<u64>> + Send;

	fn detach_post(&self, post_id: Ulid) -> impl Future<Output = Result<u64>> + Send;

	fn detach_for_user(&self, user_id: Ulid, post_ids: &[Ulid]) -> impl Future<Output = Result<u64>> + Send;
}
