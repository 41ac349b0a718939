use chrono::{DateTime, Utc};
use common::database::Ulid;

use crate::pagination::{Keyed, SortKey};

/// Where a comment sits in a thread. Threads are two levels deep, so a reply
/// always points at a root comment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CommentKind {
	Root,
	Reply { parent_id: Ulid },
}

impl From<Option<Ulid>> for CommentKind {
	fn from(parent_id: Option<Ulid>) -> Self {
		match parent_id {
			Some(parent_id) => Self::Reply { parent_id },
			None => Self::Root,
		}
	}
}

#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct Comment {
	pub id: Ulid,
	pub post_id: Ulid,
	#[serde(flatten)]
	pub kind: CommentKind,
	pub created_by: Ulid,
	pub content: String,
	pub is_hidden: bool,
	/// Number of replies, maintained by the writer of the comments table.
	pub total_reply: i32,
	pub created_at: DateTime<Utc>,
	pub updated_at: DateTime<Utc>,
}

impl Keyed for Comment {
	fn sort_key(&self) -> SortKey {
		SortKey::new(self.created_at, self.id)
	}
}

/// A row of the `comments` table as it comes out of Postgres.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct CommentRow {
	pub id: Ulid,
	pub post_id: Ulid,
	pub parent_id: Option<Ulid>,
	pub created_by: Ulid,
	pub content: String,
	pub is_hidden: bool,
	pub total_reply: i32,
	pub created_at: DateTime<Utc>,
	pub updated_at: DateTime<Utc>,
}

impl From<CommentRow> for Comment {
	fn from(row: CommentRow) -> Self {
		Self {
			id: row.id,
			post_id: row.post_id,
			kind: row.parent_id.into(),
			created_by: row.created_by,
			content: row.content,
			is_hidden: row.is_hidden,
			total_reply: row.total_reply,
			created_at: row.created_at,
			updated_at: row.updated_at,
		}
	}
}
