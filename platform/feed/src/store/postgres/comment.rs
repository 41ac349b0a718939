use std::sync::Arc;

use common::database::Ulid;
use sqlx::query_builder::Separated;
use sqlx::{Postgres, QueryBuilder};

use super::{key_bound, order_and_limit};
use crate::database::{Comment, CommentRow};
use crate::error::Result;
use crate::pagination::{KeyBound, KeysetSource, Order};
use crate::store::{CommentFilter, CommentScope, CommentStore, Visibility};

const SELECT_COMMENTS: &str = "SELECT comments.id, comments.post_id, comments.parent_id, comments.created_by, \
                               comments.content, comments.is_hidden, comments.total_reply, comments.created_at, \
                               comments.updated_at FROM comments WHERE ";

#[derive(Debug, Clone)]
pub struct PgCommentStore {
	db: Arc<sqlx::PgPool>,
}

impl PgCommentStore {
	pub fn new(db: Arc<sqlx::PgPool>) -> Self {
		Self { db }
	}
}

fn visibility(seperated: &mut Separated<'_, '_, Postgres, &str>, visibility: &Visibility) {
	seperated.push("comments.is_hidden = FALSE");

	if let Some(viewer_id) = visibility.viewer_id {
		seperated.push(
			"NOT EXISTS (SELECT 1 FROM content_reports WHERE content_reports.target_type = 'comment' AND \
			 content_reports.target_id = comments.id AND content_reports.created_by = ",
		);
		seperated.push_bind_unseparated(viewer_id);
		seperated.push_unseparated(")");
	}
}

impl KeysetSource for PgCommentStore {
	type Filter = CommentFilter;
	type Row = Comment;

	async fn find_page(
		&self,
		filter: &CommentFilter,
		bound: Option<KeyBound>,
		order: Order,
		limit: usize,
	) -> Result<Vec<Comment>> {
		let mut qb = QueryBuilder::<Postgres>::new(SELECT_COMMENTS);

		let mut seperated = qb.separated(" AND ");

		seperated.push("comments.post_id = ");
		seperated.push_bind_unseparated(filter.post_id);

		match filter.scope {
			CommentScope::Roots => {
				seperated.push("comments.parent_id IS NULL");
			}
			CommentScope::Replies { parent_id } => {
				seperated.push("comments.parent_id = ");
				seperated.push_bind_unseparated(parent_id);
			}
		}

		visibility(&mut seperated, &filter.visibility);
		key_bound(&mut seperated, "comments", bound);
		order_and_limit(&mut seperated, "comments", order, limit);

		let rows: Vec<CommentRow> = qb.build_query_as().fetch_all(self.db.as_ref()).await?;

		Ok(rows.into_iter().map(Comment::from).collect())
	}

	async fn find_one(&self, filter: &CommentFilter, id: Ulid) -> Result<Option<Comment>> {
		self.find_comment(id, &filter.visibility).await
	}
}

impl CommentStore for PgCommentStore {
	async fn find_comment(&self, id: Ulid, visibility_rules: &Visibility) -> Result<Option<Comment>> {
		let mut qb = QueryBuilder::<Postgres>::new(SELECT_COMMENTS);

		let mut seperated = qb.separated(" AND ");
		seperated.push("comments.id = ");
		seperated.push_bind_unseparated(id);
		visibility(&mut seperated, visibility_rules);

		let row: Option<CommentRow> = qb.build_query_as().fetch_optional(self.db.as_ref()).await?;

		Ok(row.map(Comment::from))
	}
}
