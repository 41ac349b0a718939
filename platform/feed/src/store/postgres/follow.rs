use std::sync::Arc;

use common::database::Ulid;
use sqlx::{Postgres, QueryBuilder};

use crate::database::Follow;
use crate::error::Result;
use crate::store::{FollowIndex, FollowerBatch, FollowerQuery};

#[derive(Debug, Clone)]
pub struct PgFollowIndex {
	db: Arc<sqlx::PgPool>,
}

impl PgFollowIndex {
	pub fn new(db: Arc<sqlx::PgPool>) -> Self {
		Self { db }
	}
}

impl FollowIndex for PgFollowIndex {
	async fn followers(&self, query: &FollowerQuery<'_>) -> Result<FollowerBatch> {
		let mut qb = QueryBuilder::<Postgres>::new("SELECT follows.id, follows.user_id, follows.group_id, follows.created_at FROM follows WHERE ");

		let mut seperated = qb.separated(" AND ");

		seperated.push("follows.group_id = ANY(");
		seperated.push_bind_unseparated(query.target_group_ids.to_vec());
		seperated.push_unseparated(")");

		seperated.push("follows.id > ");
		seperated.push_bind_unseparated(query.after_follow_id);

		if !query.exclude_group_ids.is_empty() {
			seperated.push(
				"NOT EXISTS (SELECT 1 FROM follows AS kept WHERE kept.user_id = follows.user_id AND kept.group_id = ANY(",
			);
			seperated.push_bind_unseparated(query.exclude_group_ids.to_vec());
			seperated.push_unseparated("))");
		}

		seperated.push_unseparated(" ORDER BY follows.id ASC LIMIT ");
		seperated.push_bind_unseparated(i64::try_from(query.limit).unwrap_or(i64::MAX));

		let follows: Vec<Follow> = qb.build_query_as().fetch_all(self.db.as_ref()).await?;

		Ok(FollowerBatch::from_follows(follows, query.after_follow_id))
	}

	async fn groups_of_user(&self, user_id: Ulid) -> Result<Vec<Ulid>> {
		Ok(sqlx::query_scalar("SELECT group_id FROM follows WHERE user_id = $1")
			.bind(user_id)
			.fetch_all(self.db.as_ref())
			.await?)
	}
}
