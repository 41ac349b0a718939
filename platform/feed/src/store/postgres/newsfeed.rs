use std::sync::Arc;

use common::database::Ulid;
use sqlx::{Postgres, QueryBuilder};

use crate::database::NewsfeedEntry;
use crate::error::Result;
use crate::store::NewsfeedStore;

#[derive(Debug, Clone)]
pub struct PgNewsfeedStore {
	db: Arc<sqlx::PgPool>,
}

impl PgNewsfeedStore {
	pub fn new(db: Arc<sqlx::PgPool>) -> Self {
		Self { db }
	}
}

impl NewsfeedStore for PgNewsfeedStore {
	async fn attach(&self, entries: &[NewsfeedEntry]) -> Result<u64> {
		if entries.is_empty() {
			return Ok(0);
		}

		let result = QueryBuilder::<Postgres>::new("INSERT INTO user_newsfeeds (user_id, post_id, is_seen) ")
			.push_values(entries, |mut sep, entry| {
				sep.push_bind(entry.user_id);
				sep.push_bind(entry.post_id);
				sep.push_bind(entry.is_seen);
			})
			.push(" ON CONFLICT (user_id, post_id) DO NOTHING")
			.build()
			.execute(self.db.as_ref())
			.await?;

		Ok(result.rows_affected())
	}

	async fn detach(&self, post_id: Ulid, user_ids: &[Ulid]) -> Result<u64> {
		if user_ids.is_empty() {
			return Ok(0);
		}

		let result = sqlx::query("DELETE FROM user_newsfeeds WHERE post_id = $1 AND user_id = ANY($2)")
			.bind(post_id)
			.bind(user_ids)
			.execute(self.db.as_ref())
			.await?;

		Ok(result.rows_affected())
	}

	async fn detach_post(&self, post_id: Ulid) -> Result<u64> {
		let result = sqlx::query("DELETE FROM user_newsfeeds WHERE post_id = $1")
			.bind(post_id)
			.execute(self.db.as_ref())
			.await?;

		Ok(result.rows_affected())
	}

	async fn detach_for_user(&self, user_id: Ulid, post_ids: &[Ulid]) -> Result<u64> {
		if post_ids.is_empty() {
			return Ok(0);
		}

		let result = sqlx::query("DELETE FROM user_newsfeeds WHERE user_id = $1 AND post_id = ANY($2)")
			.bind(user_id)
			.bind(post_ids)
			.execute(self.db.as_ref())
			.await?;

		Ok(result.rows_affected())
	}
}
