use std::sync::Arc;

use common::database::Ulid;
use sqlx::query_builder::Separated;
use sqlx::{Postgres, QueryBuilder};

use super::{key_bound, order_and_limit};
use crate::database::PostRef;
use crate::error::Result;
use crate::pagination::{KeyBound, KeysetSource, Order};
use crate::store::PostFilter;

#[derive(Debug, Clone)]
pub struct PgPostIndex {
	db: Arc<sqlx::PgPool>,
}

impl PgPostIndex {
	pub fn new(db: Arc<sqlx::PgPool>) -> Self {
		Self { db }
	}
}

fn published(seperated: &mut Separated<'_, '_, Postgres, &str>) {
	seperated.push("posts.status = 'published'");
	seperated.push("posts.is_hidden = FALSE");
}

impl KeysetSource for PgPostIndex {
	type Filter = PostFilter;
	type Row = PostRef;

	async fn find_page(&self, filter: &PostFilter, bound: Option<KeyBound>, order: Order, limit: usize) -> Result<Vec<PostRef>> {
		let mut qb = QueryBuilder::<Postgres>::new("SELECT posts.id, posts.created_at FROM posts WHERE ");

		let mut seperated = qb.separated(" AND ");

		published(&mut seperated);

		seperated.push(
			"EXISTS (SELECT 1 FROM post_groups WHERE post_groups.post_id = posts.id AND post_groups.group_id = ANY(",
		);
		seperated.push_bind_unseparated(filter.group_ids.clone());
		seperated.push_unseparated("))");

		if !filter.exclude_group_ids.is_empty() {
			seperated.push(
				"NOT EXISTS (SELECT 1 FROM post_groups WHERE post_groups.post_id = posts.id AND post_groups.group_id = \
				 ANY(",
			);
			seperated.push_bind_unseparated(filter.exclude_group_ids.clone());
			seperated.push_unseparated("))");
		}

		key_bound(&mut seperated, "posts", bound);
		order_and_limit(&mut seperated, "posts", order, limit);

		Ok(qb.build_query_as().fetch_all(self.db.as_ref()).await?)
	}

	async fn find_one(&self, _filter: &PostFilter, id: Ulid) -> Result<Option<PostRef>> {
		let mut qb = QueryBuilder::<Postgres>::new("SELECT posts.id, posts.created_at FROM posts WHERE ");

		let mut seperated = qb.separated(" AND ");
		seperated.push("posts.id = ");
		seperated.push_bind_unseparated(id);
		published(&mut seperated);

		Ok(qb.build_query_as().fetch_optional(self.db.as_ref()).await?)
	}
}
