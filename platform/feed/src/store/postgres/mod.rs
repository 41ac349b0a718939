use sqlx::query_builder::Separated;
use sqlx::Postgres;

use crate::pagination::{KeyBound, Order};

mod comment;
mod follow;
mod newsfeed;
mod post;

pub use comment::PgCommentStore;
pub use follow::PgFollowIndex;
pub use newsfeed::PgNewsfeedStore;
pub use post::PgPostIndex;

/// `(created_at, id) > ($n, $m)` style row comparison on the sort key.
fn key_bound(seperated: &mut Separated<'_, '_, Postgres, &str>, table: &str, bound: Option<KeyBound>) {
	if let Some(bound) = bound {
		seperated.push(format_args!(
			"({table}.created_at, {table}.id) {} (",
			bound.comparison.as_sql()
		));
		seperated.push_bind_unseparated(bound.key.created_at);
		seperated.push_unseparated(", ");
		seperated.push_bind_unseparated(bound.key.id);
		seperated.push_unseparated(")");
	}
}

fn order_and_limit(seperated: &mut Separated<'_, '_, Postgres, &str>, table: &str, order: Order, limit: usize) {
	let order = order.as_sql();
	seperated.push_unseparated(format_args!(
		" ORDER BY {table}.created_at {order}, {table}.id {order} LIMIT "
	));
	seperated.push_bind_unseparated(i64::try_from(limit).unwrap_or(i64::MAX));
}
